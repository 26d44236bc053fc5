//! # opener-bridge
//!
//! Connects policy-changed events to the issue tracker.
//!
//! [`InboundEvent`] decodes CloudEvents HTTP deliveries, and [`Dispatcher`]
//! classifies every policy record in the event and opens an issue for each
//! one that fires. Failures are split into client and dependency classes so
//! the transport can choose redelivery behavior without string matching.

mod dispatcher;
mod error;
mod event;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{DispatchError, ErrorClass, EventError};
pub use event::InboundEvent;
