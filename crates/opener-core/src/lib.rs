//! # opener-core
//!
//! Core types and the record classifier for the policy issue opener.
//!
//! - Entities decoded from policy-change events (`Occurrence`, `PolicyResult`)
//! - The closed `Change` enum and classifier `Decision`
//! - Ticket request and handle types exchanged with the tracker
//! - Deterministic ticket content rendering

pub mod classify;
pub mod entities;
pub mod enums;
pub mod errors;

pub use classify::{classify, ticket_content};
