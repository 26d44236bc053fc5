//! Domain entities exchanged between the event bus, the classifier and the
//! tracker.

mod occurrence;
mod ticket;

pub use occurrence::{Actor, Occurrence, OccurrencePayload, PolicyResult};
pub use ticket::{TicketContent, TicketHandle, TicketRequest, TicketTarget};
