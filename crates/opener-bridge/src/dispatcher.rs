//! Event dispatcher: turns one policy-changed event into zero or more tracker
//! issues.
//!
//! ```text
//! received ─┬─ other type ──────────────────────────────→ Filtered
//!           └─ decode ─┬─ malformed ────────────────────→ Err(client)
//!                      └─ for each policy (name order) ─┬─ skip
//!                                                       └─ fire → create issue
//!                                                            └─ failed → Err(dependency)
//! ```
//!
//! Processing stops at the first failed creation. Issues opened before it stay
//! open.

use opener_core::entities::{OccurrencePayload, TicketHandle, TicketRequest, TicketTarget};
use opener_core::enums::Decision;
use opener_core::{classify, ticket_content};
use opener_jira::Tracker;

use crate::error::DispatchError;
use crate::event::InboundEvent;

/// Result of a successfully handled delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event type is not ours; nothing was done.
    Filtered,
    /// The event was decoded and every firing policy got an issue.
    Processed {
        opened: Vec<TicketHandle>,
        skipped: usize,
    },
}

/// Handles policy-changed events with an injected tracker.
///
/// Holds no per-event state, so one instance can serve concurrent deliveries.
pub struct Dispatcher<T> {
    tracker: T,
    target: TicketTarget,
    event_type: String,
}

impl<T: Tracker> Dispatcher<T> {
    #[must_use]
    pub fn new(tracker: T, target: TicketTarget, event_type: impl Into<String>) -> Self {
        Self {
            tracker,
            target,
            event_type: event_type.into(),
        }
    }

    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    #[must_use]
    pub const fn target(&self) -> &TicketTarget {
        &self.target
    }

    /// Process one delivery.
    ///
    /// # Errors
    ///
    /// Returns a client-class [`DispatchError`] when the event has no data or
    /// the data is not an occurrence, and [`DispatchError::Dependency`] for the
    /// first issue the tracker fails to create.
    pub async fn handle(&self, event: &InboundEvent) -> Result<DispatchOutcome, DispatchError> {
        if event.event_type != self.event_type {
            tracing::debug!(event_type = %event.event_type, id = %event.id, "ignoring event");
            return Ok(DispatchOutcome::Filtered);
        }

        let payload: OccurrencePayload = event.data_as()?;
        if let Some(actor) = payload.actor() {
            tracing::debug!(id = %event.id, actor = %actor.subject, "policy change reported");
        }
        let occurrence = payload.into_occurrence();

        let mut opened = Vec::new();
        let mut skipped = 0;
        for (name, result) in &occurrence.policies {
            match classify(result) {
                Decision::Skip(reason) => {
                    tracing::debug!(policy = %name, %reason, "no issue needed");
                    skipped += 1;
                }
                Decision::Fire => {
                    let request = TicketRequest::new(
                        &self.target,
                        ticket_content(&occurrence, name, result),
                    );
                    let handle = match self.tracker.create_issue(&request).await {
                        Ok(handle) => handle,
                        Err(source) => {
                            tracing::warn!(
                                policy = %name,
                                error = %source,
                                already_opened = opened.len(),
                                "abandoning remaining policies for event"
                            );
                            return Err(DispatchError::Dependency {
                                policy: name.clone(),
                                source,
                            });
                        }
                    };
                    tracing::info!(
                        key = %handle.key,
                        policy = %name,
                        image = %occurrence.image_id,
                        cluster = %occurrence.cluster_id,
                        "Opened issue: {}",
                        handle.key
                    );
                    opened.push(handle);
                }
            }
        }

        Ok(DispatchOutcome::Processed { opened, skipped })
    }
}
