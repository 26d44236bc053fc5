//! Record classifier: decides whether a policy record opens a ticket and
//! renders the ticket text when it does.
//!
//! ```text
//! valid            → skip (compliant)
//! invalid+IMPROVED → skip (improved)
//! invalid+NEW      → fire
//! invalid+DEGRADED → fire
//! ```

use chrono::SecondsFormat;

use crate::entities::{Occurrence, PolicyResult, TicketContent};
use crate::enums::{Change, Decision, SkipReason};

/// Classify a single policy record.
///
/// Only `valid` and `change` take part in the decision.
#[must_use]
pub const fn classify(result: &PolicyResult) -> Decision {
    if result.valid {
        return Decision::Skip(SkipReason::Compliant);
    }
    match result.change {
        // An invalid policy that is improving is not treated as a new problem.
        // Whether that is the right product behavior is still open.
        Change::Improved => Decision::Skip(SkipReason::Improved),
        Change::New | Change::Degraded => Decision::Fire,
    }
}

/// Render the ticket summary and description for a fired policy record.
///
/// Pure function of its inputs: identical records give byte-identical text.
#[must_use]
pub fn ticket_content(occurrence: &Occurrence, name: &str, result: &PolicyResult) -> TicketContent {
    let last_checked = result
        .last_checked
        .to_rfc3339_opts(SecondsFormat::AutoSi, true);

    let description = [
        labeled("Image:", &occurrence.image_id),
        labeled("Cluster:", &occurrence.cluster_id),
        labeled("Policy:", name),
        labeled("Last Checked:", &last_checked),
        labeled("Diagnostic:", &result.diagnostic),
    ]
    .join("\n");

    TicketContent {
        summary: format!("Policy {name} failed"),
        description,
    }
}

/// Label padded to a fixed column, value quoted as inline code.
fn labeled(label: &str, value: &str) -> String {
    format!("{label:<14}`{value}`")
}
