//! Policy change directionality and classifier decisions.
//!
//! `Change` serializes in the event bus wire form (`NEW`, `DEGRADED`,
//! `IMPROVED`). It is closed: an unknown tag fails payload decoding instead
//! of falling through to a default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// Direction of a policy's compliance state since its previous evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Change {
    /// First evaluation of this policy for the artifact.
    New,
    /// Compliance got worse.
    Degraded,
    /// Compliance got better.
    Improved,
}

impl Change {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Degraded => "DEGRADED",
            Self::Improved => "IMPROVED",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Why a policy record did not produce a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The policy is satisfied.
    Compliant,
    /// The policy still fails but is trending in the right direction.
    Improved,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::Improved => "improved",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one policy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Skip(SkipReason),
    Fire,
}

impl Decision {
    #[must_use]
    pub const fn fires(self) -> bool {
        matches!(self, Self::Fire)
    }
}
