use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Where tickets are filed: fixed per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTarget {
    pub project_key: String,
    pub issue_type_name: String,
}

impl TicketTarget {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if either value is blank.
    pub fn new(
        project_key: impl Into<String>,
        issue_type_name: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let project_key = project_key.into();
        let issue_type_name = issue_type_name.into();
        if project_key.trim().is_empty() {
            return Err(CoreError::Validation("project key is empty".into()));
        }
        if issue_type_name.trim().is_empty() {
            return Err(CoreError::Validation("issue type name is empty".into()));
        }
        Ok(Self {
            project_key,
            issue_type_name,
        })
    }
}

/// Human-facing ticket text derived from one fired policy record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketContent {
    pub summary: String,
    pub description: String,
}

/// Everything the tracker needs to open one ticket.
///
/// Built fresh for each fired record and dropped after submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketRequest {
    pub summary: String,
    pub description: String,
    pub project_key: String,
    pub issue_type_name: String,
}

impl TicketRequest {
    #[must_use]
    pub fn new(target: &TicketTarget, content: TicketContent) -> Self {
        Self {
            summary: content.summary,
            description: content.description,
            project_key: target.project_key.clone(),
            issue_type_name: target.issue_type_name.clone(),
        }
    }
}

/// Tracker-assigned identity of a created ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketHandle {
    /// Human-readable key, e.g. `SEC-42`.
    pub key: String,
    /// Tracker-internal id, when the tracker reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
