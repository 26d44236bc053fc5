//! Jira tracker configuration.

use opener_core::entities::TicketTarget;
use opener_core::errors::CoreError;
use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Jira base URL (e.g., `https://example.atlassian.net`).
    #[serde(default)]
    pub url: String,

    /// Account email or username used for basic auth.
    #[serde(default)]
    pub user: String,

    /// API token paired with `user`.
    #[serde(default)]
    pub token: String,

    /// Project key new issues are filed under (e.g., `SEC`).
    #[serde(default)]
    pub project: String,

    /// Issue type name (e.g., `Bug`, `Task`).
    #[serde(default)]
    pub issue_type: String,

    /// Per-request timeout for the Jira REST API, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            token: String::new(),
            project: String::new(),
            issue_type: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl JiraConfig {
    /// Check if every field needed to open issues is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of required fields that are empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("url", &self.url),
            ("user", &self.user),
            ("token", &self.token),
            ("project", &self.project),
            ("issue_type", &self.issue_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Jira URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Destination for every ticket opened by this process.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the project or issue type is blank.
    pub fn target(&self) -> Result<TicketTarget, CoreError> {
        TicketTarget::new(self.project.clone(), self.issue_type.clone())
    }
}
