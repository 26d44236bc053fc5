//! Jira REST client (API v2, plain-text descriptions).

use std::time::Duration;

use opener_config::JiraConfig;
use opener_core::entities::{TicketHandle, TicketRequest};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::http::check_response;
use crate::tracker::Tracker;

#[derive(Serialize)]
struct CreateIssueBody<'a> {
    fields: IssueFields<'a>,
}

#[derive(Serialize)]
struct IssueFields<'a> {
    project: ProjectRef<'a>,
    issuetype: IssueTypeRef<'a>,
    summary: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct ProjectRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct IssueTypeRef<'a> {
    name: &'a str,
}

impl<'a> CreateIssueBody<'a> {
    fn from_request(request: &'a TicketRequest) -> Self {
        Self {
            fields: IssueFields {
                project: ProjectRef {
                    key: request.project_key.as_str(),
                },
                issuetype: IssueTypeRef {
                    name: request.issue_type_name.as_str(),
                },
                summary: request.summary.as_str(),
                description: request.description.as_str(),
            },
        }
    }
}

#[derive(Deserialize)]
struct CreatedIssue {
    id: Option<String>,
    key: String,
}

/// HTTP client for the Jira issue API.
///
/// Built once per process; the inner `reqwest::Client` pools connections.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    token: String,
}

impl JiraClient {
    /// Create a client from the `[jira]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Http`] if the underlying `reqwest::Client`
    /// fails to build (e.g., TLS backend initialization).
    pub fn new(config: &JiraConfig) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("issue-opener/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    fn issue_url(&self) -> String {
        format!("{}/rest/api/2/issue", self.base_url)
    }
}

impl Tracker for JiraClient {
    /// POST a new issue and return its key.
    async fn create_issue(&self, request: &TicketRequest) -> Result<TicketHandle, TrackerError> {
        tracing::debug!(
            project = %request.project_key,
            issue_type = %request.issue_type_name,
            summary = %request.summary,
            "creating Jira issue"
        );

        let resp = self
            .http
            .post(self.issue_url())
            .basic_auth(&self.user, Some(&self.token))
            .json(&CreateIssueBody::from_request(request))
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let body = resp.text().await?;
        let created: CreatedIssue = serde_json::from_str(&body)
            .map_err(|e| TrackerError::Parse(format!("create issue response: {e}")))?;
        Ok(TicketHandle {
            key: created.key,
            id: created.id,
        })
    }
}
