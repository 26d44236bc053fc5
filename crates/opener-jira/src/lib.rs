//! # opener-jira
//!
//! Ticket tracker seam and Jira REST client for the policy issue opener.
//!
//! The dispatcher only needs one operation, "create issue", expressed by the
//! [`Tracker`] trait. [`JiraClient`] implements it against Jira's REST API v2
//! with basic auth (account + API token).

mod client;
mod error;
mod http;
mod tracker;

pub use client::JiraClient;
pub use error::TrackerError;
pub use tracker::Tracker;
