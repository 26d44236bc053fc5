//! The tracker seam used by the dispatcher.

use std::future::Future;
use std::sync::Arc;

use opener_core::entities::{TicketHandle, TicketRequest};

use crate::error::TrackerError;

/// An issue tracker that can open one ticket per call.
///
/// Implementations own their connection state and credentials; callers
/// construct one per process and share it across deliveries. No retries
/// happen behind this call.
pub trait Tracker: Send + Sync {
    fn create_issue(
        &self,
        request: &TicketRequest,
    ) -> impl Future<Output = Result<TicketHandle, TrackerError>> + Send;
}

impl<T: Tracker + ?Sized> Tracker for &T {
    fn create_issue(
        &self,
        request: &TicketRequest,
    ) -> impl Future<Output = Result<TicketHandle, TrackerError>> + Send {
        (**self).create_issue(request)
    }
}

impl<T: Tracker + ?Sized> Tracker for Arc<T> {
    fn create_issue(
        &self,
        request: &TicketRequest,
    ) -> impl Future<Output = Result<TicketHandle, TrackerError>> + Send {
        (**self).create_issue(request)
    }
}
