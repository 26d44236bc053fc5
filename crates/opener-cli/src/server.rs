//! HTTP receiver for CloudEvents deliveries.
//!
//! `tiny_http` accepts connections on a blocking thread (its `recv` blocks, so
//! the accept loop runs under `spawn_blocking`). Each delivery is then handled
//! as its own tokio task, so a slow tracker call does not hold up other
//! deliveries. Deliveries share only the dispatcher, which is read-only.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use opener_bridge::{DispatchError, DispatchOutcome, Dispatcher, EventError, InboundEvent};
use opener_jira::Tracker;
use tokio::runtime::Handle;

/// A delivery refused before it reached the dispatcher.
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("method {0} not allowed, deliveries must be POST")]
    MethodNotAllowed(String),

    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("unable to read body: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Event(#[from] EventError),
}

impl Rejection {
    const fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::TooLarge { .. } => 413,
            Self::Read(_) => 400,
            Self::Event(error) => error.class().status_code(),
        }
    }
}

/// Serve until Ctrl-C.
pub async fn run<T: Tracker + 'static>(
    server: Arc<tiny_http::Server>,
    dispatcher: Arc<Dispatcher<T>>,
    max_body_bytes: usize,
) -> anyhow::Result<()> {
    let mut accept = tokio::spawn(serve(Arc::clone(&server), dispatcher, max_body_bytes));

    tokio::select! {
        joined = &mut accept => {
            joined.context("receiver task failed")??;
            anyhow::bail!("receiver stopped accepting deliveries");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
        }
    }
    tracing::info!("shutting down receiver");
    server.unblock();

    accept.await.context("receiver task failed")?
}

/// Accept deliveries until the server is unblocked.
pub async fn serve<T: Tracker + 'static>(
    server: Arc<tiny_http::Server>,
    dispatcher: Arc<Dispatcher<T>>,
    max_body_bytes: usize,
) -> anyhow::Result<()> {
    let runtime = Handle::current();
    tokio::task::spawn_blocking(move || {
        for request in server.incoming_requests() {
            let dispatcher = Arc::clone(&dispatcher);
            runtime.spawn(deliver(request, dispatcher, max_body_bytes));
        }
    })
    .await
    .context("accept loop panicked")
}

async fn deliver<T: Tracker>(
    mut request: tiny_http::Request,
    dispatcher: Arc<Dispatcher<T>>,
    max_body_bytes: usize,
) {
    let read = tokio::task::spawn_blocking(move || {
        let event = read_event(&mut request, max_body_bytes);
        (request, event)
    })
    .await;
    let (request, event) = match read {
        Ok(pair) => pair,
        Err(error) => {
            tracing::error!(%error, "request reader panicked");
            return;
        }
    };

    let (status, message) = match event {
        Ok(event) => {
            let result = dispatcher.handle(&event).await;
            let status = report(&event, &result);
            (status, result.err().map(|e| e.to_string()).unwrap_or_default())
        }
        Err(rejection) => {
            tracing::error!(error = %rejection, "rejected delivery");
            (rejection.status_code(), rejection.to_string())
        }
    };

    let responded = tokio::task::spawn_blocking(move || {
        request.respond(tiny_http::Response::from_string(message).with_status_code(status))
    })
    .await;
    if let Ok(Err(error)) = responded {
        tracing::warn!(%error, "failed to write response");
    }
}

fn read_event(
    request: &mut tiny_http::Request,
    max_body_bytes: usize,
) -> Result<InboundEvent, Rejection> {
    if *request.method() != tiny_http::Method::Post {
        return Err(Rejection::MethodNotAllowed(request.method().to_string()));
    }
    if request.body_length().is_some_and(|len| len > max_body_bytes) {
        return Err(Rejection::TooLarge {
            limit: max_body_bytes,
        });
    }

    let mut body = Vec::new();
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(1);
    request.as_reader().take(limit).read_to_end(&mut body)?;
    if body.len() > max_body_bytes {
        return Err(Rejection::TooLarge {
            limit: max_body_bytes,
        });
    }

    let headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .map(|h| (h.field.to_string(), h.value.to_string()))
        .collect();
    let event = InboundEvent::from_http(
        headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        body,
    )?;
    Ok(event)
}

/// Log a dispatch result and map it to an HTTP status.
pub fn report(event: &InboundEvent, result: &Result<DispatchOutcome, DispatchError>) -> u16 {
    match result {
        Ok(DispatchOutcome::Filtered) => 200,
        Ok(DispatchOutcome::Processed { opened, skipped }) => {
            tracing::info!(
                id = %event.id,
                opened = opened.len(),
                skipped,
                "event processed"
            );
            200
        }
        Err(error) => {
            tracing::error!(
                id = %event.id,
                retryable = error.is_retryable(),
                %error,
                "event failed"
            );
            error.status_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use opener_core::entities::{TicketHandle, TicketRequest, TicketTarget};
    use opener_jira::TrackerError;

    use super::*;

    const EVENT_TYPE: &str = "dev.chainguard.policy.validation.changed.v1";

    #[derive(Default)]
    struct StubTracker {
        summaries: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Tracker for StubTracker {
        async fn create_issue(
            &self,
            request: &TicketRequest,
        ) -> Result<TicketHandle, TrackerError> {
            self.summaries.lock().unwrap().push(request.summary.clone());
            if self.fail {
                return Err(TrackerError::Api {
                    status: 500,
                    message: "down".into(),
                });
            }
            Ok(TicketHandle {
                key: "SEC-1".into(),
                id: None,
            })
        }
    }

    struct Running {
        base: String,
        server: Arc<tiny_http::Server>,
        tracker: Arc<StubTracker>,
        task: tokio::task::JoinHandle<anyhow::Result<()>>,
    }

    impl Running {
        async fn stop(self) {
            self.server.unblock();
            self.task.await.unwrap().unwrap();
        }
    }

    fn start(tracker: StubTracker, max_body_bytes: usize) -> Running {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let tracker = Arc::new(tracker);
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&tracker),
            TicketTarget::new("SEC", "Bug").unwrap(),
            EVENT_TYPE,
        ));
        let task = tokio::spawn(serve(Arc::clone(&server), dispatcher, max_body_bytes));
        Running {
            base: format!("http://127.0.0.1:{port}/"),
            server,
            tracker,
            task,
        }
    }

    fn payload(valid: bool) -> String {
        serde_json::json!({
            "imageId": "img",
            "clusterId": "cluster",
            "policies": {
                "cve-scan": {
                    "valid": valid,
                    "change": "NEW",
                    "lastChecked": "2023-04-01T12:30:00Z",
                    "diagnostic": "CVE-1234"
                }
            }
        })
        .to_string()
    }

    async fn post_binary(base: &str, event_type: &str, body: String) -> u16 {
        reqwest::Client::new()
            .post(base)
            .header("content-type", "application/json")
            .header("ce-specversion", "1.0")
            .header("ce-id", "evt-1")
            .header("ce-source", "urn:test")
            .header("ce-type", event_type)
            .body(body)
            .send()
            .await
            .unwrap()
            .status()
            .as_u16()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn binary_delivery_opens_issue() {
        let running = start(StubTracker::default(), 1024 * 1024);

        let status = post_binary(&running.base, EVENT_TYPE, payload(false)).await;

        assert_eq!(status, 200);
        assert_eq!(
            *running.tracker.summaries.lock().unwrap(),
            vec!["Policy cve-scan failed".to_string()]
        );
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn structured_delivery_is_accepted() {
        let running = start(StubTracker::default(), 1024 * 1024);
        let data: serde_json::Value = serde_json::from_str(&payload(false)).unwrap();
        let body = serde_json::json!({
            "specversion": "1.0",
            "id": "evt-2",
            "source": "urn:test",
            "type": EVENT_TYPE,
            "data": data,
        });

        let status = reqwest::Client::new()
            .post(&running.base)
            .header("content-type", "application/cloudevents+json")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
            .status()
            .as_u16();

        assert_eq!(status, 200);
        assert_eq!(running.tracker.summaries.lock().unwrap().len(), 1);
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn other_event_type_is_acknowledged() {
        let running = start(StubTracker::default(), 1024 * 1024);

        let status = post_binary(&running.base, "dev.example.other", payload(false)).await;

        assert_eq!(status, 200);
        assert!(running.tracker.summaries.lock().unwrap().is_empty());
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_payload_is_bad_request() {
        let running = start(StubTracker::default(), 1024 * 1024);

        let status = post_binary(&running.base, EVENT_TYPE, "{".into()).await;

        assert_eq!(status, 400);
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tracker_failure_is_server_error() {
        let tracker = StubTracker {
            fail: true,
            ..Default::default()
        };
        let running = start(tracker, 1024 * 1024);

        let status = post_binary(&running.base, EVENT_TYPE, payload(false)).await;

        assert_eq!(status, 500);
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_type_is_bad_request() {
        let running = start(StubTracker::default(), 1024 * 1024);

        let status = reqwest::Client::new()
            .post(&running.base)
            .body(payload(false))
            .send()
            .await
            .unwrap()
            .status()
            .as_u16();

        assert_eq!(status, 400);
        running.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn get_is_not_allowed() {
        let running = start(StubTracker::default(), 1024 * 1024);

        let status = reqwest::get(&running.base).await.unwrap().status().as_u16();

        assert_eq!(status, 405);
        running.stop().await;
    }

    // -----------------------------------------------------------------------
    // Failure logging
    // -----------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn report_captured(result: &Result<DispatchOutcome, DispatchError>) -> (u16, String) {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        let mut event = InboundEvent::new(EVENT_TYPE, b"{}".to_vec());
        event.id = "evt-42".into();
        let status = tracing::subscriber::with_default(subscriber, || report(&event, result));

        let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        (status, logs)
    }

    #[test]
    fn tracker_failure_is_logged_with_error_text() {
        let result = Err(DispatchError::Dependency {
            policy: "b-cve-scan".into(),
            source: TrackerError::Api {
                status: 503,
                message: "tracker unavailable".into(),
            },
        });

        let (status, logs) = report_captured(&result);

        assert_eq!(status, 500);
        assert!(logs.contains("ERROR"), "logs were: {logs}");
        assert!(
            logs.contains(
                "unable to create Jira issue for policy 'b-cve-scan': API error (503): tracker unavailable"
            ),
            "logs were: {logs}"
        );
        assert!(logs.contains("retryable=true"), "logs were: {logs}");
        assert!(logs.contains("evt-42"), "logs were: {logs}");
    }

    #[test]
    fn decode_failure_is_logged_as_not_retryable() {
        let source = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let result = Err(DispatchError::Decode(source));

        let (status, logs) = report_captured(&result);

        assert_eq!(status, 400);
        assert!(logs.contains("ERROR"), "logs were: {logs}");
        assert!(logs.contains("unable to unmarshal data"), "logs were: {logs}");
        assert!(logs.contains("retryable=false"), "logs were: {logs}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn oversized_body_is_rejected() {
        let running = start(StubTracker::default(), 16);

        let status = post_binary(&running.base, EVENT_TYPE, payload(false)).await;

        assert_eq!(status, 413);
        assert!(running.tracker.summaries.lock().unwrap().is_empty());
        running.stop().await;
    }
}
