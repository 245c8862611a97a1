//! Extraction status polling
//!
//! A poll is a spawned task that checks a batch's status once per interval,
//! reports every status to a progress callback, and ends on the first
//! terminal status, the first failed check, or cancellation. The caller owns
//! the task through a [`PollHandle`]; several polls can run side by side.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::StanShareClient;
use crate::error::Result;
use crate::transport::HttpTransport;
use crate::types::ExtractionStatus;

/// How a poll ended without error
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The batch reached `completed` or `failed`
    Finished(ExtractionStatus),
    /// The poll was cancelled before a terminal status arrived
    Stopped,
}

impl PollOutcome {
    pub fn status(&self) -> Option<&ExtractionStatus> {
        match self {
            PollOutcome::Finished(status) => Some(status),
            PollOutcome::Stopped => None,
        }
    }
}

/// Owned handle to a running poll.
///
/// Dropping the handle cancels the poll unless it was [`detach`](Self::detach)ed.
#[must_use = "dropping a PollHandle cancels the poll"]
pub struct PollHandle {
    batch_id: String,
    interval: Duration,
    token: CancellationToken,
    task: Option<JoinHandle<Result<PollOutcome>>>,
}

impl PollHandle {
    pub(crate) fn start<T, F>(
        client: StanShareClient<T>,
        batch_id: String,
        interval: Duration,
        token: CancellationToken,
        mut on_progress: F,
    ) -> Self
    where
        T: HttpTransport,
        F: FnMut(&ExtractionStatus) + Send + 'static,
    {
        let task_token = token.clone();
        let task_batch = batch_id.clone();

        let task = tokio::spawn(async move {
            let outcome = run(&client, &task_batch, interval, &task_token, &mut on_progress).await;
            // Marks the poll inactive for the client's registry
            task_token.cancel();
            outcome
        });

        Self {
            batch_id,
            interval,
            token,
            task: Some(task),
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the recurring check is still scheduled
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop the recurring check. Safe to call any number of times.
    ///
    /// A check already in flight still completes and may still report
    /// progress; no further checks are made after it.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Wait for the poll to end.
    ///
    /// Resolves once: with the terminal status, with `Stopped` after
    /// cancellation, or with the error of the check that failed.
    pub async fn wait(mut self) -> Result<PollOutcome> {
        let Some(task) = self.task.take() else {
            return Ok(PollOutcome::Stopped);
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // Runtime shutting down
            Err(_) => Ok(PollOutcome::Stopped),
        }
    }

    /// Let the poll run to completion in the background.
    ///
    /// Progress still reaches the callback; a failed check is only logged.
    /// [`StanShareClient::stop_polling`] can still cancel it.
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.token.cancel();
        }
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("batch_id", &self.batch_id)
            .field("interval", &self.interval)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

async fn run<T, F>(
    client: &StanShareClient<T>,
    batch_id: &str,
    interval: Duration,
    token: &CancellationToken,
    on_progress: &mut F,
) -> Result<PollOutcome>
where
    T: HttpTransport,
    F: FnMut(&ExtractionStatus) + Send,
{
    // First check one interval after start, like a recurring timer
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(batch_id, interval_ms = interval.as_millis() as u64, "Polling extraction status");

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!(batch_id, "Polling stopped");
                return Ok(PollOutcome::Stopped);
            }
            _ = ticker.tick() => {}
        }

        let status = match client.get_extraction_status(batch_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(batch_id, error = %e, "Error polling extraction status");
                return Err(e);
            }
        };

        on_progress(&status);

        if status.is_terminal() {
            tracing::info!(batch_id, status = %status.status, "Extraction finished");
            return Ok(PollOutcome::Finished(status));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::transport::{HttpResponse, MockTransport};
    use crate::types::BatchState;

    const STATUS_KEY: &str = "GET /api/extract/status";

    fn client_with(mock: &MockTransport) -> StanShareClient<MockTransport> {
        StanShareClient::with_transport(&ClientConfig::default(), mock.clone())
    }

    fn recorder() -> (Arc<Mutex<Vec<BatchState>>>, impl FnMut(&ExtractionStatus) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |s: &ExtractionStatus| sink.lock().push(s.status.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_completed() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"batch_id": "b1", "status": "pending"}));
        mock.add_json(STATUS_KEY, json!({"batch_id": "b1", "status": "pending"}));
        mock.add_json(STATUS_KEY, json!({"batch_id": "b1", "status": "completed", "progress": 100}));
        // Would be consumed if the poll kept going
        mock.add_json(STATUS_KEY, json!({"batch_id": "b1", "status": "pending"}));

        let client = client_with(&mock);
        let (seen, on_progress) = recorder();
        let handle = client.poll_extraction_status("b1", on_progress, Some(Duration::from_millis(2000))).unwrap();

        let outcome = handle.wait().await.unwrap();

        assert_eq!(
            *seen.lock(),
            vec![BatchState::Pending, BatchState::Pending, BatchState::Completed]
        );
        assert_eq!(mock.calls_to(STATUS_KEY), 3);
        assert_eq!(outcome.status().map(|s| &s.status), Some(&BatchState::Completed));
        assert_eq!(client.active_polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failed_on_first_tick() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"status": "failed", "error": "EDGAR unavailable"}));

        let client = client_with(&mock);
        let (seen, on_progress) = recorder();
        let outcome = client
            .poll_extraction_status("b2", on_progress, None)
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(mock.calls_to(STATUS_KEY), 1);
        assert_eq!(*seen.lock(), vec![BatchState::Failed]);
        let status = outcome.status().unwrap();
        assert_eq!(status.status, BatchState::Failed);
        assert_eq!(status.extra["error"], json!("EDGAR unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_surfaces_tick_error() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"status": "processing"}));
        mock.add_response(
            STATUS_KEY,
            Ok(HttpResponse::new(500, r#"{"error": "database locked"}"#)),
        );

        let client = client_with(&mock);
        let (seen, on_progress) = recorder();
        let err = client
            .poll_extraction_status("b3", on_progress, None)
            .unwrap()
            .wait()
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        assert_eq!(err.to_string(), "database locked");
        assert_eq!(*seen.lock(), vec![BatchState::Processing]);
        assert_eq!(client.active_polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_interval() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"status": "completed"}));

        let client = client_with(&mock);
        let handle = client.poll_extraction_status("b4", |_| {}, Some(Duration::from_secs(5))).unwrap();

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(mock.call_count(), 0);
        assert!(handle.is_active());

        let outcome = handle.wait().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Finished(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let mock = MockTransport::new();
        let client = client_with(&mock);
        let handle = client.poll_extraction_status("b5", |_| {}, None).unwrap();

        assert!(handle.is_active());
        handle.stop();
        handle.stop();
        assert!(!handle.is_active());

        let outcome = handle.wait().await.unwrap();
        assert_eq!(outcome, PollOutcome::Stopped);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_check_still_reports() {
        let mock = MockTransport::new();
        mock.add_delayed(
            STATUS_KEY,
            Duration::from_millis(500),
            Ok(HttpResponse::json(&json!({"status": "running"}))),
        );

        let client = client_with(&mock);
        let (seen, on_progress) = recorder();
        let handle = client.poll_extraction_status("b6", on_progress, Some(Duration::from_millis(1000))).unwrap();

        // Stop while the first check is in flight
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(mock.call_count(), 1);
        handle.stop();

        let outcome = handle.wait().await.unwrap();
        assert_eq!(outcome, PollOutcome::Stopped);
        assert_eq!(*seen.lock(), vec![BatchState::Running]);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_polls_are_independent() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"batch_id": "a", "status": "completed"}));

        let client = client_with(&mock);
        let first = client.poll_extraction_status("a", |_| {}, Some(Duration::from_millis(100))).unwrap();
        let second = client.poll_extraction_status("b", |_| {}, Some(Duration::from_secs(60))).unwrap();
        assert_eq!(client.active_polls(), 2);

        let outcome = first.wait().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Finished(_)));
        assert!(second.is_active());
        assert_eq!(client.active_polls(), 1);

        second.stop();
        assert_eq!(second.wait().await.unwrap(), PollOutcome::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_but_detach_does_not() {
        let mock = MockTransport::new();
        mock.add_json(STATUS_KEY, json!({"status": "completed"}));

        let client = client_with(&mock);
        drop(client.poll_extraction_status("dropped", |_| {}, None).unwrap());
        assert_eq!(client.active_polls(), 0);

        let (seen, on_progress) = recorder();
        client.poll_extraction_status("detached", on_progress, None).unwrap().detach();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(*seen.lock(), vec![BatchState::Completed]);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_rejected() {
        let mock = MockTransport::new();
        let client = client_with(&mock);

        let err = client
            .poll_extraction_status("b7", |_| {}, Some(Duration::ZERO))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert_eq!(client.active_polls(), 0);

        // A zero configured interval is caught the same way
        let config = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        let client = StanShareClient::with_transport(&config, mock.clone());
        assert!(client.poll_extraction_status("b7", |_| {}, None).is_err());
        assert_eq!(mock.call_count(), 0);
    }
}
