//! Optional best-effort reporting of earned points to a remote service
//!
//! Local progress never waits on the remote side: `notify` hands the points
//! to a background task and returns immediately. Failures are logged only.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SyncError;

/// Attempts per notification, including the first
pub const MAX_ATTEMPTS: u32 = 3;

/// Receives points as they are earned
pub trait ScoreSync: Send + Sync {
    /// Fire-and-forget; must not block
    fn notify(&self, points: u32, reason: &str);
}

/// Body posted to the sync endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorePayload {
    pub game: &'static str,
    pub points: u32,
    pub reason: String,
}

/// Posts each award as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpScoreSync {
    client: Client,
    endpoint: String,
    backoff: Duration,
}

impl HttpScoreSync {
    const GAME: &'static str = "kanji-stroke";

    pub fn new(endpoint: impl Into<String>) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, endpoint: endpoint.into(), backoff: Duration::from_millis(500) })
    }

    /// Base delay between attempts; doubled after each failure
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post once
    pub async fn send(&self, payload: &ScorePayload) -> Result<(), SyncError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status { status: status.as_u16() });
        }
        Ok(())
    }

    /// Post, retrying recoverable failures up to [`MAX_ATTEMPTS`] times
    pub async fn send_with_retry(&self, payload: &ScorePayload) -> Result<(), SyncError> {
        let mut delay = self.backoff;
        let mut attempt = 1;
        loop {
            match self.send(payload).await {
                Ok(()) => {
                    debug!(points = payload.points, attempt, "Score synced");
                    return Ok(());
                }
                Err(e) if e.is_recoverable() && attempt < MAX_ATTEMPTS => {
                    debug!(error = %e, attempt, "Score sync failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl ScoreSync for HttpScoreSync {
    fn notify(&self, points: u32, reason: &str) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime; score sync skipped");
            return;
        };
        let sync = self.clone();
        let payload = ScorePayload { game: Self::GAME, points, reason: reason.to_string() };
        handle.spawn(async move {
            if let Err(e) = sync.send_with_retry(&payload).await {
                warn!(error = %e, points = payload.points, "Score sync gave up");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let payload = ScorePayload { game: "kanji-stroke", points: 15, reason: "クイズ完了".into() };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["points"], 15);
        assert_eq!(json["game"], "kanji-stroke");
    }

    #[tokio::test]
    async fn unreachable_endpoint_gives_up_with_request_error() {
        // Nothing listens on the discard port
        let sync = HttpScoreSync::new("http://127.0.0.1:9/score")
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        let payload = ScorePayload { game: "kanji-stroke", points: 5, reason: "test".into() };
        let err = sync.send_with_retry(&payload).await.unwrap_err();
        assert!(matches!(err, SyncError::Request(_)));
    }

    #[test]
    fn notify_without_runtime_is_harmless() {
        let sync = HttpScoreSync::new("http://127.0.0.1:9/score").unwrap();
        sync.notify(10, "no runtime");
    }
}
