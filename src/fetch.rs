use crate::reading::Reading;
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// How long a single fetch may take before it counts as failed.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Message sent from the fetcher to the main app.
#[derive(Debug)]
pub enum FetchUpdate {
    /// A complete snapshot replacing whatever the app holds.
    Snapshot(Vec<Reading>),
    /// The fetch failed; the app keeps its previous snapshot.
    Failed(String),
}

/// Handle for requesting an immediate out-of-cycle fetch.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl RefreshHandle {
    /// Asks the fetcher to fetch now. Best-effort: ignored once the
    /// fetcher has exited.
    pub fn request_refresh(&self) {
        let _ = self.tx.send(());
    }

    /// Handle wired to nothing, for state tests that never fetch.
    #[cfg(test)]
    pub(crate) fn disconnected() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        Self { tx }
    }
}

/// Fetches one snapshot from the endpoint.
async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<Vec<Reading>> {
    let response = client
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .context("request failed")?
        .error_for_status()
        .context("server returned an error status")?;

    let readings = response
        .json::<Vec<Reading>>()
        .await
        .context("response body was not a readings array")?;

    Ok(readings)
}

/// Spawns the fetcher task: one immediate fetch, then one per interval
/// tick until the app side hangs up. Slow fetches skip overlapping ticks
/// rather than queueing them.
pub fn spawn_fetcher(
    url: String,
    fetch_interval: Duration,
    tx: mpsc::UnboundedSender<FetchUpdate>,
) -> Result<RefreshHandle> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<()>();

    tokio::spawn(async move {
        let mut tick = interval(fetch_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // First tick fires immediately, so the dashboard populates on
            // mount rather than after one full interval. A closed refresh
            // channel disables that branch and leaves the periodic schedule
            // running off ticks alone.
            tokio::select! {
                _ = tick.tick() => {}
                Some(()) = refresh_rx.recv() => {}
            }

            let update = match fetch_snapshot(&client, &url).await {
                Ok(readings) => FetchUpdate::Snapshot(readings),
                Err(e) => FetchUpdate::Failed(format!("{e:#}")),
            };

            if tx.send(update).is_err() {
                // App side closed, exit task
                break;
            }
        }
    });

    Ok(RefreshHandle { tx: refresh_tx })
}
