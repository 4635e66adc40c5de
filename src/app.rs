use crate::fetch::{FetchUpdate, RefreshHandle};
use crate::pager::Pager;
use crate::reading::Reading;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Main application state.
pub struct App {
    /// Latest known-good snapshot of readings.
    snapshot: Vec<Reading>,
    /// Table pagination over the snapshot.
    pub pager: Pager,
    /// Threshold separating On from Off.
    pub threshold: f64,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Channel receiver for fetch updates.
    rx: mpsc::UnboundedReceiver<FetchUpdate>,
    /// Handle for triggering an immediate fetch.
    refresh: RefreshHandle,
    /// When the last successful fetch landed.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Consecutive failed fetches since the last success.
    pub consecutive_failures: u32,
}

impl App {
    pub fn new(
        threshold: f64,
        page_size: usize,
        rx: mpsc::UnboundedReceiver<FetchUpdate>,
        refresh: RefreshHandle,
    ) -> Self {
        Self {
            snapshot: Vec::new(),
            pager: Pager::new(page_size),
            threshold,
            should_quit: false,
            rx,
            refresh,
            last_refresh: None,
            consecutive_failures: 0,
        }
    }

    /// Drains any pending fetch updates. A successful fetch replaces the
    /// snapshot wholesale; a failure is logged and the previous snapshot
    /// kept until the next tick.
    pub fn process_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                FetchUpdate::Snapshot(readings) => {
                    tracing::debug!(count = readings.len(), "snapshot replaced");
                    self.snapshot = readings;
                    self.pager.set_len(self.snapshot.len());
                    self.last_refresh = Some(Utc::now());
                    self.consecutive_failures = 0;
                }
                FetchUpdate::Failed(message) => {
                    self.consecutive_failures += 1;
                    tracing::warn!(
                        failures = self.consecutive_failures,
                        "fetch failed, keeping previous snapshot: {message}"
                    );
                }
            }
        }
    }

    /// The full current snapshot.
    pub fn snapshot(&self) -> &[Reading] {
        &self.snapshot
    }

    /// The slice of readings on the current table page.
    pub fn current_page_rows(&self) -> &[Reading] {
        let (start, end) = self.pager.page_bounds();
        &self.snapshot[start..end]
    }

    /// Moves the table to the next page.
    pub fn next_page(&mut self) {
        self.pager.next_page();
    }

    /// Moves the table to the previous page.
    pub fn previous_page(&mut self) {
        self.pager.previous_page();
    }

    /// Requests an immediate out-of-cycle fetch.
    pub fn refresh_now(&self) {
        self.refresh.request_refresh();
    }

    /// Signals the app to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(id: i64, value: f64) -> Reading {
        Reading {
            id,
            value,
            timestamp: Utc.with_ymd_and_hms(2024, 11, 2, 14, 30, 0).unwrap(),
        }
    }

    fn test_app() -> (App, mpsc::UnboundedSender<FetchUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(300.0, 15, rx, RefreshHandle::disconnected());
        (app, tx)
    }

    #[test]
    fn test_snapshot_replaces_previous() {
        let (mut app, tx) = test_app();

        tx.send(FetchUpdate::Snapshot(vec![reading(1, 310.0)]))
            .unwrap();
        app.process_updates();
        assert_eq!(app.snapshot().len(), 1);

        tx.send(FetchUpdate::Snapshot(vec![
            reading(2, 150.0),
            reading(3, 200.0),
        ]))
        .unwrap();
        app.process_updates();

        assert_eq!(app.snapshot().len(), 2);
        assert_eq!(app.snapshot()[0].id, 2);
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_failure_retains_previous_snapshot() {
        let (mut app, tx) = test_app();

        tx.send(FetchUpdate::Snapshot(vec![
            reading(1, 310.0),
            reading(2, 150.0),
        ]))
        .unwrap();
        app.process_updates();

        tx.send(FetchUpdate::Failed("connection refused".to_string()))
            .unwrap();
        app.process_updates();

        assert_eq!(app.snapshot().len(), 2);
        assert_eq!(app.consecutive_failures, 1);

        tx.send(FetchUpdate::Snapshot(vec![reading(3, 99.0)]))
            .unwrap();
        app.process_updates();
        assert_eq!(app.consecutive_failures, 0);
    }

    #[test]
    fn test_pager_clamps_on_shrinking_snapshot() {
        let (mut app, tx) = test_app();

        let big: Vec<Reading> = (0..45).map(|i| reading(i, i as f64)).collect();
        tx.send(FetchUpdate::Snapshot(big)).unwrap();
        app.process_updates();

        app.next_page();
        app.next_page();
        assert_eq!(app.pager.current_page(), 3);

        tx.send(FetchUpdate::Snapshot(vec![reading(0, 1.0)])).unwrap();
        app.process_updates();

        assert_eq!(app.pager.current_page(), 1);
        assert_eq!(app.current_page_rows().len(), 1);
    }

    #[test]
    fn test_current_page_rows_slices_snapshot() {
        let (mut app, tx) = test_app();

        let snapshot: Vec<Reading> = (0..20).map(|i| reading(i, i as f64)).collect();
        tx.send(FetchUpdate::Snapshot(snapshot)).unwrap();
        app.process_updates();

        assert_eq!(app.current_page_rows().len(), 15);
        app.next_page();
        assert_eq!(app.current_page_rows().len(), 5);
        assert_eq!(app.current_page_rows()[0].id, 15);
    }
}
