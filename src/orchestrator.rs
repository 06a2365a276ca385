use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::location::{LocationFix, LocationTracker};
use crate::providers::{ScanProvider, ScanResultReceiver};
use crate::scan::ScanController;
use crate::session::SessionContext;
use crate::writer::LogWriter;

/// Running totals for the display layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub scan_cycles: u64,
    pub records_written: u64,
    pub sentinel_records: u64,
}

/// All cross-event shared state. Each cell is replaced wholesale under the
/// orchestrator's lock; readers get cloned snapshots, so interleaved
/// location pushes, scan completions and UI polls never observe a
/// half-updated value.
pub(crate) struct PipelineState {
    pub(crate) session: SessionContext,
    pub(crate) tracker: LocationTracker,
    pub(crate) last_scan_time: Option<DateTime<Utc>>,
    pub(crate) scan_summary: String,
    pub(crate) stats: PipelineStats,
    pub(crate) last_warning: Option<String>,
    pub(crate) last_write_error: Option<String>,
}

impl PipelineState {
    fn new(session: SessionContext) -> Self {
        Self {
            session,
            tracker: LocationTracker::new(),
            last_scan_time: None,
            scan_summary: String::new(),
            stats: PipelineStats::default(),
            last_warning: None,
            last_write_error: None,
        }
    }

    pub(crate) fn note_warning(&mut self, message: &str) {
        warn!("{message}");
        self.last_warning = Some(message.to_string());
    }
}

/// Wires scheduler, tracker, formatter and writer together; the single
/// component the embedding layer talks to.
#[derive(Clone)]
pub struct Orchestrator {
    state: Arc<Mutex<PipelineState>>,
    writer: LogWriter,
    scanner: Arc<Mutex<ScanController>>,
}

impl Orchestrator {
    pub fn new(writer: LogWriter) -> Self {
        Self::with_session(writer, SessionContext::new())
    }

    pub fn with_session(writer: LogWriter, session: SessionContext) -> Self {
        Self {
            state: Arc::new(Mutex::new(PipelineState::new(session))),
            writer,
            scanner: Arc::new(Mutex::new(ScanController::new())),
        }
    }

    /// Starts the repeating scan cadence. Independent of the logging
    /// toggle: scanning may run for display only.
    pub async fn start_scanning(
        &self,
        provider: Arc<dyn ScanProvider>,
        results: ScanResultReceiver,
    ) -> Result<()> {
        self.scanner.lock().await.start(
            provider,
            results,
            self.state.clone(),
            self.writer.clone(),
        )
    }

    /// Stops the cadence; a late completion already in flight is
    /// discarded. Stopping while not scanning is a warned no-op.
    pub async fn stop_scanning(&self) -> Result<()> {
        let mut scanner = self.scanner.lock().await;
        if !scanner.is_active() {
            self.state
                .lock()
                .await
                .note_warning("attempted to stop scanning while not active");
            return Ok(());
        }
        scanner.stop().await
    }

    /// Entry point for the location provider's pushes, including a
    /// last-known fix served at connection time.
    pub async fn handle_location_fix(&self, fix: LocationFix) {
        trace!("location fix: {fix:?}");
        self.state.lock().await.tracker.on_fix_received(fix);
    }

    /// Returns the session id now in effect.
    pub async fn enable_logging(&self) -> String {
        self.state.lock().await.session.enable_logging().to_string()
    }

    /// In-flight cycles still complete and refresh the display; the next
    /// cycle's write-or-skip decision sees the flag.
    pub async fn disable_logging(&self) {
        self.state.lock().await.session.disable_logging();
    }

    pub async fn is_logging_enabled(&self) -> bool {
        self.state.lock().await.session.logging_enabled
    }

    /// Takes effect on the next cycle, not retroactively.
    pub async fn set_filter_pattern(&self, pattern: &str) {
        self.state.lock().await.session.filter_pattern = pattern.to_string();
    }

    pub async fn filter_pattern(&self) -> String {
        self.state.lock().await.session.filter_pattern.clone()
    }

    pub async fn set_remote_logging_enabled(&self, enabled: bool) {
        self.state.lock().await.session.remote_logging_enabled = enabled;
    }

    pub async fn is_remote_logging_enabled(&self) -> bool {
        self.state.lock().await.session.remote_logging_enabled
    }

    pub async fn session_id(&self) -> String {
        self.state.lock().await.session.session_id.clone()
    }

    pub async fn current_location(&self) -> Option<LocationFix> {
        self.state.lock().await.tracker.current().cloned()
    }

    pub async fn last_location_update(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.tracker.last_update()
    }

    pub async fn current_scan_summary(&self) -> String {
        self.state.lock().await.scan_summary.clone()
    }

    pub async fn last_scan_time(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_scan_time
    }

    pub async fn stats(&self) -> PipelineStats {
        self.state.lock().await.stats
    }

    pub async fn last_warning(&self) -> Option<String> {
        self.state.lock().await.last_warning.clone()
    }

    pub async fn last_write_error(&self) -> Option<String> {
        self.state.lock().await.last_write_error.clone()
    }

    pub fn log_path(&self) -> &Path {
        self.writer.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scan::{ScanCycleResult, WifiObservation};
    use crate::scan::loop_worker::process_cycle;

    fn observation(ssid: &str, signal_level: i32, frequency: u32) -> WifiObservation {
        WifiObservation {
            ssid: ssid.into(),
            bssid: "aa:bb:cc:dd:ee:ff".into(),
            signal_level,
            frequency,
        }
    }

    fn fix() -> LocationFix {
        LocationFix {
            latitude: 52.52,
            longitude: 13.405,
            altitude: 34.5,
            accuracy: 8.0,
            speed: 1.5,
            observed_at: Utc::now(),
        }
    }

    fn orchestrator() -> (Orchestrator, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogWriter::new(dir.path().join("wifilog.csv")).unwrap();
        let orchestrator = Orchestrator::with_session(
            writer,
            SessionContext::with_device_model("test-device".into()),
        );
        (orchestrator, dir)
    }

    #[tokio::test]
    async fn enable_twice_keeps_session_id() {
        let (orchestrator, _dir) = orchestrator();
        let first = orchestrator.enable_logging().await;
        let second = orchestrator.enable_logging().await;
        assert_eq!(first, second);

        orchestrator.disable_logging().await;
        let third = orchestrator.enable_logging().await;
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn cycle_updates_display_state_without_logging() {
        let (orchestrator, _dir) = orchestrator();
        orchestrator.handle_location_fix(fix()).await;

        let scan = ScanCycleResult::new(vec![observation("CafeNet", -40, 2437)]);
        process_cycle(&orchestrator.state, &orchestrator.writer, scan).await;

        assert_eq!(orchestrator.stats().await.scan_cycles, 1);
        assert_eq!(orchestrator.stats().await.records_written, 0);
        assert!(orchestrator.last_scan_time().await.is_some());
        assert_eq!(
            orchestrator.current_scan_summary().await,
            "6 CafeNet [aa:bb:cc:dd:ee:ff]: -40\n"
        );
        let contents = std::fs::read_to_string(orchestrator.log_path()).unwrap();
        assert!(contents.is_empty());
    }

    #[tokio::test]
    async fn cycle_writes_records_while_logging_enabled() {
        let (orchestrator, _dir) = orchestrator();
        orchestrator.handle_location_fix(fix()).await;
        orchestrator.set_filter_pattern("Cafe.*").await;
        let session_id = orchestrator.enable_logging().await;

        let scan = ScanCycleResult::new(vec![
            observation("HomeNet", -60, 2412),
            observation("CafeNet", -40, 2437),
        ]);
        process_cycle(&orchestrator.state, &orchestrator.writer, scan).await;

        let stats = orchestrator.stats().await;
        assert_eq!(stats.records_written, 1);
        assert_eq!(stats.sentinel_records, 0);

        let contents = std::fs::read_to_string(orchestrator.log_path()).unwrap();
        let record =
            crate::models::record::LogRecord::parse_csv_line(contents.lines().next().unwrap())
                .unwrap();
        assert_eq!(record.ssid, "CafeNet");
        assert_eq!(record.session_id, session_id);
        assert_eq!(record.filter_pattern, "Cafe.*");
    }

    #[tokio::test]
    async fn cycle_without_location_writes_nothing() {
        let (orchestrator, _dir) = orchestrator();
        orchestrator.enable_logging().await;

        let scan = ScanCycleResult::new(vec![observation("CafeNet", -40, 2437)]);
        process_cycle(&orchestrator.state, &orchestrator.writer, scan).await;

        assert_eq!(orchestrator.stats().await.records_written, 0);
        let contents = std::fs::read_to_string(orchestrator.log_path()).unwrap();
        assert!(contents.is_empty());
    }

    #[tokio::test]
    async fn empty_cycle_writes_the_sentinel() {
        let (orchestrator, _dir) = orchestrator();
        orchestrator.handle_location_fix(fix()).await;
        orchestrator.enable_logging().await;

        process_cycle(
            &orchestrator.state,
            &orchestrator.writer,
            ScanCycleResult::new(Vec::new()),
        )
        .await;

        let stats = orchestrator.stats().await;
        assert_eq!(stats.records_written, 1);
        assert_eq!(stats.sentinel_records, 1);
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_warned_no_op() {
        let (orchestrator, _dir) = orchestrator();
        orchestrator.stop_scanning().await.unwrap();
        assert!(orchestrator.last_warning().await.is_some());
    }
}
