use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::filter::SsidFilter;
use crate::formatter;
use crate::models::record::SpecialCode;
use crate::models::scan::ScanCycleResult;
use crate::orchestrator::PipelineState;
use crate::providers::{ScanProvider, ScanResultReceiver};
use crate::writer::LogWriter;

/// Wait between the completion of one scan and the request for the next.
/// Matches the provider's observed scan latency; anything shorter just
/// produces duplicate result sets.
pub(crate) const SCAN_COOLDOWN: Duration = Duration::from_millis(2000);

/// Drives the request → result → cooldown cadence until cancelled.
///
/// Runs regardless of whether logging is enabled; the display layer wants
/// fresh summaries either way.
pub(crate) async fn scan_loop(
    state: Arc<Mutex<PipelineState>>,
    provider: Arc<dyn ScanProvider>,
    mut results: ScanResultReceiver,
    writer: LogWriter,
    cancel_token: CancellationToken,
) {
    loop {
        provider.request_scan();

        let result = tokio::select! {
            maybe = results.recv() => match maybe {
                Some(result) => result,
                None => {
                    warn!("scan provider channel closed, stopping scan loop");
                    state
                        .lock()
                        .await
                        .note_warning("scan provider disconnected");
                    break;
                }
            },
            _ = cancel_token.cancelled() => break,
        };

        process_cycle(&state, &writer, result).await;

        tokio::select! {
            _ = tokio::time::sleep(SCAN_COOLDOWN) => {}
            _ = cancel_token.cancelled() => break,
        }
    }

    info!("scan loop shutting down");
}

/// Formats one cycle and, when logging is enabled, persists the batch.
///
/// The logging-enabled flag is read once per cycle, so a concurrent
/// disable keeps or skips the whole batch, never part of it.
pub(crate) async fn process_cycle(
    state: &Arc<Mutex<PipelineState>>,
    writer: &LogWriter,
    scan: ScanCycleResult,
) {
    let (session, location) = {
        let mut guard = state.lock().await;
        guard.last_scan_time = Some(scan.completed_at);
        guard.stats.scan_cycles += 1;
        (guard.session.clone(), guard.tracker.current().cloned())
    };

    // re-compiled every cycle so filter edits apply from the next scan on
    let filter = SsidFilter::compile(&session.filter_pattern);
    let summary = formatter::render_summary(&scan, &filter);
    let records = formatter::format_records(&scan, location.as_ref(), &session, &filter);

    let write_result = if session.logging_enabled && !records.is_empty() {
        Some(writer.append(&records).await)
    } else {
        None
    };

    let mut guard = state.lock().await;
    guard.scan_summary = summary;
    match write_result {
        Some(Ok(())) => {
            guard.stats.records_written += records.len() as u64;
            guard.stats.sentinel_records += records
                .iter()
                .filter(|record| record.special_code == SpecialCode::NoVisibleNetwork)
                .count() as u64;
        }
        Some(Err(err)) => {
            error!("failed to append {} records: {err:?}", records.len());
            guard.last_write_error = Some(err.to_string());
        }
        None => {}
    }
}
