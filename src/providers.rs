use tokio::sync::mpsc;

use crate::models::scan::ScanCycleResult;

/// Boundary to the platform's wireless-scan facility.
///
/// `request_scan` is fire-and-forget; the platform glue delivers each
/// finished result set on the channel handed to
/// [`crate::Orchestrator::start_scanning`]. A request already in flight
/// cannot be cancelled: the pipeline either consumes its completion or,
/// once stopped, discards it.
pub trait ScanProvider: Send + Sync {
    fn request_scan(&self);
}

pub type ScanResultSender = mpsc::Sender<ScanCycleResult>;
pub type ScanResultReceiver = mpsc::Receiver<ScanCycleResult>;

/// Channel for scan-complete notifications. The pipeline consumes one
/// result per cycle, so a small buffer absorbs any provider burst.
pub fn scan_result_channel() -> (ScanResultSender, ScanResultReceiver) {
    mpsc::channel(8)
}
