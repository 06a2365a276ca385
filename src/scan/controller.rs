use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::PipelineState;
use crate::providers::{ScanProvider, ScanResultReceiver};
use crate::scan::loop_worker::scan_loop;
use crate::writer::LogWriter;

/// Owns the scan-cycle task: Idle until started, then the loop runs until
/// the token is cancelled. The token is the single cancellation point for
/// the whole cadence.
pub struct ScanController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl ScanController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        provider: Arc<dyn ScanProvider>,
        results: ScanResultReceiver,
        state: Arc<Mutex<PipelineState>>,
        writer: LogWriter,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("scan cycle already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(scan_loop(state, provider, results, writer, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancels the pending cycle and waits for the loop to wind down.
    /// Completions still in flight are discarded, not processed.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("scan loop task failed to join")?;
        }
        Ok(())
    }
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new()
    }
}
