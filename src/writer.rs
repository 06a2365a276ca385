use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use tokio::sync::oneshot;

use crate::models::record::LogRecord;

enum WriterCommand {
    Append {
        lines: Vec<String>,
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

struct WriterInner {
    sender: mpsc::Sender<WriterCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for WriterInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(WriterCommand::Shutdown) {
                error!("Failed to send shutdown to writer thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join writer thread: {join_err:?}");
            }
        }
    }
}

/// Append-only log destination. A dedicated thread owns the open file and
/// applies batches in arrival order, so records are never interleaved or
/// reordered across callers, and prior content is never rewritten.
#[derive(Clone)]
pub struct LogWriter {
    inner: Arc<WriterInner>,
    log_path: Arc<PathBuf>,
}

impl LogWriter {
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<WriterCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = log_path.clone();

        let worker = thread::Builder::new()
            .name("wifilog-writer".into())
            .spawn(move || {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path_for_thread)
                    .with_context(|| {
                        format!("failed to open log file {}", path_for_thread.display())
                    });

                let mut out = match file {
                    Ok(file) => BufWriter::new(file),
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                if ready_tx.send(Ok(())).is_err() {
                    error!("Writer initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        WriterCommand::Append { lines, reply } => {
                            let result = write_batch(&mut out, &lines);
                            if reply.send(result).is_err() {
                                error!("Writer caller dropped before receiving result");
                            }
                        }
                        WriterCommand::Shutdown => break,
                    }
                }

                info!("Writer thread shutting down");
            })
            .with_context(|| "failed to spawn log writer thread")?;

        ready_rx
            .recv()
            .context("writer thread exited before signaling readiness")??;

        info!("Log writer opened {}", log_path.display());

        Ok(Self {
            inner: Arc::new(WriterInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            log_path: Arc::new(log_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.log_path.as_path()
    }

    /// Appends the batch, preserving emission order within and across
    /// calls. A failed write is surfaced to the caller, never retried
    /// silently: dropping records quietly would corrupt the dataset's
    /// completeness guarantee.
    pub async fn append(&self, records: &[LogRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let lines: Vec<String> = records.iter().map(LogRecord::to_csv_line).collect();
        let (reply_tx, reply_rx) = oneshot::channel();

        self.inner
            .sender
            .send(WriterCommand::Append {
                lines,
                reply: reply_tx,
            })
            .map_err(|err| anyhow!("failed to send batch to writer thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("writer thread terminated unexpectedly"))?
    }
}

fn write_batch(out: &mut BufWriter<File>, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}").context("failed to append record")?;
    }
    out.flush().context("failed to flush log file")
}
