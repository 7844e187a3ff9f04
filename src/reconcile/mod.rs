//! Reconciliation engine - bulk whitelist sync and purge
//!
//! A run walks a point-in-time snapshot of the bindings and issues one
//! `whitelist add` (sync) or `whitelist remove` (purge) per entry, pausing
//! before each command. A failed entry is logged and skipped; the run always
//! drains its snapshot and finishes with a single `whitelist reload`.
//!
//! Runs are not transactional. The final [`Progress`] and the failures in
//! [`RunSummary`] are the only record of a partial result.

pub mod pacer;
pub mod progress;

pub use pacer::{IntervalPacer, Pacer};
pub use progress::Progress;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::remote::{RemoteError, SerializedChannel, WhitelistCommand};
use crate::store::Binding;

/// What a run does with each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Add every entry to the remote whitelist
    Sync,
    /// Remove every entry from the remote whitelist
    Purge,
}

impl ReconcileMode {
    pub fn command_for(&self, entry_id: &str) -> WhitelistCommand {
        match self {
            ReconcileMode::Sync => WhitelistCommand::Add(entry_id.to_string()),
            ReconcileMode::Purge => WhitelistCommand::Remove(entry_id.to_string()),
        }
    }

    /// Past-tense verb used in progress text.
    pub fn verb(&self) -> &'static str {
        match self {
            ReconcileMode::Sync => "Synced",
            ReconcileMode::Purge => "Purged",
        }
    }
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileMode::Sync => write!(f, "sync"),
            ReconcileMode::Purge => write!(f, "purge"),
        }
    }
}

/// An entry the run had to skip
#[derive(Debug, Clone)]
pub struct EntryFailure {
    pub binding: Binding,
    pub error: RemoteError,
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub mode: ReconcileMode,
    pub total: usize,
    /// Successful commands only
    pub completed: usize,
    pub failures: Vec<EntryFailure>,
    /// Set when the trailing reload failed
    pub reload_error: Option<RemoteError>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total && self.reload_error.is_none()
    }
}

/// A run executing on its own task
pub struct RunHandle {
    pub reports: mpsc::UnboundedReceiver<Progress>,
    pub summary: JoinHandle<RunSummary>,
}

/// Drives bulk runs against the remote console.
pub struct Reconciler {
    channel: SerializedChannel,
    pacer: Arc<dyn Pacer>,
    /// Held for a whole run; a second run waits for the first to drain
    run_lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(channel: SerializedChannel, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            channel,
            pacer,
            run_lock: Mutex::new(()),
        }
    }

    /// Run to completion, sending progress to `reports`.
    ///
    /// Emits `(0, total)` first, one report per successful entry, and a final
    /// report once the reload has been issued. A dropped receiver does not
    /// stop the run.
    pub async fn run(
        &self,
        mode: ReconcileMode,
        snapshot: Vec<Binding>,
        reports: mpsc::UnboundedSender<Progress>,
    ) -> RunSummary {
        let _running = self.run_lock.lock().await;

        let run_id = Uuid::new_v4();
        let total = snapshot.len();
        let mut completed = 0;
        let mut failures = Vec::new();

        info!(%run_id, %mode, total, "Reconciliation run started");
        let _ = reports.send(Progress::running(mode, completed, total));

        for binding in snapshot {
            self.pacer.pause().await;

            let command = mode.command_for(&binding.entry_id);
            match self.channel.execute(&command).await {
                Ok(_) => {
                    completed += 1;
                    let _ = reports.send(Progress::running(mode, completed, total));
                }
                Err(error) => {
                    warn!(
                        %run_id,
                        owner = %binding.owner_id,
                        entry = %binding.entry_id,
                        %error,
                        "Failed to reconcile entry, skipping"
                    );
                    failures.push(EntryFailure { binding, error });
                }
            }
        }

        let reload_error = match self.channel.execute(&WhitelistCommand::Reload).await {
            Ok(_) => None,
            Err(error) => {
                error!(%run_id, %error, "Whitelist reload failed");
                Some(error)
            }
        };

        let _ = reports.send(Progress::finished(mode, completed, total));
        info!(
            %run_id,
            %mode,
            completed,
            total,
            failed = failures.len(),
            "Reconciliation run finished"
        );

        RunSummary {
            run_id,
            mode,
            total,
            completed,
            failures,
            reload_error,
        }
    }

    /// Start a run on its own task and hand back its report stream.
    pub fn spawn(self: &Arc<Self>, mode: ReconcileMode, snapshot: Vec<Binding>) -> RunHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let reconciler = Arc::clone(self);
        let summary = tokio::spawn(async move { reconciler.run(mode, snapshot, tx).await });

        RunHandle {
            reports: rx,
            summary,
        }
    }
}
