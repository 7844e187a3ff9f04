//! Progress reports and their rendering onto a notification surface

use tokio::sync::mpsc;
use tracing::warn;

use super::ReconcileMode;
use crate::surface::{MessageId, NotificationSurface};

/// `(completed, total)` at one step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub mode: ReconcileMode,
    pub completed: usize,
    pub total: usize,
    /// Terminal report, sent after the reload
    pub finished: bool,
}

impl Progress {
    pub fn running(mode: ReconcileMode, completed: usize, total: usize) -> Self {
        Self {
            mode,
            completed,
            total,
            finished: false,
        }
    }

    pub fn finished(mode: ReconcileMode, completed: usize, total: usize) -> Self {
        Self {
            mode,
            completed,
            total,
            finished: true,
        }
    }

    pub fn message(&self) -> String {
        let tail = if self.finished { " successfully." } else { "..." };
        format!(
            "{} {} of {} users{}",
            self.mode.verb(),
            self.completed,
            self.total,
            tail
        )
    }
}

/// Render a report stream as one message edited in place.
///
/// The first report posts the message; every later report edits it. Surface
/// errors are logged and never stop the stream from being drained. Returns
/// the last report seen.
pub async fn render(
    surface: &dyn NotificationSurface,
    mut reports: mpsc::UnboundedReceiver<Progress>,
) -> Option<Progress> {
    let mut message: Option<MessageId> = None;
    let mut last = None;

    while let Some(progress) = reports.recv().await {
        let text = progress.message();
        match message {
            Some(id) => {
                if let Err(e) = surface.edit(id, &text).await {
                    warn!(error = %e, "Failed to update progress message");
                }
            }
            None => match surface.post(&text).await {
                Ok(id) => message = Some(id),
                Err(e) => warn!(error = %e, "Failed to post progress message"),
            },
        }
        last = Some(progress);
    }

    last
}
