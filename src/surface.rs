//! Notification surface - where replies and progress messages are shown

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle to a posted message that can be edited in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, thiserror::Error)]
pub enum SurfaceError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait::async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Post a one-off reply.
    async fn reply(&self, text: &str) -> Result<(), SurfaceError>;

    /// Post a message that will be edited as work progresses.
    async fn post(&self, text: &str) -> Result<MessageId, SurfaceError>;

    /// Replace the text of a posted message.
    async fn edit(&self, id: MessageId, text: &str) -> Result<(), SurfaceError>;
}

/// Writes replies and progress to stdout, one line per edit.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    next_id: AtomicU64,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_line(&self, text: &str) -> Result<(), SurfaceError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text).map_err(|e| SurfaceError::Delivery(e.to_string()))
    }
}

#[async_trait::async_trait]
impl NotificationSurface for ConsoleSurface {
    async fn reply(&self, text: &str) -> Result<(), SurfaceError> {
        self.write_line(text)
    }

    async fn post(&self, text: &str) -> Result<MessageId, SurfaceError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write_line(text)?;
        Ok(id)
    }

    async fn edit(&self, _id: MessageId, text: &str) -> Result<(), SurfaceError> {
        self.write_line(text)
    }
}
