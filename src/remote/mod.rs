//! Remote console - the command channel to the game server
//!
//! The wire protocol lives behind [`RemoteChannel`]. Everything in the bridge
//! talks to the server through a [`SerializedChannel`], which keeps at most
//! one command in flight and applies the reply policy.

mod command;

pub use command::WhitelistCommand;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

/// Remote console errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("`{command}` rejected: {reply}")]
    Rejected { command: String, reply: String },
}

/// A connected client to the server's administrative console.
///
/// Sends one command and waits for one reply. Dialing, authentication and
/// reconnects are the implementor's business.
#[async_trait::async_trait]
pub trait RemoteChannel: Send + Sync {
    async fn send(&self, command: &str) -> Result<String, RemoteError>;
}

/// Decides whether a successful reply actually means the command failed.
#[derive(Debug, Clone, Default)]
pub struct ReplyPolicy {
    error_markers: Vec<String>,
}

impl ReplyPolicy {
    pub fn new(error_markers: Vec<String>) -> Self {
        Self { error_markers }
    }

    pub fn check(&self, command: &str, reply: String) -> Result<String, RemoteError> {
        let rejected = !reply.is_empty()
            && self
                .error_markers
                .iter()
                .any(|marker| reply.contains(marker.as_str()));

        if rejected {
            Err(RemoteError::Rejected {
                command: command.to_string(),
                reply,
            })
        } else {
            Ok(reply)
        }
    }
}

/// Shared handle that serializes access to a [`RemoteChannel`].
#[derive(Clone)]
pub struct SerializedChannel {
    inner: Arc<Mutex<Box<dyn RemoteChannel>>>,
    policy: ReplyPolicy,
}

impl SerializedChannel {
    pub fn new(channel: Box<dyn RemoteChannel>, policy: ReplyPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(channel)),
            policy,
        }
    }

    /// Issue a whitelist command and apply the reply policy.
    pub async fn execute(&self, command: &WhitelistCommand) -> Result<String, RemoteError> {
        let line = command.to_string();
        let reply = self.send_raw(&line).await?;
        self.policy.check(&line, reply)
    }

    /// Send a command verbatim. The reply is returned as-is.
    pub async fn send_raw(&self, line: &str) -> Result<String, RemoteError> {
        let channel = self.inner.lock().await;
        debug!(command = line, "Sending remote command");
        let reply = channel.send(line).await?;
        debug!(command = line, reply = %reply, "Remote command answered");
        Ok(reply)
    }
}

/// Channel that logs each command instead of sending it and replies empty.
pub struct DryRunChannel;

#[async_trait::async_trait]
impl RemoteChannel for DryRunChannel {
    async fn send(&self, command: &str) -> Result<String, RemoteError> {
        info!(command, "Dry run: remote command not sent");
        Ok(String::new())
    }
}
