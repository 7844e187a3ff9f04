//! Errors surfaced to callers of bridge operations

use crate::remote::RemoteError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Why a bind was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    /// The entry is already bound to the caller
    #[error("Entry {entry_id} is already bound to the caller")]
    AlreadyYours { entry_id: String },
    /// The entry is bound to someone else
    #[error("Entry {entry_id} is bound to another owner")]
    TakenByOther { entry_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Bind conflict: {0}")]
    Conflict(Conflict),

    #[error("No entry is bound to {owner_id}")]
    NotBound { owner_id: String },

    #[error("Insufficient permission")]
    Unauthorized,

    #[error("Sudo is disabled by configuration")]
    SudoDisabled,

    #[error("Usage: {0}")]
    Usage(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Reconciliation task failed: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

impl BridgeError {
    /// Text shown to the caller when an operation is refused or fails.
    pub fn user_message(&self) -> String {
        match self {
            BridgeError::Conflict(Conflict::AlreadyYours { .. }) => {
                "This whitelist entry is already bound to your account!".to_string()
            }
            BridgeError::Conflict(Conflict::TakenByOther { .. }) => {
                "This whitelist entry is already registered by another user!".to_string()
            }
            BridgeError::NotBound { .. } => {
                "Your account is not bound to any whitelist entry.".to_string()
            }
            BridgeError::Unauthorized => "Insufficient permission.".to_string(),
            BridgeError::SudoDisabled => "Sudo is disabled by configuration.".to_string(),
            BridgeError::Usage(usage) => format!("Usage: {}", usage),
            BridgeError::UnknownCommand(name) => format!("Unknown command `{}`.", name),
            BridgeError::Remote(e) => format!("Server command failed: {}", e),
            BridgeError::Store(_) => "Internal storage error.".to_string(),
            BridgeError::Aborted(_) => "The run was aborted.".to_string(),
        }
    }
}
