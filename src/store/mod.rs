//! Mapping store - bindings and per-scope configuration
//!
//! The store is the source of truth for who is bound to which whitelist
//! entry. Bulk runs read a snapshot through [`MappingStore::bindings`] and
//! never look at the store again until they finish.

mod sqlite;

pub use sqlite::SqliteStore;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// One owner bound to one whitelist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub owner_id: String,
    /// Always lowercase
    pub entry_id: String,
}

impl Binding {
    pub fn new(owner_id: impl Into<String>, entry_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            entry_id: entry_id.into().to_lowercase(),
        }
    }
}

/// Per-scope administrative settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeConfig {
    pub scope_id: String,
    pub admin_role_id: Option<String>,
    pub status_channel_id: Option<String>,
    /// Advisory only; no command checks it
    pub disabled: bool,
}

impl ScopeConfig {
    pub fn new(scope_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            ..Default::default()
        }
    }
}

/// Persistent identity ↔ entry mapping plus scope configuration.
pub trait MappingStore: Send + Sync {
    fn binding_for_owner(&self, owner_id: &str) -> Result<Option<Binding>, StoreError>;

    fn binding_for_entry(&self, entry_id: &str) -> Result<Option<Binding>, StoreError>;

    /// Bind `owner_id` to `entry_id`, replacing any previous binding of that
    /// owner. Returns the previous entry, if there was one.
    fn set_binding(&self, owner_id: &str, entry_id: &str) -> Result<Option<String>, StoreError>;

    /// Delete the owner's binding, returning it.
    fn remove_binding(&self, owner_id: &str) -> Result<Option<Binding>, StoreError>;

    /// Every binding, in insertion order.
    fn bindings(&self) -> Result<Vec<Binding>, StoreError>;

    /// Scope configuration; a scope never configured reads as the default.
    fn scope(&self, scope_id: &str) -> Result<ScopeConfig, StoreError>;

    fn set_admin_role(&self, scope_id: &str, role_id: &str) -> Result<(), StoreError>;

    fn set_status_channel(&self, scope_id: &str, channel_id: &str) -> Result<(), StoreError>;

    fn set_disabled(&self, scope_id: &str, disabled: bool) -> Result<(), StoreError>;
}
