//! SQLite-backed mapping store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{Binding, MappingStore, ScopeConfig, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bindings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id TEXT NOT NULL UNIQUE,
    entry_id TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS scopes (
    scope_id TEXT PRIMARY KEY,
    admin_role_id TEXT,
    status_channel_id TEXT,
    disabled INTEGER NOT NULL DEFAULT 0
);
";

pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database file, creating its directory if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let db = Connection::open(path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(db)?;
        info!(path = %path.display(), "Mapping store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch(SCHEMA)?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn row_to_binding(row: &rusqlite::Row<'_>) -> rusqlite::Result<Binding> {
    Ok(Binding {
        owner_id: row.get(0)?,
        entry_id: row.get(1)?,
    })
}

impl MappingStore for SqliteStore {
    fn binding_for_owner(&self, owner_id: &str) -> Result<Option<Binding>, StoreError> {
        let db = self.conn()?;
        let binding = db
            .prepare_cached("SELECT owner_id, entry_id FROM bindings WHERE owner_id = ?1")?
            .query_row([owner_id], row_to_binding)
            .optional()?;
        Ok(binding)
    }

    fn binding_for_entry(&self, entry_id: &str) -> Result<Option<Binding>, StoreError> {
        let db = self.conn()?;
        let binding = db
            .prepare_cached("SELECT owner_id, entry_id FROM bindings WHERE entry_id = ?1")?
            .query_row([entry_id], row_to_binding)
            .optional()?;
        Ok(binding)
    }

    fn set_binding(&self, owner_id: &str, entry_id: &str) -> Result<Option<String>, StoreError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        let previous: Option<String> = tx
            .query_row(
                "SELECT entry_id FROM bindings WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )
            .optional()?;

        if previous.is_some() {
            // Update in place so the binding keeps its listing position
            tx.execute(
                "UPDATE bindings SET entry_id = ?2 WHERE owner_id = ?1",
                params![owner_id, entry_id],
            )?;
        } else {
            tx.execute(
                "INSERT INTO bindings (owner_id, entry_id) VALUES (?1, ?2)",
                params![owner_id, entry_id],
            )?;
        }
        tx.commit()?;

        debug!(owner = owner_id, entry = entry_id, previous = ?previous, "Binding stored");
        Ok(previous)
    }

    fn remove_binding(&self, owner_id: &str) -> Result<Option<Binding>, StoreError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        let binding = tx
            .query_row(
                "SELECT owner_id, entry_id FROM bindings WHERE owner_id = ?1",
                [owner_id],
                row_to_binding,
            )
            .optional()?;

        if binding.is_some() {
            tx.execute("DELETE FROM bindings WHERE owner_id = ?1", [owner_id])?;
        }
        tx.commit()?;

        Ok(binding)
    }

    fn bindings(&self) -> Result<Vec<Binding>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare_cached("SELECT owner_id, entry_id FROM bindings ORDER BY id")?;
        let rows = stmt.query_map([], row_to_binding)?;
        let bindings = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bindings)
    }

    fn scope(&self, scope_id: &str) -> Result<ScopeConfig, StoreError> {
        let db = self.conn()?;
        let scope = db
            .prepare_cached(
                "SELECT admin_role_id, status_channel_id, disabled FROM scopes WHERE scope_id = ?1",
            )?
            .query_row([scope_id], |row| {
                Ok(ScopeConfig {
                    scope_id: scope_id.to_string(),
                    admin_role_id: row.get(0)?,
                    status_channel_id: row.get(1)?,
                    disabled: row.get(2)?,
                })
            })
            .optional()?;
        Ok(scope.unwrap_or_else(|| ScopeConfig::new(scope_id)))
    }

    fn set_admin_role(&self, scope_id: &str, role_id: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO scopes (scope_id, admin_role_id) VALUES (?1, ?2)
             ON CONFLICT(scope_id) DO UPDATE SET admin_role_id = ?2",
            params![scope_id, role_id],
        )?;
        Ok(())
    }

    fn set_status_channel(&self, scope_id: &str, channel_id: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO scopes (scope_id, status_channel_id) VALUES (?1, ?2)
             ON CONFLICT(scope_id) DO UPDATE SET status_channel_id = ?2",
            params![scope_id, channel_id],
        )?;
        Ok(())
    }

    fn set_disabled(&self, scope_id: &str, disabled: bool) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO scopes (scope_id, disabled) VALUES (?1, ?2)
             ON CONFLICT(scope_id) DO UPDATE SET disabled = ?2",
            params![scope_id, disabled],
        )?;
        Ok(())
    }
}
