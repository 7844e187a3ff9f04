//! whitelist-bridge: keeps a game server whitelist in step with a community's
//! identity bindings.
//!
//! Members bind their account to one whitelist entry. The bridge records the
//! binding in a local store and mirrors it onto the server through its remote
//! console. Administrators can push the whole mapping at once:
//!
//! - **Sync**: add every bound entry to the remote whitelist
//! - **Purge**: remove every bound entry from the remote whitelist
//!
//! ```text
//!   caller ──▶ commands ──▶ auth guard
//!                 │
//!        ┌────────┴─────────┐
//!        ▼                  ▼
//!   BindingService      Reconciler ──▶ progress ──▶ surface
//!        │                  │
//!        └──────┬───────────┘
//!               ▼
//!     SerializedChannel ──▶ RemoteChannel (server console)
//! ```

pub mod auth;
pub mod binding;
pub mod commands;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{BridgeError, Conflict, Result};
