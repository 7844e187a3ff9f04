//! Permission levels and the per-scope authorization guard

use std::fmt;

use crate::error::{BridgeError, Result};
use crate::store::ScopeConfig;

/// Permission levels for bridge commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PermissionLevel {
    /// Any member of the scope - acts on their own binding only
    #[default]
    Member = 0,
    /// Holds the scope's configured admin role
    Admin = 1,
    /// Owns the scope
    Owner = 2,
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionLevel::Member => write!(f, "MEMBER"),
            PermissionLevel::Admin => write!(f, "ADMIN"),
            PermissionLevel::Owner => write!(f, "OWNER"),
        }
    }
}

/// Who is invoking a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role_ids: Vec<String>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role_ids: Vec::new(),
        }
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_ids.push(role_id.into());
        self
    }
}

/// The scope a command runs in, as reported by the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeContext {
    pub scope_id: String,
    pub owner_id: String,
    /// Channel the command was sent from
    pub channel_id: Option<String>,
}

/// Stateless permission check, evaluated per invocation.
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// Highest level the caller holds in this scope.
    pub fn level(scope: &ScopeConfig, ctx: &ScopeContext, caller: &Caller) -> PermissionLevel {
        if caller.user_id == ctx.owner_id {
            return PermissionLevel::Owner;
        }

        let holds_admin_role = scope
            .admin_role_id
            .as_ref()
            .is_some_and(|role| caller.role_ids.iter().any(|r| r == role));

        if holds_admin_role {
            PermissionLevel::Admin
        } else {
            PermissionLevel::Member
        }
    }

    pub fn check(
        required: PermissionLevel,
        scope: &ScopeConfig,
        ctx: &ScopeContext,
        caller: &Caller,
    ) -> Result<()> {
        if Self::level(scope, ctx, caller) >= required {
            Ok(())
        } else {
            Err(BridgeError::Unauthorized)
        }
    }
}
