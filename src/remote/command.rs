//! Whitelist command vocabulary

use std::fmt;

/// A whitelist command understood by the server console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistCommand {
    Add(String),
    Remove(String),
    /// Re-read the whitelist file from disk
    Reload,
}

impl fmt::Display for WhitelistCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhitelistCommand::Add(entry) => write!(f, "whitelist add {}", entry),
            WhitelistCommand::Remove(entry) => write!(f, "whitelist remove {}", entry),
            WhitelistCommand::Reload => write!(f, "whitelist reload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_strings() {
        assert_eq!(WhitelistCommand::Add("alice".into()).to_string(), "whitelist add alice");
        assert_eq!(WhitelistCommand::Remove("bob".into()).to_string(), "whitelist remove bob");
        assert_eq!(WhitelistCommand::Reload.to_string(), "whitelist reload");
    }
}
