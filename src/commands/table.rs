//! Command names, aliases and the permission each one requires

use crate::auth::PermissionLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Bind,
    Unbind,
    Info,
    Sync,
    Purge,
    List,
    AdminRole,
    StatusChannel,
    Enable,
    Disable,
    Status,
    Sudo,
    Help,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: PermissionLevel,
    pub usage: &'static str,
    pub brief: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Bind,
        name: "bind",
        aliases: &["add", "set"],
        required: PermissionLevel::Member,
        usage: "bind <entry>",
        brief: "Bind a whitelist entry to your account",
    },
    CommandSpec {
        kind: CommandKind::Unbind,
        name: "unbind",
        aliases: &["remove", "unset"],
        required: PermissionLevel::Member,
        usage: "unbind",
        brief: "Unbind your whitelist entry",
    },
    CommandSpec {
        kind: CommandKind::Info,
        name: "info",
        aliases: &["whoami"],
        required: PermissionLevel::Member,
        usage: "info",
        brief: "Show the entry bound to your account",
    },
    CommandSpec {
        kind: CommandKind::Sync,
        name: "sync",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "sync",
        brief: "Add every bound entry to the server whitelist",
    },
    CommandSpec {
        kind: CommandKind::Purge,
        name: "purge",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "purge",
        brief: "Remove every bound entry from the server whitelist",
    },
    CommandSpec {
        kind: CommandKind::List,
        name: "list",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "list",
        brief: "List all bindings",
    },
    CommandSpec {
        kind: CommandKind::AdminRole,
        name: "adminrole",
        aliases: &[],
        required: PermissionLevel::Owner,
        usage: "adminrole <role>",
        brief: "Set the admin role",
    },
    CommandSpec {
        kind: CommandKind::StatusChannel,
        name: "statuschan",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "statuschan [channel]",
        brief: "Set the status channel",
    },
    CommandSpec {
        kind: CommandKind::Enable,
        name: "enable",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "enable",
        brief: "Enable whitelist binding",
    },
    CommandSpec {
        kind: CommandKind::Disable,
        name: "disable",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "disable",
        brief: "Disable whitelist binding",
    },
    CommandSpec {
        kind: CommandKind::Status,
        name: "status",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "status",
        brief: "Show scope configuration",
    },
    CommandSpec {
        kind: CommandKind::Sudo,
        name: "sudo",
        aliases: &[],
        required: PermissionLevel::Admin,
        usage: "sudo <command...>",
        brief: "Send a raw console command",
    },
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        aliases: &[],
        required: PermissionLevel::Member,
        usage: "help",
        brief: "List commands",
    },
];

/// Find a command by name or alias, ignoring case.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    let name = name.to_lowercase();
    COMMANDS
        .iter()
        .find(|spec| spec.name == name || spec.aliases.contains(&name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(lookup("add").unwrap().kind, CommandKind::Bind);
        assert_eq!(lookup("SET").unwrap().kind, CommandKind::Bind);
        assert_eq!(lookup("unset").unwrap().kind, CommandKind::Unbind);
        assert!(lookup("restart").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for spec in COMMANDS {
            assert!(seen.insert(spec.name), "duplicate {}", spec.name);
            for alias in spec.aliases {
                assert!(seen.insert(alias), "duplicate {}", alias);
            }
        }
    }

    #[test]
    fn test_bulk_runs_need_admin() {
        assert_eq!(lookup("sync").unwrap().required, PermissionLevel::Admin);
        assert_eq!(lookup("purge").unwrap().required, PermissionLevel::Admin);
        assert_eq!(lookup("adminrole").unwrap().required, PermissionLevel::Owner);
    }
}
