//! whitelist-bridge: operator console for the whitelist bridge
//!
//! Dispatches bridge commands against the local mapping store. The server
//! console transport is supplied by the embedding application; this binary
//! wires the dry-run channel, which logs every console command it would send.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use whitelist_bridge::auth::{Caller, ScopeContext};
use whitelist_bridge::commands::{Dispatcher, Invocation};
use whitelist_bridge::remote::DryRunChannel;
use whitelist_bridge::store::SqliteStore;
use whitelist_bridge::surface::{ConsoleSurface, NotificationSurface};
use whitelist_bridge::Config;

#[derive(Parser)]
#[command(name = "whitelist-bridge")]
#[command(about = "Keeps a game server whitelist in step with identity bindings")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "whitelist-bridge.toml")]
    config: PathBuf,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "WHITELIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Scope the commands run in
    #[arg(long, env = "WHITELIST_SCOPE", default_value = "default")]
    scope: String,

    /// Owner of the scope
    #[arg(long, env = "WHITELIST_SCOPE_OWNER", default_value = "owner")]
    scope_owner: String,

    /// Channel the commands are issued from
    #[arg(long)]
    channel: Option<String>,

    /// Identity invoking the command
    #[arg(long, env = "WHITELIST_CALLER", default_value = "owner")]
    caller: String,

    /// Roles held by the caller
    #[arg(long = "role")]
    roles: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one bridge command, e.g. `exec bind steve`
    Exec {
        #[arg(trailing_var_arg = true, required = true)]
        line: Vec<String>,
    },

    /// Notify the bridge that a member left the scope
    MemberLeft {
        /// Identity of the departed member
        owner: String,
    },

    /// Read `<caller>[:role,role] <command...>` lines from stdin
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("whitelist_bridge=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.bridge.data_dir = data_dir;
    }

    info!(
        data_dir = %config.bridge.data_dir.display(),
        scope = %cli.scope,
        "Starting whitelist-bridge"
    );

    let store = Arc::new(SqliteStore::open(&config.database_path())?);
    let dispatcher = Dispatcher::from_config(&config, store, Box::new(DryRunChannel));
    let surface = ConsoleSurface::new();

    let ctx = ScopeContext {
        scope_id: cli.scope.clone(),
        owner_id: cli.scope_owner.clone(),
        channel_id: cli.channel.clone(),
    };

    match cli.command {
        Command::Exec { line } => {
            let caller = Caller {
                user_id: cli.caller.clone(),
                role_ids: cli.roles.clone(),
            };
            let inv = Invocation {
                ctx: &ctx,
                caller: &caller,
                surface: &surface,
            };
            if dispatcher.dispatch(&inv, &line.join(" ")).await.is_err() {
                std::process::exit(1);
            }
        }

        Command::MemberLeft { owner } => match dispatcher.member_left(&owner).await {
            Ok(Some(binding)) => {
                surface
                    .reply(&format!("Removed `{}` from the whitelist.", binding.entry_id))
                    .await?;
            }
            Ok(None) => surface.reply("No binding for that member.").await?,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Command::Console => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let Some((who, rest)) = line.trim().split_once(char::is_whitespace) else {
                    continue;
                };
                let caller = parse_caller(who);
                let inv = Invocation {
                    ctx: &ctx,
                    caller: &caller,
                    surface: &surface,
                };
                // Refusals were already shown on the surface
                let _ = dispatcher.dispatch(&inv, rest).await;
            }
        }
    }

    Ok(())
}

/// `user` or `user:role1,role2`
fn parse_caller(who: &str) -> Caller {
    match who.split_once(':') {
        Some((user_id, roles)) => Caller {
            user_id: user_id.to_string(),
            role_ids: roles
                .split(',')
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        },
        None => Caller::new(who),
    }
}
