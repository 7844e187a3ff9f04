//! Command dispatch
//!
//! Maps a command line to a handler through [`table::COMMANDS`]. Every
//! dispatch reads the scope configuration, checks the caller's permission,
//! runs the handler and posts the outcome to the invocation's surface.

pub mod table;

pub use table::{lookup, CommandKind, CommandSpec, COMMANDS};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{AuthorizationGuard, Caller, ScopeContext};
use crate::binding::BindingService;
use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::reconcile::{progress, IntervalPacer, Pacer, ReconcileMode, Reconciler, RunSummary};
use crate::remote::{RemoteChannel, ReplyPolicy, SerializedChannel};
use crate::store::{Binding, MappingStore, ScopeConfig};
use crate::surface::NotificationSurface;

/// One command invocation: where, by whom, and where to answer
pub struct Invocation<'a> {
    pub ctx: &'a ScopeContext,
    pub caller: &'a Caller,
    pub surface: &'a dyn NotificationSurface,
}

pub struct Dispatcher {
    store: Arc<dyn MappingStore>,
    channel: SerializedChannel,
    bindings: BindingService,
    reconciler: Arc<Reconciler>,
    sudo_enabled: bool,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn MappingStore>,
        channel: SerializedChannel,
        pacer: Arc<dyn Pacer>,
        sudo_enabled: bool,
    ) -> Self {
        Self {
            bindings: BindingService::new(store.clone(), channel.clone(), pacer.clone()),
            reconciler: Arc::new(Reconciler::new(channel.clone(), pacer)),
            store,
            channel,
            sudo_enabled,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn MappingStore>,
        remote: Box<dyn RemoteChannel>,
    ) -> Self {
        let channel = SerializedChannel::new(
            remote,
            ReplyPolicy::new(config.remote.error_markers.clone()),
        );
        let pacer = Arc::new(IntervalPacer::new(config.remote.pacing()));
        Self::new(store, channel, pacer, config.bridge.sudo_enabled)
    }

    /// Parse and run one command line, posting the reply (or the refusal)
    /// to the invocation's surface.
    pub async fn dispatch(&self, inv: &Invocation<'_>, line: &str) -> Result<()> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(());
        };
        let args: Vec<&str> = words.collect();

        let outcome = match lookup(name) {
            Some(spec) => self.invoke(inv, spec, &args).await,
            None => Err(BridgeError::UnknownCommand(name.to_string())),
        };

        match outcome {
            Ok(Some(text)) => {
                self.reply(inv, &text).await;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                let caller = inv.caller.user_id.as_str();
                match &e {
                    BridgeError::Remote(_) | BridgeError::Store(_) | BridgeError::Aborted(_) => {
                        warn!(caller, command = name, error = %e, "Command failed");
                    }
                    _ => {
                        debug!(caller, command = name, error = %e, "Command refused");
                    }
                }
                self.reply(inv, &e.user_message()).await;
                Err(e)
            }
        }
    }

    /// Departure notification from the chat platform.
    pub async fn member_left(&self, owner_id: &str) -> Result<Option<Binding>> {
        self.bindings.on_owner_removed(owner_id).await
    }

    async fn reply(&self, inv: &Invocation<'_>, text: &str) {
        if let Err(e) = inv.surface.reply(text).await {
            warn!(error = %e, "Failed to deliver reply");
        }
    }

    async fn invoke(
        &self,
        inv: &Invocation<'_>,
        spec: &CommandSpec,
        args: &[&str],
    ) -> Result<Option<String>> {
        let scope = self.store.scope(&inv.ctx.scope_id)?;
        AuthorizationGuard::check(spec.required, &scope, inv.ctx, inv.caller)?;

        info!(
            scope = %inv.ctx.scope_id,
            caller = %inv.caller.user_id,
            command = spec.name,
            "Command invoked"
        );

        let usage = || BridgeError::Usage(spec.usage.to_string());
        let owner = inv.caller.user_id.as_str();

        match spec.kind {
            CommandKind::Bind => {
                let entry = args.first().ok_or_else(usage)?;
                self.bindings.bind(owner, entry).await?;
                Ok(Some(format!(
                    "You are now bound to the whitelist entry `{}` and added to the server whitelist.",
                    entry.to_lowercase()
                )))
            }

            CommandKind::Unbind => {
                self.bindings.unbind(owner).await?;
                Ok(Some(
                    "Successfully removed you from the server whitelist and your account is unbound."
                        .to_string(),
                ))
            }

            CommandKind::Info => match self.bindings.lookup(owner)? {
                Some(binding) => Ok(Some(format!(
                    "Your account is bound to the whitelist entry `{}`.",
                    binding.entry_id
                ))),
                None => Err(BridgeError::NotBound {
                    owner_id: owner.to_string(),
                }),
            },

            CommandKind::Sync => self.reconcile(inv, ReconcileMode::Sync).await,
            CommandKind::Purge => self.reconcile(inv, ReconcileMode::Purge).await,

            CommandKind::List => Ok(Some(format_bindings(&self.store.bindings()?))),

            CommandKind::AdminRole => {
                let role = args.first().ok_or_else(usage)?;
                self.store.set_admin_role(&inv.ctx.scope_id, role)?;
                Ok(Some(format!("Role `{}` is now set as admin role.", role)))
            }

            CommandKind::StatusChannel => {
                let channel = args
                    .first()
                    .copied()
                    .or(inv.ctx.channel_id.as_deref())
                    .ok_or_else(usage)?;
                self.store.set_status_channel(&inv.ctx.scope_id, channel)?;
                Ok(Some(format!("Set <#{}> as status channel.", channel)))
            }

            CommandKind::Enable => {
                self.store.set_disabled(&inv.ctx.scope_id, false)?;
                Ok(Some("Whitelist binding is now enabled.".to_string()))
            }

            CommandKind::Disable => {
                self.store.set_disabled(&inv.ctx.scope_id, true)?;
                Ok(Some("Whitelist binding is now disabled.".to_string()))
            }

            CommandKind::Status => Ok(Some(format_scope(&scope))),

            CommandKind::Sudo => {
                if !self.sudo_enabled {
                    return Err(BridgeError::SudoDisabled);
                }
                if args.is_empty() {
                    return Err(usage());
                }
                let reply = self.channel.send_raw(&args.join(" ")).await?;
                let shown = if reply.is_empty() { "[empty]" } else { reply.as_str() };
                Ok(Some(format!("Result:\n{}", shown)))
            }

            CommandKind::Help => Ok(Some(format_help())),
        }
    }

    /// Start a bulk reconciliation and render its report stream.
    async fn reconcile(&self, inv: &Invocation<'_>, mode: ReconcileMode) -> Result<Option<String>> {
        let snapshot = self.store.bindings()?;
        let handle = self.reconciler.spawn(mode, snapshot);

        progress::render(inv.surface, handle.reports).await;
        let summary = handle.summary.await?;

        Ok(format_failures(&summary))
    }
}

fn format_bindings(bindings: &[Binding]) -> String {
    if bindings.is_empty() {
        return "No bindings.".to_string();
    }
    let mut out = format!("{} bindings:", bindings.len());
    for binding in bindings {
        out.push_str(&format!("\n  {} -> {}", binding.owner_id, binding.entry_id));
    }
    out
}

fn format_scope(scope: &ScopeConfig) -> String {
    format!(
        "Scope {}\n  Admin role: {}\n  Status channel: {}\n  Binding: {}",
        scope.scope_id,
        scope.admin_role_id.as_deref().unwrap_or("(none)"),
        scope.status_channel_id.as_deref().unwrap_or("(none)"),
        if scope.disabled { "disabled" } else { "enabled" },
    )
}

fn format_help() -> String {
    let mut out = String::from("Commands:");
    for spec in COMMANDS {
        out.push_str(&format!("\n  {:<22} {} [{}]", spec.usage, spec.brief, spec.required));
    }
    out
}

/// Operator-facing note about skipped entries, if there were any.
fn format_failures(summary: &RunSummary) -> Option<String> {
    if summary.is_complete() {
        return None;
    }
    let mut out = String::new();
    if !summary.failures.is_empty() {
        out.push_str(&format!("{} entries failed:", summary.failures.len()));
        for failure in &summary.failures {
            out.push_str(&format!(
                "\n  {} ({}): {}",
                failure.binding.entry_id, failure.binding.owner_id, failure.error
            ));
        }
    }
    if let Some(e) = &summary.reload_error {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("Whitelist reload failed: {}", e));
    }
    Some(out)
}
