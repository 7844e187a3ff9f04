//! Single-entry bind, unbind and departure cleanup
//!
//! Unlike bulk runs these act immediately and do not swallow remote errors:
//! a failed console command comes back to the caller, after the store has
//! already been updated.

use std::sync::Arc;

use tracing::info;

use crate::error::{BridgeError, Conflict, Result};
use crate::reconcile::Pacer;
use crate::remote::{SerializedChannel, WhitelistCommand};
use crate::store::{Binding, MappingStore};

pub struct BindingService {
    store: Arc<dyn MappingStore>,
    channel: SerializedChannel,
    pacer: Arc<dyn Pacer>,
}

impl BindingService {
    pub fn new(
        store: Arc<dyn MappingStore>,
        channel: SerializedChannel,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            store,
            channel,
            pacer,
        }
    }

    /// Bind `owner_id` to `entry_id` and mirror it on the server.
    ///
    /// Returns the entry the owner was bound to before, if any.
    pub async fn bind(&self, owner_id: &str, entry_id: &str) -> Result<Option<String>> {
        let entry_id = entry_id.to_lowercase();

        if let Some(existing) = self.store.binding_for_entry(&entry_id)? {
            let conflict = if existing.owner_id == owner_id {
                Conflict::AlreadyYours { entry_id }
            } else {
                Conflict::TakenByOther { entry_id }
            };
            return Err(BridgeError::Conflict(conflict));
        }

        let previous = self.store.set_binding(owner_id, &entry_id)?;
        info!(owner = owner_id, entry = %entry_id, previous = ?previous, "Bound whitelist entry");

        if let Some(old) = &previous {
            self.channel
                .execute(&WhitelistCommand::Remove(old.clone()))
                .await?;
        }
        self.channel.execute(&WhitelistCommand::Add(entry_id)).await?;

        Ok(previous)
    }

    /// Remove the owner's binding and take the entry off the server.
    pub async fn unbind(&self, owner_id: &str) -> Result<Binding> {
        let binding = self
            .store
            .remove_binding(owner_id)?
            .ok_or_else(|| BridgeError::NotBound {
                owner_id: owner_id.to_string(),
            })?;
        info!(owner = owner_id, entry = %binding.entry_id, "Unbound whitelist entry");

        self.channel
            .execute(&WhitelistCommand::Remove(binding.entry_id.clone()))
            .await?;

        Ok(binding)
    }

    /// Clean up after an owner left the scope.
    ///
    /// The entry is removed and the server reloaded before the binding is
    /// deleted, so a console failure leaves the binding in place.
    pub async fn on_owner_removed(&self, owner_id: &str) -> Result<Option<Binding>> {
        let Some(binding) = self.store.binding_for_owner(owner_id)? else {
            return Ok(None);
        };

        self.channel
            .execute(&WhitelistCommand::Remove(binding.entry_id.clone()))
            .await?;
        self.pacer.pause().await;
        self.channel.execute(&WhitelistCommand::Reload).await?;

        self.store.remove_binding(owner_id)?;
        info!(
            owner = owner_id,
            entry = %binding.entry_id,
            "Removed departed member from whitelist"
        );

        Ok(Some(binding))
    }

    /// The owner's current binding.
    pub fn lookup(&self, owner_id: &str) -> Result<Option<Binding>> {
        Ok(self.store.binding_for_owner(owner_id)?)
    }
}
