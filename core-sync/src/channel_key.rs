//! # Channel Key Store
//!
//! Persistent mapping from a stable logical channel name (`"my_media"`,
//! `"latest_<library-id>"`, `"next_up"`) to the host's opaque channel
//! identifier.
//!
//! The host platform offers no natural foreign key for "the channel this
//! application created last run", so the mapping lives in the key-value
//! settings store and is the sole source of truth for whether a logical
//! channel already exists. Channels are created on the first run that needs
//! them and updated (never duplicated) afterwards; this store never deletes
//! a channel.

use std::sync::Arc;

use bridge_traits::{ChannelId, ChannelSettings, ChannelStore, SettingsStore};
use tracing::{debug, warn};

use crate::error::Result;

const ID_KEY_PREFIX: &str = "channel.id.";
const DEFAULT_REQUESTED_KEY_PREFIX: &str = "channel.default_requested.";

fn id_key(name: &str) -> String {
    format!("{ID_KEY_PREFIX}{name}")
}

fn default_requested_key(name: &str) -> String {
    format!("{DEFAULT_REQUESTED_KEY_PREFIX}{name}")
}

/// Logical-name → host-channel-id mapping over the settings store.
pub struct ChannelKeyStore {
    channels: Arc<dyn ChannelStore>,
    settings: Arc<dyn SettingsStore>,
}

impl ChannelKeyStore {
    pub fn new(channels: Arc<dyn ChannelStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { channels, settings }
    }

    /// Return the stored channel id for `name`, creating the channel on the
    /// host when no mapping exists.
    ///
    /// On creation only, when `settings.request_default` is set and no
    /// default request was recorded for this name yet, the host is asked to
    /// surface the channel by default; a persisted flag keeps the request
    /// once-only across runs and updates.
    pub async fn resolve(&self, name: &str, settings: &ChannelSettings) -> Result<ChannelId> {
        if let Some(id) = self.stored_id(name).await? {
            return Ok(id);
        }

        let id = self.channels.create_channel(settings).await?;
        self.settings
            .set_string(&id_key(name), &id.to_string())
            .await?;
        debug!(channel = name, id = %id, "created channel");

        if settings.request_default && !self.default_requested(name).await? {
            self.channels.request_default_channel(id).await?;
            self.settings
                .set_bool(&default_requested_key(name), true)
                .await?;
        }

        Ok(id)
    }

    /// Push new display settings to the host when a mapping for `name`
    /// already exists, keeping the channel's identity.
    ///
    /// Returns the mapped id, or `None` when the channel was never created.
    pub async fn update(
        &self,
        name: &str,
        settings: &ChannelSettings,
    ) -> Result<Option<ChannelId>> {
        match self.stored_id(name).await? {
            Some(id) => {
                self.channels.update_channel(id, settings).await?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Persisted id for `name`, if any.
    ///
    /// A value that no longer parses as a host identifier is dropped and
    /// treated as absent; the mapping is a cache of host identity and
    /// recreating converges on the next run.
    async fn stored_id(&self, name: &str) -> Result<Option<ChannelId>> {
        let Some(value) = self.settings.get_string(&id_key(name)).await? else {
            return Ok(None);
        };

        match value.parse::<ChannelId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                warn!(channel = name, value, "discarding corrupt channel id mapping");
                self.settings.delete(&id_key(name)).await?;
                Ok(None)
            }
        }
    }

    async fn default_requested(&self, name: &str) -> Result<bool> {
        Ok(self
            .settings
            .get_bool(&default_requested_key(name))
            .await?
            .unwrap_or(false))
    }
}
