//! # Channel Publisher
//!
//! Resolve-then-replace publishing of one channel: resolve the host channel
//! id via [`ChannelKeyStore`], clear the channel's programs, bulk-insert the
//! new ones. Clear-then-insert is the unit of visible change per channel; it
//! is not transactional against concurrent readers of the host store.

use std::sync::Arc;

use bridge_traits::{ChannelId, ChannelSettings, ChannelStore, ProgramRecord, SettingsStore};
use tracing::debug;

use crate::channel_key::ChannelKeyStore;
use crate::error::Result;

pub struct ChannelPublisher {
    keys: ChannelKeyStore,
    channels: Arc<dyn ChannelStore>,
}

impl ChannelPublisher {
    pub fn new(channels: Arc<dyn ChannelStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            keys: ChannelKeyStore::new(channels.clone(), settings),
            channels,
        }
    }

    /// Resolve the host channel for a logical name, creating it when absent
    /// and refreshing its display settings when it already exists.
    pub async fn resolve(&self, name: &str, settings: &ChannelSettings) -> Result<ChannelId> {
        match self.keys.update(name, settings).await? {
            Some(id) => Ok(id),
            None => self.keys.resolve(name, settings).await,
        }
    }

    /// Full replace of one channel's programs.
    ///
    /// `build` receives the resolved channel id so every produced record is
    /// tagged to an existing channel; entries are never published without a
    /// parent channel.
    pub async fn publish<F>(
        &self,
        name: &str,
        settings: &ChannelSettings,
        build: F,
    ) -> Result<ChannelId>
    where
        F: FnOnce(ChannelId) -> Vec<ProgramRecord>,
    {
        let id = self.resolve(name, settings).await?;
        let programs = build(id);

        self.channels.clear_programs(id).await?;
        if !programs.is_empty() {
            self.channels.insert_programs(&programs).await?;
        }
        debug!(channel = name, id = %id, count = programs.len(), "published channel");

        Ok(id)
    }
}
