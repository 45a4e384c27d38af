//! Recommendation Surface Abstractions
//!
//! Provides platform-agnostic traits and record types for the host's
//! channel/program store: named rows of recommendations plus the singleton
//! watch-next queue. The host assigns channel identifiers; the core treats
//! them as opaque and persists them via [`SettingsStore`](crate::storage::SettingsStore).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Opaque host-assigned channel identifier.
///
/// The host store owns identifier allocation; the core only round-trips the
/// value through its key-value persistence to keep channel identity stable
/// across sync runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(i64);

impl ChannelId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChannelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Display settings for a channel.
///
/// `app_link` is the deep link the host opens when the channel header is
/// selected. `request_default` asks the host to surface the channel without
/// user opt-in; the core only honors it once, at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    pub display_name: String,
    pub app_link: String,
    pub request_default: bool,
}

/// Content kind of a program entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramKind {
    Library,
    Movie,
    Episode,
    Series,
    Album,
    Artist,
    Photo,
}

/// Poster aspect ratio, fixed per program kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// 2:3 movie poster
    Poster,
    /// 16:9 banner
    Wide,
    /// 1:1 album art
    Square,
}

/// One recommendable unit rendered inside a channel.
///
/// Records are transient: the core rebuilds them on every sync and never
/// mutates a published record. `season_display`/`episode_display` carry the
/// exact strings the host renders; they are empty for non-episode kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    /// Channel this record belongs to; must resolve to an existing channel
    /// at publish time.
    pub channel_id: ChannelId,
    pub kind: ProgramKind,
    pub title: String,
    /// Episode title for episodes, `None` otherwise.
    pub subtitle: Option<String>,
    pub season_display: String,
    pub episode_display: String,
    pub poster_uri: String,
    pub poster_aspect: AspectRatio,
    pub description: Option<String>,
    /// Catalog item id carried into the host's launch intent.
    pub launch_item_id: String,
}

/// Watch-state of a watch-next entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    /// Playback was started and has a resume position.
    Continue,
    /// First episode of a season, nothing watched yet.
    New,
    /// Default next-up entry.
    Next,
}

/// Entry for the singleton watch-next queue.
///
/// Unlike [`ProgramRecord`] these carry no channel id: the watch-next queue
/// is a host-managed list distinct from channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchNextRecord {
    pub kind: ProgramKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub season_display: String,
    pub episode_display: String,
    pub poster_uri: String,
    pub poster_aspect: AspectRatio,
    pub launch_item_id: String,
    pub state: WatchState,
    /// Last playback position in milliseconds, when `state` is `Continue`.
    pub position_ms: Option<i64>,
    /// Engagement timestamp in milliseconds since epoch; the host sorts the
    /// queue by it.
    pub engagement_ms: i64,
    /// Total running time in milliseconds, when the catalog reports one.
    pub duration_ms: Option<i64>,
}

/// Host channel/program store trait
///
/// Abstracts the platform primitive that persists and displays
/// recommendation rows:
/// - **Android TV**: TvProvider preview channels + watch-next programs
/// - **Other launchers**: whatever content-provider-like store they expose
///
/// # Semantics
///
/// - Channels are created once and updated in place; the core never deletes
///   a channel.
/// - Program writes are not transactional against concurrent readers of the
///   host store; clear-then-insert per channel is the unit of visible change.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::channels::{ChannelStore, ChannelSettings};
///
/// async fn ensure_row(store: &dyn ChannelStore) -> Result<()> {
///     let id = store
///         .create_channel(&ChannelSettings {
///             display_name: "My Media".into(),
///             app_link: "app://libraries".into(),
///             request_default: true,
///         })
///         .await?;
///     store.request_default_channel(id).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Whether the host supports recommendation channels at all.
    ///
    /// When this returns `false` the core must not attempt any mutation.
    fn supports_channels(&self) -> bool;

    /// Create a new channel and return its host-assigned identifier.
    async fn create_channel(&self, settings: &ChannelSettings) -> Result<ChannelId>;

    /// Update display settings of an existing channel, keeping its identity.
    async fn update_channel(&self, id: ChannelId, settings: &ChannelSettings) -> Result<()>;

    /// Ask the host to make a channel visible by default.
    ///
    /// Hosts may prompt the user or ignore the request entirely.
    async fn request_default_channel(&self, id: ChannelId) -> Result<()>;

    /// Remove all programs of a single channel.
    async fn clear_programs(&self, id: ChannelId) -> Result<()>;

    /// Bulk-insert programs; each record names the channel it belongs to.
    async fn insert_programs(&self, programs: &[ProgramRecord]) -> Result<()>;

    /// Remove every preview program this application ever published,
    /// across all channels. Watch-next entries are unaffected.
    async fn clear_all_programs(&self) -> Result<()>;

    /// Remove all watch-next entries published by this application.
    async fn clear_watch_next(&self) -> Result<()>;

    /// Bulk-insert watch-next entries.
    async fn insert_watch_next(&self, records: &[WatchNextRecord]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_round_trip() {
        let id = ChannelId::new(42);
        let parsed: ChannelId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.value(), 42);
    }

    #[test]
    fn test_channel_id_rejects_garbage() {
        assert!("not-a-number".parse::<ChannelId>().is_err());
    }
}
