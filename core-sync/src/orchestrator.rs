//! # Sync Orchestrator
//!
//! Drives one synchronization run: entry checks, a concurrent fetch phase
//! against the catalog gateway, then a strictly sequential write phase that
//! rebuilds every channel and the watch-next queue.
//!
//! ## Workflow
//!
//! 1. Capability check: no recommendation-channel support → `Failure`,
//!    nothing touched.
//! 2. Session check: no usable session → `Retry`, nothing touched. This is
//!    evaluated strictly before any clear, so user-visible channels survive
//!    a merely-temporary auth outage.
//! 3. Concurrent fetch: resumable items, next-up items, library views and
//!    latest-per-library items.
//! 4. Sequential writes: clear the shared preview-program area once, then
//!    rebuild "my media", each latest-per-library channel, "next up", and
//!    the watch-next queue.
//!
//! A run either completes or fails outright; there is no cancellation and
//! no rollback. Each channel's rebuild is independently idempotent, so
//! partial writes self-correct on the next successful run.

use std::collections::HashSet;
use std::sync::Arc;

use bridge_traits::{ChannelSettings, ChannelStore, Clock, SettingsStore};
use core_catalog::{
    CatalogGateway, CatalogItem, CollectionKind, ImageSource, ItemField, LibraryView, MediaType,
    SortOrder,
};
use futures::future::try_join_all;
use tracing::{debug, error, info, instrument, warn};

use crate::classifier::{self, ClassifyContext};
use crate::error::{Result, SyncError, SyncOutcome};
use crate::publisher::ChannelPublisher;
use crate::session::{Session, SessionSource};
use crate::watch_next;

/// Logical key of the libraries channel.
pub const MY_MEDIA_KEY: &str = "my_media";
/// Logical key of the next-up channel.
pub const NEXT_UP_KEY: &str = "next_up";

/// Logical key of the latest-items channel for one library.
///
/// Keyed by library id, not display name: a renamed library keeps its host
/// channel identity and only the display settings change.
pub fn latest_key(library_id: &str) -> String {
    format!("latest_{library_id}")
}

const MY_MEDIA_LINK: &str = "app://libraries";
const NEXT_UP_LINK: &str = "app://home";

/// Item fields every fetch requests.
const ITEM_FIELDS: [ItemField; 2] = [ItemField::DateCreated, ItemField::Overview];

/// Sync orchestrator configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Items fetched per latest-per-library channel
    pub latest_limit: u32,

    /// Items fetched for the next-up channel
    pub next_up_limit: u32,

    /// Resumable items fetched for the watch-next queue
    pub resume_limit: u32,

    /// Images requested per item
    pub image_type_limit: u32,

    /// Prefer the series thumbnail when an item has no primary image
    pub prefer_parent_thumb: bool,

    /// Host resource shown when no catalog image is usable
    pub placeholder_image_uri: String,

    /// Library collection types that get a latest-per-library channel
    pub latest_collection_kinds: Vec<CollectionKind>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            latest_limit: 10,
            next_up_limit: 10,
            resume_limit: 10,
            image_type_limit: 1,
            prefer_parent_thumb: false,
            placeholder_image_uri: "resource://poster/placeholder".to_string(),
            latest_collection_kinds: vec![
                CollectionKind::Movies,
                CollectionKind::TvShows,
                CollectionKind::Music,
            ],
        }
    }
}

/// Sync orchestrator for rebuilding the recommendation surface
pub struct SyncOrchestrator {
    config: SyncConfig,
    gateway: Arc<dyn CatalogGateway>,
    channels: Arc<dyn ChannelStore>,
    sessions: Arc<dyn SessionSource>,
    clock: Arc<dyn Clock>,
    publisher: ChannelPublisher,
}

impl SyncOrchestrator {
    pub fn new(
        config: SyncConfig,
        gateway: Arc<dyn CatalogGateway>,
        channels: Arc<dyn ChannelStore>,
        settings: Arc<dyn SettingsStore>,
        sessions: Arc<dyn SessionSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let publisher = ChannelPublisher::new(channels.clone(), settings);
        Self {
            config,
            gateway,
            channels,
            sessions,
            clock,
            publisher,
        }
    }

    /// Execute one synchronization run and report its terminal outcome.
    ///
    /// Runs are not guarded against each other; the host scheduler must
    /// serialize invocations (e.g. via a uniquely-named work request).
    #[instrument(skip(self))]
    pub async fn run(&self) -> SyncOutcome {
        match self.execute().await {
            Ok(()) => {
                info!("channel sync completed");
                SyncOutcome::Success
            }
            Err(e) => {
                let outcome = e.outcome();
                match outcome {
                    SyncOutcome::Retry => info!("channel sync deferred: {e}"),
                    _ => error!("channel sync failed: {e}"),
                }
                outcome
            }
        }
    }

    async fn execute(&self) -> Result<()> {
        // Entry checks, strictly before any network call or mutation.
        if !self.channels.supports_channels() {
            warn!("host lacks recommendation channel support");
            return Err(SyncError::ChannelsUnsupported);
        }
        let session = self
            .sessions
            .current_session()
            .await
            .ok_or(SyncError::NoSession)?;

        let (library_data, resumable, next_up) = self.fetch(&session).await?;
        let (libraries, latest) = library_data;
        info!(
            libraries = libraries.len(),
            latest_channels = latest.len(),
            next_up = next_up.len(),
            resumable = resumable.len(),
            "catalog fetch complete"
        );

        // Write phase is sequential: two channels must never race to create
        // the same logical key.
        self.channels.clear_all_programs().await?;
        self.update_my_media(&libraries).await?;
        for (library, items) in &latest {
            self.update_latest_items(library, items).await?;
        }
        self.update_next_up(&next_up).await?;
        self.update_watch_next(&resumable, &next_up).await?;

        Ok(())
    }

    /// Concurrent fetch phase. Latest-per-library fetches are chained after
    /// the library list they depend on, but run concurrently with each
    /// other and with the resumable/next-up fetches.
    #[allow(clippy::type_complexity)]
    async fn fetch(
        &self,
        session: &Session,
    ) -> Result<(
        (Vec<LibraryView>, Vec<(LibraryView, Vec<CatalogItem>)>),
        Vec<CatalogItem>,
        Vec<CatalogItem>,
    )> {
        let libraries_fut = async {
            let libraries = self.gateway.list_libraries(false).await?;
            let latest = try_join_all(
                libraries
                    .iter()
                    .filter(|library| self.wants_latest(library))
                    .map(|library| async move {
                        let items = self
                            .gateway
                            .latest_items(
                                &library.id,
                                self.config.image_type_limit,
                                self.config.latest_limit,
                                &ITEM_FIELDS,
                                false,
                            )
                            .await?;
                        Ok::<_, SyncError>((library.clone(), items))
                    }),
            )
            .await?;
            Ok::<_, SyncError>((libraries, latest))
        };

        let resumable_fut = async {
            Ok::<_, SyncError>(
                self.gateway
                    .resumable(
                        &session.user_id,
                        &[MediaType::Video],
                        self.config.image_type_limit,
                        self.config.resume_limit,
                        &ITEM_FIELDS,
                        SortOrder::Descending,
                    )
                    .await?,
            )
        };

        let next_up_fut = async {
            Ok::<_, SyncError>(
                self.gateway
                    .next_up(
                        &session.user_id,
                        self.config.image_type_limit,
                        self.config.next_up_limit,
                        &ITEM_FIELDS,
                    )
                    .await?,
            )
        };

        tokio::try_join!(libraries_fut, resumable_fut, next_up_fut)
    }

    fn wants_latest(&self, library: &LibraryView) -> bool {
        library
            .collection_type
            .map(|kind| self.config.latest_collection_kinds.contains(&kind))
            .unwrap_or(false)
    }

    fn classify_ctx(&self) -> ClassifyContext<'_> {
        ClassifyContext {
            prefer_parent_thumb: self.config.prefer_parent_thumb,
            placeholder_image_uri: &self.config.placeholder_image_uri,
            images: self.gateway.as_ref() as &dyn ImageSource,
        }
    }

    /// Rebuild the "my media" channel from the library list. This channel
    /// is the one requested as a host default, once, at creation.
    async fn update_my_media(&self, libraries: &[LibraryView]) -> Result<()> {
        let settings = ChannelSettings {
            display_name: "My Media".to_string(),
            app_link: MY_MEDIA_LINK.to_string(),
            request_default: true,
        };
        let ctx = self.classify_ctx();
        self.publisher
            .publish(MY_MEDIA_KEY, &settings, |id| {
                libraries
                    .iter()
                    .map(|view| classifier::library_record(view, id, &ctx))
                    .collect()
            })
            .await?;
        Ok(())
    }

    /// Rebuild the latest-items channel of one library.
    async fn update_latest_items(
        &self,
        library: &LibraryView,
        items: &[CatalogItem],
    ) -> Result<()> {
        let settings = ChannelSettings {
            display_name: format!("Latest {}", library.name),
            app_link: format!("app://library/{}", library.id),
            request_default: false,
        };
        let ctx = self.classify_ctx();
        self.publisher
            .publish(&latest_key(&library.id), &settings, |id| {
                items
                    .iter()
                    .filter_map(|item| classifier::classify(item, id, &ctx))
                    .collect()
            })
            .await?;
        Ok(())
    }

    /// Rebuild the "next up" channel.
    async fn update_next_up(&self, items: &[CatalogItem]) -> Result<()> {
        let settings = ChannelSettings {
            display_name: "Next Up".to_string(),
            app_link: NEXT_UP_LINK.to_string(),
            request_default: false,
        };
        let ctx = self.classify_ctx();
        self.publisher
            .publish(NEXT_UP_KEY, &settings, |id| {
                items
                    .iter()
                    .filter_map(|item| classifier::classify(item, id, &ctx))
                    .collect()
            })
            .await?;
        Ok(())
    }

    /// Clear and rebuild the watch-next queue from the union of resumable
    /// and next-up items. Resumable items come first so an in-progress
    /// episode keeps its `Continue` state over its next-up appearance;
    /// duplicates by item id are skipped.
    async fn update_watch_next(
        &self,
        resumable: &[CatalogItem],
        next_up: &[CatalogItem],
    ) -> Result<()> {
        self.channels.clear_watch_next().await?;

        let now_ms = self.clock.unix_timestamp_millis();
        let ctx = self.classify_ctx();
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for item in resumable.iter().chain(next_up.iter()) {
            if !seen.insert(item.id.clone()) {
                continue;
            }
            match watch_next::evaluate(item, &ctx, now_ms) {
                Some(record) => records.push(record),
                None => debug!(item = %item.id, "dropping unrecognized watch-next item"),
            }
        }

        if !records.is_empty() {
            self.channels.insert_watch_next(&records).await?;
        }
        debug!(count = records.len(), "published watch-next queue");
        Ok(())
    }
}
