//! # Channel Sync Module
//!
//! Rebuilds the host platform's recommendation surface from a remote media
//! catalog.
//!
//! ## Overview
//!
//! Each synchronization run is an independent, best-effort full rebuild:
//! - Fetching library views, latest items, next-up and resumable items via
//!   `CatalogGateway`
//! - Classifying heterogeneous catalog items into typed program records
//! - Computing watch-state and engagement for the watch-next queue
//! - Publishing channels through the host `ChannelStore`, keeping channel
//!   identity stable across runs via `ChannelKeyStore`
//!
//! ## Components
//!
//! - **Channel Key Store** (`channel_key`): Persistent logical-name →
//!   host-channel-id mapping
//! - **Item Classifier** (`classifier`): Pure catalog-item → program-record
//!   mapping
//! - **Watch Next Evaluator** (`watch_next`): Pure watch-state and
//!   engagement computation
//! - **Channel Publisher** (`publisher`): Resolve-then-replace channel
//!   publishing
//! - **Sync Orchestrator** (`orchestrator`): Concurrent fetch, sequential
//!   rebuild, terminal outcome

pub mod channel_key;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod publisher;
pub mod session;
pub mod watch_next;

pub use channel_key::ChannelKeyStore;
pub use classifier::{classify, index_label, library_record, ClassifyContext};
pub use error::{Result, SyncError, SyncOutcome};
pub use orchestrator::{latest_key, SyncConfig, SyncOrchestrator, MY_MEDIA_KEY, NEXT_UP_KEY};
pub use publisher::ChannelPublisher;
pub use session::{Session, SessionSource};
pub use watch_next::{evaluate, TICKS_PER_MILLISECOND};
