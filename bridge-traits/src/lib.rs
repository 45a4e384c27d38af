//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the sync core and the host
//! platform that actually owns the recommendation surface. The core has no
//! notion of how channels are rendered or where preferences live; each trait
//! here represents a capability the core requires but that the host must
//! provide (a TV launcher content store, a preferences store, a clock).
//!
//! ## Traits
//!
//! ### Recommendation surface
//! - [`ChannelStore`](channels::ChannelStore) - Named channels, their
//!   programs, and the singleton watch-next queue
//!
//! ### Storage
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences
//!   storage, used to persist channel identity across sync runs
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Host implementations should convert platform-specific failures into
//! `BridgeError` with actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared freely across async tasks.

pub mod channels;
pub mod error;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use channels::{
    AspectRatio, ChannelId, ChannelSettings, ChannelStore, ProgramKind, ProgramRecord, WatchNextRecord,
    WatchState,
};
pub use storage::SettingsStore;
pub use time::{Clock, SystemClock};
