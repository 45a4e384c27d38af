//! # Catalog Gateway
//!
//! Typed, read-only queries against the remote media catalog.
//!
//! ## Overview
//!
//! This crate is the boundary between the sync core and the catalog server:
//! - [`CatalogGateway`](gateway::CatalogGateway) - the async trait the core
//!   consumes (library views, latest items, next-up, resumable items)
//! - [`ImageSource`](gateway::ImageSource) - pure image URL construction
//! - [`HttpCatalogClient`](client::HttpCatalogClient) - thin `reqwest`-backed
//!   implementation
//!
//! All catalog calls are read-only; any transport failure surfaces as a
//! [`CatalogError`](error::CatalogError) and the core treats it as a
//! whole-run failure. Retry timing is owned by the caller's scheduler, so
//! the client performs no backoff of its own.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::HttpCatalogClient;
pub use error::{CatalogError, Result};
pub use gateway::{CatalogGateway, ImageSource, ImageUrlBuilder};
pub use types::{
    CatalogItem, CollectionKind, ImageFormat, ImageType, ItemField, ItemKind, LibraryView,
    MediaType, SortOrder, UserItemData,
};
