//! Catalog API response types
//!
//! Data structures for deserializing catalog server responses. The wire
//! format uses PascalCase field names; unknown item kinds deserialize to
//! [`ItemKind::Unknown`] so a new server-side type never breaks a sync run.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Content kind reported by the catalog.
///
/// Closed set of the kinds the sync core understands, plus an explicit
/// `Unknown` catch-all. Dispatch over this enum is exhaustive; items that
/// come back as `Unknown` are dropped per-item, never failing a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
pub enum ItemKind {
    Movie,
    Episode,
    Series,
    MusicAlbum,
    MusicArtist,
    PhotoAlbum,
    CollectionFolder,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Image slots a catalog item may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ImageType {
    Primary,
    Thumb,
    Banner,
    Backdrop,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Primary => "Primary",
            ImageType::Thumb => "Thumb",
            ImageType::Banner => "Banner",
            ImageType::Backdrop => "Backdrop",
        }
    }
}

/// Encoding requested for served images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Webp,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "Png",
            ImageFormat::Jpg => "Jpg",
            ImageFormat::Webp => "Webp",
        }
    }
}

/// Extra item fields the gateway can ask the server to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    DateCreated,
    Overview,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::DateCreated => "DateCreated",
            ItemField::Overview => "Overview",
        }
    }
}

/// Media type filter for resumable queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Video,
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "Video",
            MediaType::Audio => "Audio",
        }
    }
}

/// Sort direction for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

/// Collection type of a library view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Movies,
    TvShows,
    Music,
    Photos,
    #[serde(other)]
    #[default]
    Unknown,
}

/// A user-visible library (view) on the catalog server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub collection_type: Option<CollectionKind>,
}

/// Per-user playback state attached to an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserItemData {
    /// Resume position in catalog ticks (10,000 ticks per millisecond).
    #[serde(default)]
    pub playback_position_ticks: i64,
    #[serde(default)]
    pub last_played_date: Option<DateTime<Utc>>,
}

/// A read-only catalog item (movie, episode, series, album, ...).
///
/// Only the fields the sync core consumes are modeled; everything else the
/// server sends is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: ItemKind,
    /// Series linkage, present on episodes.
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub series_name: Option<String>,
    /// Item the parent thumbnail image belongs to, when the series carries
    /// one the item itself lacks.
    #[serde(default)]
    pub parent_thumb_item_id: Option<String>,
    /// Image availability: slot → cache tag.
    #[serde(default)]
    pub image_tags: HashMap<ImageType, String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Episode number within the season; may be the start of a range.
    #[serde(default)]
    pub index_number: Option<i32>,
    /// End of the episode range, when the item spans several episodes.
    #[serde(default)]
    pub index_number_end: Option<i32>,
    /// Season number.
    #[serde(default)]
    pub parent_index_number: Option<i32>,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_data: Option<UserItemData>,
}

impl CatalogItem {
    /// Resume position in ticks, zero when the item was never started.
    pub fn playback_position_ticks(&self) -> i64 {
        self.user_data
            .as_ref()
            .map(|u| u.playback_position_ticks)
            .unwrap_or(0)
    }

    pub fn has_image(&self, image_type: ImageType) -> bool {
        self.image_tags.contains_key(&image_type)
    }
}

/// Envelope for item list responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Envelope for library view responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewsResponse {
    #[serde(default)]
    pub items: Vec<LibraryView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_episode() {
        let json = r#"{
            "Id": "ep-1",
            "Name": "Pilot",
            "Type": "Episode",
            "SeriesId": "s-1",
            "SeriesName": "Some Show",
            "ImageTags": { "Primary": "abc123" },
            "IndexNumber": 1,
            "ParentIndexNumber": 2,
            "RunTimeTicks": 12345000,
            "UserData": { "PlaybackPositionTicks": 600000, "LastPlayedDate": "2024-03-01T12:00:00Z" }
        }"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Episode);
        assert_eq!(item.series_name.as_deref(), Some("Some Show"));
        assert!(item.has_image(ImageType::Primary));
        assert!(!item.has_image(ImageType::Thumb));
        assert_eq!(item.playback_position_ticks(), 600_000);
        assert_eq!(item.index_number, Some(1));
        assert_eq!(item.run_time_ticks, Some(12_345_000));
    }

    #[test]
    fn test_unknown_kind_is_not_an_error() {
        let json = r#"{ "Id": "x", "Name": "weird", "Type": "HologramDeck" }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Unknown);
        assert_eq!(item.playback_position_ticks(), 0);
    }

    #[test]
    fn test_deserialize_library_views() {
        let json = r#"{ "Items": [
            { "Id": "lib-1", "Name": "Movies", "CollectionType": "movies" },
            { "Id": "lib-2", "Name": "Box Sets", "CollectionType": "boxsets" },
            { "Id": "lib-3", "Name": "Stuff" }
        ] }"#;

        let views: ViewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(views.items.len(), 3);
        assert_eq!(views.items[0].collection_type, Some(CollectionKind::Movies));
        assert_eq!(views.items[1].collection_type, Some(CollectionKind::Unknown));
        assert_eq!(views.items[2].collection_type, None);
    }
}
