//! # Item Classifier
//!
//! Pure mapping from a catalog item plus context flags to a typed program
//! record. No I/O beyond poster URL string construction; unknown item kinds
//! yield `None` and are dropped per item, never failing a run.

use bridge_traits::{AspectRatio, ChannelId, ProgramKind, ProgramRecord};
use core_catalog::{CatalogItem, ImageFormat, ImageSource, ImageType, ItemKind, LibraryView};

/// Image encoding requested for all posters.
const POSTER_FORMAT: ImageFormat = ImageFormat::Webp;

/// Fixed target size for parent/series thumbnail fallbacks.
const PARENT_THUMB_WIDTH: u32 = 1280;
const PARENT_THUMB_HEIGHT: u32 = 720;

/// Classification context, shared by a whole sync run.
#[derive(Clone, Copy)]
pub struct ClassifyContext<'a> {
    /// Prefer the series thumbnail over a missing item image (user
    /// preference, typically for episode-heavy rows).
    pub prefer_parent_thumb: bool,
    /// Host resource shown when no catalog image is usable.
    pub placeholder_image_uri: &'a str,
    /// Poster URL construction; string formatting only.
    pub images: &'a dyn ImageSource,
}

/// Classify a catalog item into a program record for `channel_id`.
///
/// Returns `None` for item kinds the recommendation surface does not
/// render.
pub fn classify(
    item: &CatalogItem,
    channel_id: ChannelId,
    ctx: &ClassifyContext<'_>,
) -> Option<ProgramRecord> {
    let fields = entry_fields(item, ctx)?;
    Some(ProgramRecord {
        channel_id,
        kind: fields.kind,
        title: fields.title,
        subtitle: fields.subtitle,
        season_display: fields.season_display,
        episode_display: fields.episode_display,
        poster_uri: fields.poster_uri,
        poster_aspect: fields.poster_aspect,
        description: item.overview.clone(),
        launch_item_id: item.id.clone(),
    })
}

/// Program record for a library view inside the "my media" channel.
///
/// Library views always use their primary image slot; the server serves a
/// generated cover when the library has none of its own.
pub fn library_record(
    view: &LibraryView,
    channel_id: ChannelId,
    ctx: &ClassifyContext<'_>,
) -> ProgramRecord {
    let aspect = aspect_for(ProgramKind::Library);
    let (width, height) = target_size(aspect);
    ProgramRecord {
        channel_id,
        kind: ProgramKind::Library,
        title: view.name.clone(),
        subtitle: None,
        season_display: String::new(),
        episode_display: String::new(),
        poster_uri: ctx
            .images
            .image_url(&view.id, ImageType::Primary, POSTER_FORMAT, width, height)
            .to_string(),
        poster_aspect: aspect,
        description: None,
        launch_item_id: view.id.clone(),
    }
}

/// Render an ordinal index, or index range, the way the host displays it.
///
/// Both start and end present → `"{start}-{end}"`; start only → the single
/// index; otherwise the empty string. These exact strings are part of the
/// contract with the host.
pub fn index_label(index: Option<i32>, end_index: Option<i32>) -> String {
    match (index, end_index) {
        (Some(start), Some(end)) => format!("{start}-{end}"),
        (Some(start), None) => start.to_string(),
        _ => String::new(),
    }
}

/// Static aspect-ratio table; not inferred from images.
pub fn aspect_for(kind: ProgramKind) -> AspectRatio {
    match kind {
        ProgramKind::Movie | ProgramKind::Series => AspectRatio::Poster,
        ProgramKind::Episode | ProgramKind::Library => AspectRatio::Wide,
        ProgramKind::Album | ProgramKind::Artist | ProgramKind::Photo => AspectRatio::Square,
    }
}

/// Fields shared between program and watch-next records.
pub(crate) struct EntryFields {
    pub kind: ProgramKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub season_display: String,
    pub episode_display: String,
    pub poster_uri: String,
    pub poster_aspect: AspectRatio,
}

pub(crate) fn entry_fields(item: &CatalogItem, ctx: &ClassifyContext<'_>) -> Option<EntryFields> {
    let kind = program_kind(item.kind)?;
    let aspect = aspect_for(kind);

    let (title, subtitle, season_display, episode_display) = if kind == ProgramKind::Episode {
        (
            item.series_name.clone().unwrap_or_else(|| item.name.clone()),
            Some(item.name.clone()),
            index_label(item.parent_index_number, None),
            index_label(item.index_number, item.index_number_end),
        )
    } else {
        (item.name.clone(), None, String::new(), String::new())
    };

    Some(EntryFields {
        kind,
        title,
        subtitle,
        season_display,
        episode_display,
        poster_uri: poster_uri(item, aspect, ctx),
        poster_aspect: aspect,
    })
}

fn program_kind(kind: ItemKind) -> Option<ProgramKind> {
    match kind {
        ItemKind::Movie => Some(ProgramKind::Movie),
        ItemKind::Episode => Some(ProgramKind::Episode),
        ItemKind::Series => Some(ProgramKind::Series),
        ItemKind::MusicAlbum => Some(ProgramKind::Album),
        ItemKind::MusicArtist => Some(ProgramKind::Artist),
        ItemKind::PhotoAlbum => Some(ProgramKind::Photo),
        ItemKind::CollectionFolder => Some(ProgramKind::Library),
        ItemKind::Unknown => None,
    }
}

/// Poster selection, applied uniformly: the item's own primary image, else
/// the parent/series thumbnail when preferred and available, else the
/// placeholder resource.
fn poster_uri(item: &CatalogItem, aspect: AspectRatio, ctx: &ClassifyContext<'_>) -> String {
    if item.has_image(ImageType::Primary) {
        let (width, height) = target_size(aspect);
        return ctx
            .images
            .image_url(&item.id, ImageType::Primary, POSTER_FORMAT, width, height)
            .to_string();
    }

    if ctx.prefer_parent_thumb {
        if let Some(parent_id) = &item.parent_thumb_item_id {
            return ctx
                .images
                .image_url(
                    parent_id,
                    ImageType::Thumb,
                    POSTER_FORMAT,
                    PARENT_THUMB_WIDTH,
                    PARENT_THUMB_HEIGHT,
                )
                .to_string();
        }
    }

    ctx.placeholder_image_uri.to_string()
}

fn target_size(aspect: AspectRatio) -> (u32, u32) {
    match aspect {
        AspectRatio::Poster => (300, 450),
        AspectRatio::Wide => (1280, 720),
        AspectRatio::Square => (400, 400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_catalog::ImageUrlBuilder;
    use std::collections::HashMap;
    use url::Url;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new(Url::parse("http://media.local/").unwrap())
    }

    fn ctx<'a>(prefer_parent_thumb: bool, images: &'a ImageUrlBuilder) -> ClassifyContext<'a> {
        ClassifyContext {
            prefer_parent_thumb,
            placeholder_image_uri: "resource://poster/placeholder",
            images,
        }
    }

    fn item(kind: ItemKind) -> CatalogItem {
        serde_json::from_str::<CatalogItem>(r#"{ "Id": "item-1", "Name": "Something" }"#)
            .map(|mut i| {
                i.kind = kind;
                i
            })
            .unwrap()
    }

    #[test]
    fn test_index_label_formatting() {
        assert_eq!(index_label(Some(5), None), "5");
        assert_eq!(index_label(Some(5), Some(7)), "5-7");
        assert_eq!(index_label(None, None), "");
        assert_eq!(index_label(None, Some(7)), "");
    }

    #[test]
    fn test_aspect_table() {
        assert_eq!(aspect_for(ProgramKind::Movie), AspectRatio::Poster);
        assert_eq!(aspect_for(ProgramKind::Series), AspectRatio::Poster);
        assert_eq!(aspect_for(ProgramKind::Episode), AspectRatio::Wide);
        assert_eq!(aspect_for(ProgramKind::Library), AspectRatio::Wide);
        assert_eq!(aspect_for(ProgramKind::Album), AspectRatio::Square);
        assert_eq!(aspect_for(ProgramKind::Artist), AspectRatio::Square);
    }

    #[test]
    fn test_unknown_kind_is_dropped() {
        let images = images();
        let ctx = ctx(false, &images);
        assert!(classify(&item(ItemKind::Unknown), ChannelId::new(1), &ctx).is_none());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let images = images();
        let ctx = ctx(true, &images);
        let mut movie = item(ItemKind::Movie);
        movie.image_tags = HashMap::from([(ImageType::Primary, "tag".to_string())]);

        let first = classify(&movie, ChannelId::new(3), &ctx).unwrap();
        let second = classify(&movie, ChannelId::new(3), &ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_poster_prefers_own_primary_image() {
        let images = images();
        let ctx = ctx(true, &images);
        let mut episode = item(ItemKind::Episode);
        episode.image_tags = HashMap::from([(ImageType::Primary, "tag".to_string())]);
        episode.parent_thumb_item_id = Some("series-1".into());

        let record = classify(&episode, ChannelId::new(1), &ctx).unwrap();
        assert!(record.poster_uri.contains("/items/item-1/images/Primary"));
    }

    #[test]
    fn test_poster_falls_back_to_parent_thumb() {
        let images = images();
        let ctx = ctx(true, &images);
        let mut episode = item(ItemKind::Episode);
        episode.parent_thumb_item_id = Some("series-1".into());

        let record = classify(&episode, ChannelId::new(1), &ctx).unwrap();
        assert!(record.poster_uri.contains("/items/series-1/images/Thumb"));
        assert!(record.poster_uri.contains("maxWidth=1280"));
        assert!(record.poster_uri.contains("maxHeight=720"));
    }

    #[test]
    fn test_poster_falls_back_to_placeholder() {
        let images = images();

        // parent thumb available but not preferred
        let mut episode = item(ItemKind::Episode);
        episode.parent_thumb_item_id = Some("series-1".into());
        let no_prefer = ctx(false, &images);
        let record = classify(&episode, ChannelId::new(1), &no_prefer).unwrap();
        assert_eq!(record.poster_uri, "resource://poster/placeholder");

        // preferred but no parent thumb
        let prefer = ctx(true, &images);
        let record = classify(&item(ItemKind::Episode), ChannelId::new(1), &prefer).unwrap();
        assert_eq!(record.poster_uri, "resource://poster/placeholder");
    }

    #[test]
    fn test_episode_titles_and_labels() {
        let images = images();
        let ctx = ctx(false, &images);
        let mut episode = item(ItemKind::Episode);
        episode.series_name = Some("Some Show".into());
        episode.parent_index_number = Some(2);
        episode.index_number = Some(5);
        episode.index_number_end = Some(7);

        let record = classify(&episode, ChannelId::new(1), &ctx).unwrap();
        assert_eq!(record.title, "Some Show");
        assert_eq!(record.subtitle.as_deref(), Some("Something"));
        assert_eq!(record.season_display, "2");
        assert_eq!(record.episode_display, "5-7");
    }

    #[test]
    fn test_library_record_is_wide() {
        let images = images();
        let ctx = ctx(false, &images);
        let view: LibraryView =
            serde_json::from_str(r#"{ "Id": "lib-1", "Name": "Movies", "CollectionType": "movies" }"#)
                .unwrap();

        let record = library_record(&view, ChannelId::new(9), &ctx);
        assert_eq!(record.kind, ProgramKind::Library);
        assert_eq!(record.poster_aspect, AspectRatio::Wide);
        assert_eq!(record.launch_item_id, "lib-1");
        assert!(record.poster_uri.contains("/items/lib-1/images/Primary"));
    }
}
