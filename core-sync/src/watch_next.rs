//! # Watch Next Evaluator
//!
//! Pure computation of watch-state and engagement for items destined for
//! the continue-watching queue. Deterministic: the evaluation wall-clock is
//! passed in by the caller, so identical inputs always yield identical
//! records regardless of call order.

use bridge_traits::{WatchNextRecord, WatchState};
use core_catalog::CatalogItem;

use crate::classifier::{entry_fields, ClassifyContext};

/// Catalog time unit: 10,000 ticks per millisecond.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

/// Evaluate a catalog item into a watch-next record.
///
/// State determination, first match wins:
/// 1. recorded playback position > 0 ticks → `Continue`, with the position
///    converted to milliseconds and the last-played timestamp as engagement
///    when present;
/// 2. season-relative episode index == 1 → `New`;
/// 3. otherwise → `Next`.
///
/// The engagement default, used whenever no more specific timestamp
/// applies, is the item's creation timestamp, falling back to `now_ms`.
///
/// Returns `None` for item kinds the surface cannot render; such items are
/// dropped individually, like classifier misses.
pub fn evaluate(
    item: &CatalogItem,
    ctx: &ClassifyContext<'_>,
    now_ms: i64,
) -> Option<WatchNextRecord> {
    let fields = entry_fields(item, ctx)?;

    let default_engagement_ms = item
        .date_created
        .map(|d| d.timestamp_millis())
        .unwrap_or(now_ms);

    let position_ticks = item.playback_position_ticks();
    let (state, position_ms, engagement_ms) = if position_ticks > 0 {
        let engagement_ms = item
            .user_data
            .as_ref()
            .and_then(|u| u.last_played_date)
            .map(|d| d.timestamp_millis())
            .unwrap_or(default_engagement_ms);
        (
            WatchState::Continue,
            Some(position_ticks / TICKS_PER_MILLISECOND),
            engagement_ms,
        )
    } else if item.index_number == Some(1) {
        (WatchState::New, None, default_engagement_ms)
    } else {
        (WatchState::Next, None, default_engagement_ms)
    };

    Some(WatchNextRecord {
        kind: fields.kind,
        title: fields.title,
        subtitle: fields.subtitle,
        season_display: fields.season_display,
        episode_display: fields.episode_display,
        poster_uri: fields.poster_uri,
        poster_aspect: fields.poster_aspect,
        launch_item_id: item.id.clone(),
        state,
        position_ms,
        engagement_ms,
        duration_ms: item.run_time_ticks.map(|t| t / TICKS_PER_MILLISECOND),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_catalog::ImageUrlBuilder;
    use url::Url;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new(Url::parse("http://media.local/").unwrap())
    }

    fn episode(json: &str) -> CatalogItem {
        serde_json::from_str(json).unwrap()
    }

    fn eval(item: &CatalogItem) -> WatchNextRecord {
        let images = images();
        let ctx = ClassifyContext {
            prefer_parent_thumb: false,
            placeholder_image_uri: "resource://poster/placeholder",
            images: &images,
        };
        evaluate(item, &ctx, NOW_MS).unwrap()
    }

    #[test]
    fn test_progress_dominates_season_index() {
        // index 1 would mean New, but a resume position wins
        let item = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode", "IndexNumber": 1,
                 "UserData": { "PlaybackPositionTicks": 600000 } }"#,
        );
        let record = eval(&item);
        assert_eq!(record.state, WatchState::Continue);
        assert_eq!(record.position_ms, Some(60));
    }

    #[test]
    fn test_first_episode_of_season_is_new() {
        let item = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode", "IndexNumber": 1,
                 "UserData": { "PlaybackPositionTicks": 0 } }"#,
        );
        assert_eq!(eval(&item).state, WatchState::New);
    }

    #[test]
    fn test_default_state_is_next() {
        let item = episode(r#"{ "Id": "e", "Name": "Ep", "Type": "Episode", "IndexNumber": 4 }"#);
        let record = eval(&item);
        assert_eq!(record.state, WatchState::Next);
        assert_eq!(record.position_ms, None);
    }

    #[test]
    fn test_duration_tick_conversion() {
        let item = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode", "RunTimeTicks": 12345000 }"#,
        );
        assert_eq!(eval(&item).duration_ms, Some(1_234));
    }

    #[test]
    fn test_missing_duration_is_omitted() {
        let item = episode(r#"{ "Id": "e", "Name": "Ep", "Type": "Episode" }"#);
        assert_eq!(eval(&item).duration_ms, None);
    }

    #[test]
    fn test_engagement_prefers_last_played() {
        let item = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode",
                 "DateCreated": "2024-01-01T00:00:00Z",
                 "UserData": { "PlaybackPositionTicks": 600000,
                               "LastPlayedDate": "2024-03-01T12:00:00Z" } }"#,
        );
        let expected = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(eval(&item).engagement_ms, expected);
    }

    #[test]
    fn test_engagement_defaults_to_creation_then_now() {
        let created = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode",
                 "DateCreated": "2024-01-01T00:00:00Z" }"#,
        );
        let expected = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(eval(&created).engagement_ms, expected);

        let bare = episode(r#"{ "Id": "e", "Name": "Ep", "Type": "Episode" }"#);
        assert_eq!(eval(&bare).engagement_ms, NOW_MS);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let item = episode(
            r#"{ "Id": "e", "Name": "Ep", "Type": "Episode", "IndexNumber": 2,
                 "UserData": { "PlaybackPositionTicks": 1230000 } }"#,
        );
        assert_eq!(eval(&item), eval(&item));
    }

    #[test]
    fn test_unknown_kind_is_dropped() {
        let item = episode(r#"{ "Id": "x", "Name": "weird", "Type": "HologramDeck" }"#);
        let images = images();
        let ctx = ClassifyContext {
            prefer_parent_thumb: false,
            placeholder_image_uri: "resource://poster/placeholder",
            images: &images,
        };
        assert!(evaluate(&item, &ctx, NOW_MS).is_none());
    }
}
