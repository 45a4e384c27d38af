//! Catalog gateway trait and image URL construction

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::types::{
    CatalogItem, ImageFormat, ImageType, ItemField, LibraryView, MediaType, SortOrder,
};

/// Pure image URL construction.
///
/// Split out of [`CatalogGateway`] so the classifier can build poster URLs
/// without touching anything async; implementations must do string
/// formatting only, no I/O.
pub trait ImageSource: Send + Sync {
    /// URL serving the given image slot of an item, scaled to fit the given
    /// bounding box.
    fn image_url(
        &self,
        item_id: &str,
        image_type: ImageType,
        format: ImageFormat,
        max_width: u32,
        max_height: u32,
    ) -> Url;
}

/// Typed, read-only queries against the remote media catalog.
///
/// Every call may fail with a transport error; the sync core treats any
/// such failure as a whole-run failure and leaves retry timing to its
/// caller.
#[async_trait]
pub trait CatalogGateway: ImageSource + Send + Sync {
    /// List the user's library views.
    async fn list_libraries(&self, include_hidden: bool) -> Result<Vec<LibraryView>>;

    /// Most recently added items of one library.
    async fn latest_items(
        &self,
        library_id: &str,
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
        group_items: bool,
    ) -> Result<Vec<CatalogItem>>;

    /// Next-up episodes across all shows the user follows.
    async fn next_up(
        &self,
        user_id: &str,
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
    ) -> Result<Vec<CatalogItem>>;

    /// Items with a saved resume position, sorted server-side.
    #[allow(clippy::too_many_arguments)]
    async fn resumable(
        &self,
        user_id: &str,
        media_types: &[MediaType],
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
        sort: SortOrder,
    ) -> Result<Vec<CatalogItem>>;
}

/// Builds image URLs for a catalog server.
///
/// Shared by [`HttpCatalogClient`](crate::client::HttpCatalogClient) and
/// usable standalone in tests.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: Url,
}

impl ImageUrlBuilder {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl ImageSource for ImageUrlBuilder {
    fn image_url(
        &self,
        item_id: &str,
        image_type: ImageType,
        format: ImageFormat,
        max_width: u32,
        max_height: u32,
    ) -> Url {
        // base_url is validated absolute at construction, and the joined
        // path contains no characters Url rejects.
        let mut url = self
            .base_url
            .join(&format!("items/{}/images/{}", item_id, image_type.as_str()))
            .expect("image path is always joinable onto an absolute base URL");
        url.query_pairs_mut()
            .append_pair("format", format.as_str())
            .append_pair("maxWidth", &max_width.to_string())
            .append_pair("maxHeight", &max_height.to_string());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_shape() {
        let builder = ImageUrlBuilder::new(Url::parse("http://media.local:8096/").unwrap());
        let url = builder.image_url("item-7", ImageType::Thumb, ImageFormat::Webp, 1280, 720);

        assert_eq!(url.path(), "/items/item-7/images/Thumb");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("format".into(), "Webp".into())));
        assert!(query.contains(&("maxWidth".into(), "1280".into())));
        assert!(query.contains(&("maxHeight".into(), "720".into())));
    }

    #[test]
    fn test_image_url_base_path_preserved() {
        let builder = ImageUrlBuilder::new(Url::parse("http://media.local/media/").unwrap());
        let url = builder.image_url("a", ImageType::Primary, ImageFormat::Png, 100, 150);
        assert_eq!(url.path(), "/media/items/a/images/Primary");
    }
}
