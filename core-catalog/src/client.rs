//! HTTP catalog client
//!
//! Thin `reqwest`-backed implementation of [`CatalogGateway`]. The client
//! performs no retry or backoff of its own: a failed call is a failed sync
//! run, and the outer scheduler decides when to try again.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{CatalogError, Result};
use crate::gateway::{CatalogGateway, ImageSource, ImageUrlBuilder};
use crate::types::{
    CatalogItem, ImageFormat, ImageType, ItemField, ItemsResponse, LibraryView, MediaType,
    SortOrder, ViewsResponse,
};

/// Header carrying the catalog API token.
const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP catalog client
///
/// # Example
///
/// ```ignore
/// use core_catalog::HttpCatalogClient;
///
/// let client = HttpCatalogClient::new("http://media.local:8096/", api_key)?;
/// let libraries = client.list_libraries(false).await?;
/// ```
pub struct HttpCatalogClient {
    http: reqwest::Client,
    images: ImageUrlBuilder,
    api_key: String,
}

impl HttpCatalogClient {
    /// Create a client for the given server base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] when `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        // A trailing slash makes Url::join treat the last segment as a
        // directory instead of replacing it.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            images: ImageUrlBuilder::new(base_url),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.images
            .base_url()
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        debug!("catalog request succeeded");
        Ok(response.json::<T>().await?)
    }

    fn join_fields(fields: &[ItemField]) -> String {
        fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl ImageSource for HttpCatalogClient {
    fn image_url(
        &self,
        item_id: &str,
        image_type: ImageType,
        format: ImageFormat,
        max_width: u32,
        max_height: u32,
    ) -> Url {
        self.images
            .image_url(item_id, image_type, format, max_width, max_height)
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogClient {
    async fn list_libraries(&self, include_hidden: bool) -> Result<Vec<LibraryView>> {
        let mut url = self.endpoint("library/views")?;
        url.query_pairs_mut()
            .append_pair("includeHidden", if include_hidden { "true" } else { "false" });

        let views: ViewsResponse = self.get_json(url).await?;
        Ok(views.items)
    }

    async fn latest_items(
        &self,
        library_id: &str,
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
        group_items: bool,
    ) -> Result<Vec<CatalogItem>> {
        let mut url = self.endpoint("items/latest")?;
        url.query_pairs_mut()
            .append_pair("parentId", library_id)
            .append_pair("imageTypeLimit", &image_limit.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", &Self::join_fields(fields))
            .append_pair("groupItems", if group_items { "true" } else { "false" });

        let items: ItemsResponse = self.get_json(url).await?;
        Ok(items.items)
    }

    async fn next_up(
        &self,
        user_id: &str,
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
    ) -> Result<Vec<CatalogItem>> {
        let mut url = self.endpoint("shows/next-up")?;
        url.query_pairs_mut()
            .append_pair("userId", user_id)
            .append_pair("imageTypeLimit", &image_limit.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", &Self::join_fields(fields));

        let items: ItemsResponse = self.get_json(url).await?;
        Ok(items.items)
    }

    async fn resumable(
        &self,
        user_id: &str,
        media_types: &[MediaType],
        image_limit: u32,
        limit: u32,
        fields: &[ItemField],
        sort: SortOrder,
    ) -> Result<Vec<CatalogItem>> {
        let media_types = media_types
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.endpoint("items/resume")?;
        url.query_pairs_mut()
            .append_pair("userId", user_id)
            .append_pair("mediaTypes", &media_types)
            .append_pair("imageTypeLimit", &image_limit.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", &Self::join_fields(fields))
            .append_pair("sortBy", "DatePlayed")
            .append_pair("sortOrder", sort.as_str());

        let items: ItemsResponse = self.get_json(url).await?;
        Ok(items.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = HttpCatalogClient::new("http://media.local:8096", "key").unwrap();
        let url = client.endpoint("library/views").unwrap();
        assert_eq!(url.as_str(), "http://media.local:8096/library/views");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpCatalogClient::new("not a url", "key"),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_join_fields() {
        assert_eq!(
            HttpCatalogClient::join_fields(&[ItemField::DateCreated, ItemField::Overview]),
            "DateCreated,Overview"
        );
        assert_eq!(HttpCatalogClient::join_fields(&[]), "");
    }
}
