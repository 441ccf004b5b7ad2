//! Book metadata lookup
//!
//! Searches the Google Books volumes API when cataloging books, and converts
//! a selected candidate into an `add_book` payload.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use boook_core::{NewBook, Ownership, ReadingStatus};

const GOOGLE_BOOKS_API: &str = "https://www.googleapis.com/books/v1/volumes";

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Placeholder for candidates without a usable title
const FALLBACK_TITLE: &str = "Unknown title";
/// Placeholder for candidates without authors
const FALLBACK_AUTHOR: &str = "Unknown author";

/// Top-level volumes search response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
    #[serde(default)]
    pub total_items: u32,
}

/// One candidate record from the lookup service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// Search for candidate volumes (async)
///
/// Returns an empty list on failure (graceful degradation); the store is
/// never handed partial data.
pub async fn search(query: &str, max_results: u32) -> Vec<Volume> {
    match search_inner(query, max_results).await {
        Ok(volumes) => volumes,
        Err(e) => {
            warn!(error = %e, "book search failed");
            Vec::new()
        }
    }
}

async fn search_inner(query: &str, max_results: u32) -> Result<Vec<Volume>> {
    let response = http_client()?
        .get(GOOGLE_BOOKS_API)
        .query(&[
            ("q", query),
            ("maxResults", &max_results.to_string()),
            ("printType", "books"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(Vec::new());
    }

    let data: VolumesResponse = response.json().await?;
    debug!(total = data.total_items, returned = data.items.len(), "book search");
    Ok(data.items)
}

/// Fetch details of a single volume by its lookup-service id
///
/// Returns `None` on failure or a non-success response.
pub async fn volume(id: &str) -> Option<Volume> {
    match volume_inner(id).await {
        Ok(volume) => volume,
        Err(e) => {
            warn!(error = %e, "volume fetch failed");
            None
        }
    }
}

async fn volume_inner(id: &str) -> Result<Option<Volume>> {
    let response = http_client()?
        .get(format!("{}/{}", GOOGLE_BOOKS_API, id))
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    Ok(Some(response.json().await?))
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; boook/1.0)")
        .build()?)
}

impl Volume {
    /// Convert a selected candidate into an `add_book` payload
    ///
    /// Absent titles and authors get placeholders; insecure cover URLs are
    /// normalized to their secure equivalent; an ISBN-13 is extracted when
    /// the candidate carries one.
    pub fn into_new_book(
        self,
        ownership: Ownership,
        reading_status: Option<ReadingStatus>,
    ) -> NewBook {
        let info = self.volume_info;

        NewBook {
            title: info
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            authors: info
                .authors
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| vec![FALLBACK_AUTHOR.to_string()]),
            description: info.description,
            thumbnail: info
                .image_links
                .and_then(|links| links.thumbnail.or(links.small_thumbnail))
                .map(secure_url),
            published_date: info.published_date,
            page_count: info.page_count,
            categories: info.categories,
            isbn: info.industry_identifiers.and_then(|ids| {
                ids.into_iter()
                    .find(|i| i.kind == "ISBN_13")
                    .map(|i| i.identifier)
            }),
            ownership,
            reading_status,
            is_favorite: false,
            current_page: Some(0),
            rating: None,
            notes: None,
            reading_order: None,
        }
    }
}

/// Normalize insecure image URLs to their secure equivalent
fn secure_url(url: String) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => url,
    }
}
