//! Marketplace catalog: response model, page URLs and the fetch/download seam.
//!
//! The catalog endpoint returns one page of visuals per request as
//! `{"apps": {"dataList": [...]}}`. Pages are numbered from 1; an empty
//! `dataList` marks the end of the listing.
//!
//! Entries are decoded one by one: an entry that does not fit the model is
//! counted as malformed and dropped without failing the rest of the page.

mod client;

pub use client::CurlCatalog;

use crate::retry::FetchError;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Default AppSource tile-data endpoint listing Power BI visuals.
pub const DEFAULT_CATALOG_URL: &str = "https://appsource.microsoft.com/view/tiledata?ReviewsMyCommentsFilter=true&country=US&entityType=App&product=power-bi-visuals";

/// The live endpoint returns empty pages without this.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US";

/// Fetch-a-page and download-to-path, the only network operations the
/// pagination loop needs. Both must be safe to repeat.
pub trait Catalog {
    /// Fetch and decode page `page` (1-based).
    fn fetch_page(&self, page: u32) -> Result<CatalogPage, FetchError>;

    /// Download `url` to `dest`, replacing any existing file. Returns bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// One page of catalog results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default, deserialize_with = "null_as_default")]
    apps: AppList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawAppList")]
struct AppList {
    data_list: Vec<CatalogEntry>,
    malformed: usize,
}

#[derive(Deserialize)]
struct RawAppList {
    #[serde(rename = "dataList", default, deserialize_with = "null_as_default")]
    data_list: Vec<serde_json::Value>,
}

impl From<RawAppList> for AppList {
    fn from(raw: RawAppList) -> Self {
        let mut data_list = Vec::with_capacity(raw.data_list.len());
        let mut malformed = 0;
        for (index, value) in raw.data_list.into_iter().enumerate() {
            match serde_json::from_value::<CatalogEntry>(value) {
                Ok(entry) => data_list.push(entry),
                Err(e) => {
                    tracing::warn!(index, error = %e, "dropping malformed catalog entry");
                    malformed += 1;
                }
            }
        }
        Self {
            data_list,
            malformed,
        }
    }
}

impl CatalogPage {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            apps: AppList {
                data_list: entries,
                malformed: 0,
            },
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.apps.data_list
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.apps.data_list
    }

    /// Listed entries that could not be decoded.
    pub fn malformed(&self) -> usize {
        self.apps.malformed
    }

    /// True only when the catalog listed nothing at all. A page whose
    /// entries were all malformed is not empty.
    pub fn is_empty(&self) -> bool {
        self.apps.data_list.is_empty() && self.apps.malformed == 0
    }
}

/// A single marketplace visual as listed by the catalog.
///
/// Missing or `null` link, publisher and tags decode as empty; an entry
/// without a link is skipped by the pagination loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(rename = "downloadLink", default, deserialize_with = "null_as_default")]
    pub download_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Category marker attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
}

impl CatalogEntry {
    pub fn has_tag(&self, id: &str) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }
}

/// Builds the URL for page `page` by setting the `page` query parameter on
/// `endpoint`, replacing any `page` already present.
pub fn page_url(endpoint: &str, page: u32) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(endpoint)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("page", &page.to_string());
    }
    Ok(url)
}
