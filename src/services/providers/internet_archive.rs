/// Internet Archive provider
///
/// API Flow:
/// 1. Search: /advancedsearch.php → item identifiers and descriptive metadata
/// 2. Files: /metadata/{identifier} → file list, filtered to video renditions
/// 3. Playback: /download/{identifier}/{file name}
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{archive::ArchiveMetadata, ArchiveFile, RawItem},
    services::providers::ArchiveProvider,
};
use reqwest::{Client as HttpClient, Url};
use std::time::Duration;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const FILES_CACHE_TTL: u64 = 86400; // 1 day
const SEARCH_FIELDS: &str = "identifier,title,description,mediatype,collection,subject";
const MEDIATYPE_FILTER: &str = "mediatype:movies";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct InternetArchiveProvider {
    http_client: HttpClient,
    search_url: String,
    metadata_url: String,
    download_url: String,
    cache: Cache,
}

impl InternetArchiveProvider {
    pub fn new(cache: Cache, search_url: String, metadata_url: String, download_url: String) -> Self {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            search_url,
            metadata_url,
            download_url,
            cache,
        }
    }

    async fn fetch_search(&self, query: &str, rows: usize) -> AppResult<Vec<RawItem>> {
        let full_query = format!("{} AND {}", query, MEDIATYPE_FILTER);
        let rows = rows.to_string();

        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("q", full_query.as_str()),
                ("fl", SEARCH_FIELDS),
                ("rows", rows.as_str()),
                ("output", "json"),
                ("sort", "downloads desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Archive search returned status {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let items = Self::parse_search_docs(&body)?;

        tracing::info!(
            query = %query,
            results = items.len(),
            provider = "internet_archive",
            "Archive search completed"
        );

        Ok(items)
    }

    /// Extracts items from `response.docs`, skipping docs that don't parse
    ///
    /// A body without `response.docs` (the archive's `{"error": ...}` reply when busy) is an
    /// error, so it never lands in the cache as an empty result.
    fn parse_search_docs(body: &serde_json::Value) -> AppResult<Vec<RawItem>> {
        let docs = body
            .pointer("/response/docs")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| {
                AppError::ExternalApi(format!(
                    "Archive search response has no response.docs: {}",
                    body
                ))
            })?;

        Ok(docs
            .iter()
            .filter_map(|doc| match serde_json::from_value::<RawItem>(doc.clone()) {
                Ok(item) if !item.identifier.is_empty() => Some(item),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed archive doc");
                    None
                }
            })
            .collect())
    }

    async fn fetch_video_urls(&self, identifier: &str) -> AppResult<Vec<String>> {
        let url = Self::archive_url(&self.metadata_url, &[identifier])?;

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Archive metadata returned status {}: {}",
                status, body
            )));
        }

        let metadata: ArchiveMetadata = response.json().await?;
        let urls = self.video_urls_from_files(identifier, metadata.files)?;

        tracing::debug!(
            identifier = %identifier,
            videos = urls.len(),
            provider = "internet_archive",
            "Video files resolved"
        );

        Ok(urls)
    }

    /// Keeps video renditions, smallest first, as download URLs
    fn video_urls_from_files(
        &self,
        identifier: &str,
        files: Vec<ArchiveFile>,
    ) -> AppResult<Vec<String>> {
        let mut videos: Vec<ArchiveFile> = files.into_iter().filter(ArchiveFile::is_video).collect();
        // Stable, so equal sizes keep metadata order
        videos.sort_by_key(ArchiveFile::size_bytes);

        videos
            .iter()
            .map(|file| self.file_download_url(identifier, &file.name))
            .collect()
    }

    /// Builds `<download>/<identifier>/<percent-encoded file name>`
    fn file_download_url(&self, identifier: &str, file_name: &str) -> AppResult<String> {
        Self::archive_url(&self.download_url, &[identifier, file_name]).map(String::from)
    }

    /// Appends each segment to `base` as a single percent-encoded path segment
    fn archive_url(base: &str, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| AppError::Internal(format!("Invalid archive URL {}: {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Internal(format!("Archive URL cannot take a path: {}", base))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

#[async_trait::async_trait]
impl ArchiveProvider for InternetArchiveProvider {
    async fn search(&self, query: &str, rows: usize) -> AppResult<Vec<RawItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::ArchiveSearch {
                query: query.to_string(),
                rows,
            },
            SEARCH_CACHE_TTL,
            async move { self.fetch_search(query, rows).await }
        )
    }

    async fn video_urls(&self, identifier: &str) -> AppResult<Vec<String>> {
        cached!(
            self.cache,
            CacheKey::VideoFiles(identifier.to_string()),
            FILES_CACHE_TTL,
            async move { self.fetch_video_urls(identifier).await }
        )
    }

    fn name(&self) -> &'static str {
        "internet_archive"
    }
}
