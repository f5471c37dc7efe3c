/// Modrinth catalog client: project search, version listing, file download
use anyhow::{Context, Result};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";

pub const USER_AGENT: &str = concat!("anvil-core/", env!("CARGO_PKG_VERSION"));

/// Download progress callback, invoked with a percentage in `0..=100`.
/// Values are monotonically non-decreasing; the transfer runs to completion
/// or fails, there is no cancellation.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync + 'static>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub hits: Vec<ProjectSummary>,
    pub offset: u32,
    pub limit: u32,
    pub total_hits: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_type: String,
    pub slug: String,
    pub author: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    pub downloads: u64,
    pub follows: u64,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectVersion {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub version_number: String,
    pub version_type: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
    #[serde(default)]
    pub dependencies: Vec<VersionDependency>,
}

impl ProjectVersion {
    /// The file to download for this version: the one flagged primary, or
    /// the first one when nothing is flagged.
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionFile {
    #[serde(default)]
    pub hashes: HashMap<String, String>,
    pub url: String,
    pub filename: String,
    pub primary: bool,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionDependency {
    pub version_id: Option<String>,
    pub project_id: Option<String>,
    pub dependency_type: String,
}

/// Search parameters; `Default` gives an unfiltered relevance-sorted mod
/// search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub project_type: String,
    pub category: Option<String>,
    pub game_version: Option<String>,
    pub loader: Option<String>,
    pub limit: u32,
    pub offset: u32,
    /// Sort index: "relevance", "downloads", "follows", "newest", "updated"
    pub index: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            project_type: "mod".to_string(),
            category: None,
            game_version: None,
            loader: None,
            limit: 20,
            offset: 0,
            index: "relevance".to_string(),
        }
    }
}

pub struct ModrinthClient {
    http: reqwest::Client,
    base_url: String,
}

impl ModrinthClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MODRINTH_API_BASE)
    }

    /// Client against a non-default endpoint; used by tests against a mock
    /// server.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Faceted project search.
    pub async fn search_projects(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let mut facets: Vec<Vec<String>> = Vec::new();
        if !query.project_type.is_empty() {
            facets.push(vec![format!("project_type:{}", query.project_type)]);
        }
        if let Some(category) = &query.category {
            facets.push(vec![format!("categories:{}", category)]);
        }
        if let Some(game_version) = &query.game_version {
            facets.push(vec![format!("versions:{}", game_version)]);
        }
        if let Some(loader) = &query.loader {
            facets.push(vec![format!("categories:{}", loader)]);
        }
        let facets_json = serde_json::to_string(&facets).context("Failed to encode facets")?;

        let url = reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[
                ("query", query.query.as_str()),
                ("limit", &query.limit.to_string()),
                ("offset", &query.offset.to_string()),
                ("index", query.index.as_str()),
                ("facets", &facets_json),
            ],
        )
        .context("Failed to build search URL")?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Modrinth search request failed")?
            .error_for_status()
            .context("Modrinth search returned an error status")?;

        response
            .json()
            .await
            .context("Failed to decode search response")
    }

    /// Popular projects: an empty search sorted by downloads.
    pub async fn popular_projects(&self, limit: u32, offset: u32) -> Result<SearchResponse> {
        self.search_projects(&SearchQuery {
            limit,
            offset,
            index: "downloads".to_string(),
            ..Default::default()
        })
        .await
    }

    /// Projects of one category, sorted by downloads.
    pub async fn projects_by_category(
        &self,
        category: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SearchResponse> {
        self.search_projects(&SearchQuery {
            category: Some(category.to_string()),
            limit,
            offset,
            index: "downloads".to_string(),
            ..Default::default()
        })
        .await
    }

    /// List a project's versions, optionally filtered by game version and
    /// loader.
    pub async fn project_versions(
        &self,
        project_id: &str,
        game_version: Option<&str>,
        loader: Option<&str>,
    ) -> Result<Vec<ProjectVersion>> {
        let mut url = format!("{}/project/{}/version", self.base_url, project_id);

        let mut params = Vec::new();
        if let Some(game_version) = game_version {
            params.push(format!("game_versions=[\"{}\"]", game_version));
        }
        if let Some(loader) = loader {
            params.push(format!("loaders=[\"{}\"]", loader));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Version listing failed for {}", project_id))?
            .error_for_status()
            .context("Modrinth version listing returned an error status")?;

        response
            .json()
            .await
            .context("Failed to decode version listing")
    }

    /// Stream `file` into `dest_dir`, verifying the advertised sha1 and
    /// reporting percentage progress ordered by bytes received.
    pub async fn download_file(
        &self,
        file: &VersionFile,
        dest_dir: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<PathBuf> {
        log::info!("Downloading {} -> {:?}", file.url, dest_dir);

        let response = self
            .http
            .get(&file.url)
            .send()
            .await
            .with_context(|| format!("Download request failed for {}", file.filename))?
            .error_for_status()
            .context("Download returned an error status")?;

        let total = response.content_length().or(Some(file.size)).filter(|t| *t > 0);

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(&file.filename);
        let mut out = tokio::fs::File::create(&dest)
            .await
            .with_context(|| format!("Failed to create {:?}", dest))?;

        let mut hasher = Sha1::new();
        let mut received: u64 = 0;
        let mut last_percent: u8 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Download stream interrupted")?;
            hasher.update(&chunk);
            out.write_all(&chunk).await?;
            received += chunk.len() as u64;

            if let (Some(cb), Some(total)) = (progress.as_ref(), total) {
                let percent = ((received * 100) / total).min(100) as u8;
                if percent > last_percent {
                    last_percent = percent;
                    cb(percent);
                }
            }
        }
        out.flush().await?;

        if let Some(expected) = file.hashes.get("sha1") {
            let computed = format!("{:x}", hasher.finalize());
            if !computed.eq_ignore_ascii_case(expected) {
                tokio::fs::remove_file(&dest).await.ok();
                anyhow::bail!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    file.filename,
                    expected,
                    computed
                );
            }
        }

        log::debug!("Downloaded {} ({} bytes)", file.filename, received);
        Ok(dest)
    }
}
