//! CMS endpoint description and asset URL construction.

use serde::Deserialize;
use thiserror::Error;

/// Why an endpoint description could not be built.
#[derive(Debug, Error)]
pub enum ApiConfigError {
    #[error("malformed `cms-cy-api` block")]
    Json(#[from] serde_json::Error),

    #[error("API URL or project not defined")]
    Missing,
}

/// Immutable CMS endpoint: base URL plus the project every query is scoped to.
///
/// Built once per page (from its `cms-cy-api` block or `[api]`) and shared
/// read-only by every widget task of that page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsApi {
    url: String,
    project: String,
}

/// Shape of the inbound `<script id="cms-cy-api" type="application/json">` block.
#[derive(Deserialize)]
struct ApiBlock {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    project: Option<String>,
}

impl CmsApi {
    pub fn new(url: &str, project: &str) -> Result<Self, ApiConfigError> {
        let url = url.trim().trim_end_matches('/');
        let project = project.trim();
        if url.is_empty() || project.is_empty() {
            return Err(ApiConfigError::Missing);
        }
        Ok(Self {
            url: url.to_owned(),
            project: project.to_owned(),
        })
    }

    /// Parse the JSON text of a `cms-cy-api` block: `{"url": ..., "project": ...}`.
    pub fn from_json(text: &str) -> Result<Self, ApiConfigError> {
        let block: ApiBlock = serde_json::from_str(text)?;
        match (block.url, block.project) {
            (Some(url), Some(project)) => Self::new(&url, &project),
            _ => Err(ApiConfigError::Missing),
        }
    }

    #[cfg(test)]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// `<endpoint>/graphql?`
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql?", self.url)
    }

    /// Resized asset: `<endpoint>/assets/<id>?fit=..&width=..&height=..&quality=..`
    pub fn asset_url(&self, id: &str, fit: &str, width: u32, height: u32, quality: u8) -> String {
        format!(
            "{}/assets/{}?fit={}&width={}&height={}&quality={}",
            self.url,
            id,
            urlencoding::encode(fit),
            width,
            height,
            quality
        )
    }

    /// Full-size asset, used as lightbox target.
    pub fn original_asset_url(&self, id: &str) -> String {
        format!("{}/assets/{}", self.url, id)
    }

    /// Download link: `<endpoint>/assets/<id>?download`
    pub fn download_url(&self, id: &str) -> String {
        format!("{}/assets/{}?download", self.url, id)
    }
}
