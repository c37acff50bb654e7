//! `[api]` section configuration.
//!
//! Fallback CMS endpoint for pages that carry no `cms-cy-api` block.

use crate::cms::{ApiConfigError, CmsApi};
use serde::{Deserialize, Serialize};

/// `[api]` section in cmscy.toml.
///
/// # Example
/// ```toml
/// [api]
/// url = "https://projectapi.cms.cy"
/// project = "project-name"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// CMS endpoint base URL (without `/graphql`).
    #[serde(default)]
    pub url: Option<String>,

    /// Project (tenant) code every query is scoped to.
    #[serde(default)]
    pub project: Option<String>,
}

impl ApiConfig {
    /// Whether any field has been set.
    pub const fn is_set(&self) -> bool {
        self.url.is_some() || self.project.is_some()
    }

    /// Build the endpoint object, failing when either field is missing or empty.
    pub fn to_cms_api(&self) -> Result<CmsApi, ApiConfigError> {
        match (&self.url, &self.project) {
            (Some(url), Some(project)) => CmsApi::new(url, project),
            _ => Err(ApiConfigError::Missing),
        }
    }
}
