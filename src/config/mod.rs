//! Configuration management for `cmscy.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[api]`     | Fallback CMS endpoint and project code           |
//! | `[render]`  | Page rewriting (styles, hooks, minify, jobs)     |
//! | `[serve]`   | Rendering server (interface, port, root)         |
//!
//! # Example
//!
//! ```toml
//! [api]
//! url = "https://projectapi.cms.cy"
//! project = "project-name"
//!
//! [render]
//! minify = true
//!
//! [serve]
//! port = 5277
//! ```

mod api;
pub mod defaults;
mod error;
mod render;
mod serve;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use render::RenderConfig;
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use crate::cms::CmsApi;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing cmscy.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Path of the loaded config file (empty when running on defaults)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Fallback CMS endpoint
    #[serde(default)]
    pub api: ApiConfig,

    /// Page rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Rendering server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Endpoint used for pages without a `cms-cy-api` block.
    ///
    /// `None` when `[api]` was never configured; a half-configured section is
    /// rejected earlier by [`Config::validate`].
    pub fn fallback_api(&self) -> Option<CmsApi> {
        self.api.to_cms_api().ok()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        if let Some(url) = &cli.api_url {
            self.api.url = Some(url.clone());
        }
        if let Some(project) = &cli.project {
            self.api.project = Some(project.clone());
        }

        if let Some(args) = cli.render_args() {
            Self::update_option(&mut self.render.minify, args.minify.as_ref());
            Self::update_option(&mut self.render.base_styles, args.base_styles.as_ref());
            Self::update_option(&mut self.render.hooks, args.hooks.as_ref());
        }

        match &cli.command {
            Commands::Render { jobs, base_url, .. } => {
                Self::update_option(&mut self.render.jobs, jobs.as_ref());
                Self::update_option(&mut self.render.base_url, base_url.as_ref());
            }
            Commands::Serve {
                root,
                interface,
                port,
                ..
            } => {
                Self::update_option(&mut self.serve.root, root.as_ref());
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Widget { .. } => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if self.api.is_set() {
            let Some(url) = self.api.url.as_deref() else {
                bail!(ConfigError::Validation(
                    "[api.project] is set but [api.url] is missing".into()
                ));
            };
            if !url.starts_with("http") {
                bail!(ConfigError::Validation(
                    "[api.url] must start with http:// or https://".into()
                ));
            }
            if self.api.project.as_deref().is_none_or(str::is_empty) {
                bail!(ConfigError::Validation(
                    "[api.url] is set but [api.project] is missing".into()
                ));
            }
        }

        if !(1..=100).contains(&self.render.image_quality) {
            bail!(ConfigError::Validation(
                "[render.image_quality] must be between 1 and 100".into()
            ));
        }

        if self.render.jobs == 0 {
            bail!(ConfigError::Validation(
                "[render.jobs] must be at least 1".into()
            ));
        }

        if !self.render.base_url.starts_with("http") {
            bail!(ConfigError::Validation(
                "[render.base_url] must start with http:// or https://".into()
            ));
        }

        if self.cli.is_some_and(Cli::is_serve) && !self.serve.root.is_dir()
        {
            bail!(ConfigError::Validation(format!(
                "[serve.root] `{}` is not a directory",
                self.serve.root.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
