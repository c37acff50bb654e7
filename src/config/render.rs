//! `[render]` section configuration.
//!
//! Controls how rendered fragments are spliced into pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[render]` section in cmscy.toml.
///
/// # Example
/// ```toml
/// [render]
/// base_styles = true
/// hooks = true
/// minify = false
/// image_quality = 80
/// jobs = 4
/// base_url = "https://example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Insert the base stylesheet after `<body>` when a page has mount points.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub base_styles: bool,

    /// Emit post-render hook scripts (lightbox, carousel) before `</body>`.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub hooks: bool,

    /// Minify rewritten pages.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// `quality` parameter of generated thumbnail URLs.
    #[serde(default = "defaults::render::image_quality")]
    #[educe(Default = defaults::render::image_quality())]
    pub image_quality: u8,

    /// Pages rendered concurrently by `cmscy render`.
    #[serde(default = "defaults::render::jobs")]
    #[educe(Default = defaults::render::jobs())]
    pub jobs: usize,

    /// Location base for pages rendered from a directory.
    #[serde(default = "defaults::render::base_url")]
    #[educe(Default = defaults::render::base_url())]
    pub base_url: String,
}
