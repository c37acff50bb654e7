//! Page processing: render every mount point of an HTML page.
//!
//! ```text
//! page bytes ──► scan_page ──► cms-cy-api block + [cms-control] mounts
//!                                  │
//!                   join_all(render each mount)   (one future per mount)
//!                                  │
//!            rewrite_page: fragments into mounts,
//!                          base stylesheet after <body>,
//!                          hook script before </body>
//!                                  │
//!                               minify? ──► page bytes
//! ```

mod common;
mod rewrite;
mod scan;

pub use rewrite::{Splice, rewrite_page};
pub use scan::{Mount, PageScan, scan_page};

use crate::cms::{CmsApi, CmsClient};
use crate::config::RenderConfig;
use crate::log;
use crate::utils::minify::minify_page;
use crate::widget::{PageLocation, PostRenderHook, Renderer, hook_script};
use anyhow::{Context, Result};
use futures::future::join_all;

/// Stylesheet shared by all widgets.
const BASE_STYLES: &str = include_str!("../embed/css/cms-cy.css");

pub fn base_style_element() -> String {
    format!("<style>{BASE_STYLES}</style>")
}

/// Endpoint for a page: its own `cms-cy-api` block, else `fallback`.
pub fn resolve_api(scan: &PageScan, fallback: Option<&CmsApi>) -> Option<CmsApi> {
    if let Some(block) = &scan.api_block {
        match CmsApi::from_json(block) {
            Ok(api) => return Some(api),
            Err(err) => log!("error"; "ignoring cms-cy-api block: {}", err),
        }
    }
    fallback.cloned()
}

/// Render all mount points of `content` as seen from `location`.
///
/// Pages without mounts, or without a usable endpoint, pass through unchanged
/// (minified if configured).
pub async fn render_page(
    content: &[u8],
    location: &PageLocation,
    config: &RenderConfig,
    fallback_api: Option<&CmsApi>,
) -> Result<Vec<u8>> {
    let scan = scan_page(content)?;
    if scan.mounts.is_empty() {
        return Ok(minify_page(content, config).into_owned());
    }

    let Some(api) = resolve_api(&scan, fallback_api) else {
        log!("error"; "API URL or project not defined, {} mount point(s) left untouched", scan.mounts.len());
        return Ok(minify_page(content, config).into_owned());
    };

    let client = CmsClient::new(&api).context("Failed to create CMS client")?;
    let renderer = Renderer::new(&client, &api, config.image_quality);
    let output = splice_page(content, &scan, &renderer, location, config).await?;
    Ok(minify_page(&output, config).into_owned())
}

/// Render the mounts of an already scanned page and splice the results in.
pub async fn splice_page(
    content: &[u8],
    scan: &PageScan,
    renderer: &Renderer<'_>,
    location: &PageLocation,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let outputs = join_all(
        scan.mounts
            .iter()
            .map(|mount| render_mount(renderer, mount, location)),
    )
    .await;

    let mut hooks: Vec<PostRenderHook> = Vec::new();
    let mut mounts = Vec::with_capacity(outputs.len());
    for output in outputs {
        match output {
            Some((html, mount_hooks)) => {
                hooks.extend(mount_hooks);
                mounts.push(Some(html));
            }
            None => mounts.push(None),
        }
    }

    let styles = (config.base_styles && !scan.mounts.is_empty()).then(base_style_element);
    let scripts = if config.hooks {
        Some(hook_script(&hooks)).filter(|script| !script.is_empty())
    } else {
        None
    };

    rewrite_page(
        content,
        &Splice {
            mounts: &mounts,
            styles: styles.as_deref(),
            scripts: scripts.as_deref(),
        },
    )
}

/// Markup and hooks for one mount; `None` leaves the mount untouched.
async fn render_mount(
    renderer: &Renderer<'_>,
    mount: &Mount,
    location: &PageLocation,
) -> Option<(String, Vec<PostRenderHook>)> {
    let Some((kind, name)) = mount.target() else {
        match (&mount.kind, &mount.name) {
            (None, _) => log!("warn"; "unknown mount type \"{}\", skipped", mount.type_attr),
            (Some(kind), None) => log!("warn"; "{} mount without a name, skipped", kind),
            (Some(_), Some(_)) => {}
        }
        return None;
    };

    match renderer.render(kind, name, location).await {
        Ok(rendered) => Some((rendered.html(), rendered.hooks().to_vec())),
        Err(err) => {
            log!("error"; "component \"{}\" failed: {}", name, err);
            Some((String::new(), Vec::new()))
        }
    }
}
