//! `cmscy render` and `cmscy widget`: ahead-of-time rendering.

use crate::cms::{CmsApi, CmsClient};
use crate::config::{Config, RenderConfig};
use crate::logger::ProgressBars;
use crate::log;
use crate::page::render_page;
use crate::widget::{PageLocation, Renderer, WidgetKind, hook_script};
use anyhow::{Context, Result, bail};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// One page to render: where it is read from, written to, and viewed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub location: PageLocation,
}

/// Render a file or a directory of pages, as configured by `cmscy render`.
pub async fn render_site(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    location: Option<&str>,
) -> Result<()> {
    let jobs = plan_jobs(input, output, location, &config.render.base_url)?;
    if jobs.is_empty() {
        log!("warn"; "no html pages found in {}", input.display());
        return Ok(());
    }

    let fallback_api = config.fallback_api();
    log!("render"; "rendering {} page(s)...", jobs.len());
    let failed = render_jobs(jobs, &config.render, fallback_api.as_ref()).await;
    if failed > 0 {
        bail!("{failed} page(s) failed to render");
    }
    log!("render"; "done");
    Ok(())
}

/// Work out input, output and location of every page under `input`.
///
/// A file renders in place unless `output` is given, viewed at `location`
/// (or `base_url/<file name>`). A directory is walked for `.html` files,
/// mirrored into `output` and each page is viewed at `base_url/<relative path>`.
pub fn plan_jobs(
    input: &Path,
    output: Option<&Path>,
    location: Option<&str>,
    base_url: &str,
) -> Result<Vec<RenderJob>> {
    if input.is_file() {
        let output = output.unwrap_or(input).to_path_buf();
        let location = match location {
            Some(location) => PageLocation::parse(location)
                .with_context(|| format!("Invalid location `{location}`"))?,
            None => {
                let name = input
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                location_under(base_url, Path::new(&name))?
            }
        };
        return Ok(vec![RenderJob {
            input: input.to_path_buf(),
            output,
            location,
        }]);
    }

    if !input.is_dir() {
        bail!("Input `{}` does not exist", input.display());
    }
    if location.is_some() {
        bail!("--location applies to a single file; use --base-url for directories");
    }

    let output_root = output.unwrap_or(input);
    let mut pages: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    pages.sort();

    pages
        .into_iter()
        .map(|path| -> Result<RenderJob> {
            let relative = path.strip_prefix(input)?.to_path_buf();
            Ok(RenderJob {
                location: location_under(base_url, &relative)?,
                output: output_root.join(&relative),
                input: path,
            })
        })
        .collect()
}

/// `base_url` joined with a relative file path, segments percent-encoded.
fn location_under(base_url: &str, relative: &Path) -> Result<PageLocation> {
    let path = relative
        .components()
        .map(|part| urlencoding::encode(&part.as_os_str().to_string_lossy()).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let url = format!("{}/{}", base_url.trim_end_matches('/'), path);
    PageLocation::parse(&url).with_context(|| format!("Invalid page location `{url}`"))
}

/// Render jobs with at most `config.jobs` pages in flight. Returns the
/// number of pages that failed; failures are logged and do not stop the rest.
pub async fn render_jobs(
    jobs: Vec<RenderJob>,
    config: &RenderConfig,
    fallback_api: Option<&CmsApi>,
) -> usize {
    let progress = ProgressBars::new_filtered(&[("pages", jobs.len())]);
    let bars = progress.as_ref();

    let results: Vec<bool> = stream::iter(jobs)
        .map(|job| async move {
            let result = render_job(&job, config, fallback_api).await;
            if let Some(bars) = bars {
                bars.inc_by_name("pages");
            }
            match result {
                Ok(()) => true,
                Err(e) => {
                    log!("error"; "{}: {:#}", job.input.display(), e);
                    false
                }
            }
        })
        .buffer_unordered(config.jobs.max(1))
        .collect()
        .await;

    if let Some(progress) = progress {
        progress.finish();
    }
    results.iter().filter(|ok| !**ok).count()
}

async fn render_job(job: &RenderJob, config: &RenderConfig, fallback_api: Option<&CmsApi>) -> Result<()> {
    let content = fs::read(&job.input)
        .await
        .with_context(|| format!("Failed to read {}", job.input.display()))?;
    let rendered = render_page(&content, &job.location, config, fallback_api).await?;

    if let Some(parent) = job.output.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&job.output, rendered)
        .await
        .with_context(|| format!("Failed to write {}", job.output.display()))?;
    Ok(())
}

/// Render one widget for `cmscy widget`: its markup followed by its hook script.
pub async fn render_widget(
    config: &Config,
    kind: WidgetKind,
    name: &str,
    location: &str,
) -> Result<String> {
    let Some(api) = config.fallback_api() else {
        bail!("No CMS endpoint: set [api] in cmscy.toml or pass --api-url and --project");
    };
    let location =
        PageLocation::parse(location).with_context(|| format!("Invalid location `{location}`"))?;
    let client = CmsClient::new(&api).context("Failed to create CMS client")?;
    let renderer = Renderer::new(&client, &api, config.render.image_quality);

    let rendered = renderer
        .render(kind, name, &location)
        .await
        .with_context(|| format!("component \"{name}\" failed"))?;

    let mut html = rendered.html();
    if config.render.hooks {
        html.push_str(&hook_script(rendered.hooks()));
    }
    Ok(html)
}
