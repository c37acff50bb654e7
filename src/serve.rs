//! Rendering server.
//!
//! A lightweight HTTP server built on `tiny_http` that serves a directory and
//! renders the mount points of every html page on request:
//!
//! - Static files are served as-is
//! - Directories resolve to their `index.html`
//! - Html pages are rendered for the request URL (query string included),
//!   so `?category=`, `?article=` and `?page=` behave as in the browser
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐          ┌──────────────────┐
//! │   Main Thread   │ block_on │  tokio runtime   │
//! │  (HTTP Server)  │ ───────► │ (CMS queries)    │
//! └────────┬────────┘          └──────────────────┘
//!          │
//!          ▼
//!    Handle requests
//!    Serve files / rendered pages
//! ```

use crate::{cms::CmsApi, config::Config, log, page::render_page, widget::PageLocation};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tokio::runtime::Handle;

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the rendering server.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Enters the main request handling loop
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site(config: &Config, runtime: &Handle) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;
    let base_port = config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{} -> {}", addr, config.serve.root.display());

    let fallback_api = config.fallback_api();
    if fallback_api.is_none() {
        log!("warn"; "no [api] configured, only pages with a cms-cy-api block are rendered");
    }

    let context = ServeContext {
        config,
        fallback_api: fallback_api.as_ref(),
        runtime,
        addr,
    };

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &context) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Everything a request needs besides the request itself.
struct ServeContext<'a> {
    config: &'a Config,
    fallback_api: Option<&'a CmsApi>,
    runtime: &'a Handle,
    addr: SocketAddr,
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request.
///
/// Request resolution order:
/// 1. Exact file match → serve file (html pages rendered first)
/// 2. Directory with index.html → serve rendered index.html
/// 3. Nothing found → 404
fn handle_request(request: Request, context: &ServeContext<'_>) -> Result<()> {
    let Some(local_path) = resolve_path(&context.config.serve.root, request.url()) else {
        return serve_not_found(request);
    };

    if is_html(&local_path) {
        let location = request_location(&request, context.addr);
        return serve_page(request, &local_path, &location, context);
    }
    serve_file(request, &local_path)
}

/// Map a request URL to a file under `root`.
fn resolve_path(root: &Path, url: &str) -> Option<PathBuf> {
    // Strip query string before decoding: `?page=2` is for the page, not the path
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let request_path = decoded.trim_matches('/');

    if request_path.split('/').any(|part| part == "..") {
        return None;
    }

    let local_path = root.join(request_path);
    if local_path.is_file() {
        return Some(local_path);
    }
    if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            return Some(index_path);
        }
    }
    None
}

/// Absolute URL of the request, as the browser sees it.
fn request_location(request: &Request, addr: SocketAddr) -> String {
    let host = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Host"))
        .map_or_else(|| addr.to_string(), |header| header.value.as_str().to_owned());
    format!("http://{}{}", host, request.url())
}

fn is_html(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("html" | "htm"))
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Render the mount points of an html page, falling back to the file on disk.
fn serve_page(
    request: Request,
    path: &Path,
    location: &str,
    context: &ServeContext<'_>,
) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let rendered = match PageLocation::parse(location) {
        Ok(location) => context
            .runtime
            .block_on(render_page(
                &content,
                &location,
                &context.config.render,
                context.fallback_api,
            ))
            .map_err(|e| log!("error"; "{}: {:#}", path.display(), e))
            .ok(),
        Err(e) => {
            log!("error"; "invalid request location `{}`: {}", location, e);
            None
        }
    };

    serve_html(request, rendered.unwrap_or(content))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type(guess_content_type(path))?);

    request.respond(response)?;
    Ok(())
}

/// Serve HTML content.
fn serve_html(request: Request, content: Vec<u8>) -> Result<()> {
    let response =
        Response::from_data(content).with_header(content_type("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![content_type("text/plain")?],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value)
        .map_err(|()| anyhow::anyhow!("invalid Content-Type `{value}`"))
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}
