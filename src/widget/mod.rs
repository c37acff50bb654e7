//! Render controller: turns one mount point into a fragment.
//!
//! ```text
//! render(kind, name, location)
//!   ├── article-list   → load_article_list: component → filters → ArticleList → grid + paging
//!   └── single-article → load_article:      component → slug    → Article     → header + media + body
//! ```
//!
//! Absent configuration or data is not an error: it renders
//! [`Rendered::Empty`] with a reason and a log line. Transport and query
//! failures come back as [`CmsError`]; callers mount nothing for them.

mod article;
pub mod hooks;
pub mod layout;
mod list;
pub mod location;

pub use hooks::{PostRenderHook, hook_script};
pub use location::PageLocation;

use crate::cms::types::{FileRef, ImageSizing};
use crate::cms::{CmsApi, CmsError, GraphQl};
use crate::markup::{Element, Node, to_html};
use std::fmt;

/// Mount point type, as written in the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum WidgetKind {
    ArticleList,
    SingleArticle,
}

impl WidgetKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "article-list" => Some(Self::ArticleList),
            "single-article" => Some(Self::SingleArticle),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArticleList => "article-list",
            Self::SingleArticle => "single-article",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a widget rendered nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No published component with this name.
    ConfigurationMissing,
    /// The list query matched no article.
    DataEmpty,
    /// `article_slug = "url"` but the page has no `article` parameter.
    SlugMissing,
    /// No article with the resolved slug.
    ArticleMissing,
    /// `columns × rows` is 0.
    InvalidLayout,
}

/// Markup of a rendered widget plus the hooks to run once it is mounted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    pub hooks: Vec<PostRenderHook>,
}

impl Fragment {
    pub fn html(&self) -> String {
        to_html(&self.nodes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Fragment(Fragment),
    Empty(EmptyReason),
}

impl Rendered {
    /// Markup to mount; empty for [`Rendered::Empty`].
    pub fn html(&self) -> String {
        match self {
            Self::Fragment(fragment) => fragment.html(),
            Self::Empty(_) => String::new(),
        }
    }

    pub fn hooks(&self) -> &[PostRenderHook] {
        match self {
            Self::Fragment(fragment) => &fragment.hooks,
            Self::Empty(_) => &[],
        }
    }
}

/// Renders widgets of one page against one CMS endpoint.
///
/// Holds no mutable state: every mount point of a page runs its own
/// `render` future against the same renderer.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    client: &'a dyn GraphQl,
    api: &'a CmsApi,
    image_quality: u8,
}

impl<'a> Renderer<'a> {
    pub fn new(client: &'a dyn GraphQl, api: &'a CmsApi, image_quality: u8) -> Self {
        Self {
            client,
            api,
            image_quality,
        }
    }

    pub async fn render(
        &self,
        kind: WidgetKind,
        name: &str,
        location: &PageLocation,
    ) -> Result<Rendered, CmsError> {
        match kind {
            WidgetKind::ArticleList => self.load_article_list(name, location).await,
            WidgetKind::SingleArticle => self.load_article(name, location).await,
        }
    }

    /// Resized `<img>` for `file`.
    fn image(&self, file: &FileRef, sizing: &ImageSizing, alt: &str, lazy: bool) -> Element {
        let height = sizing.height();
        Element::void("img")
            .attr(
                "src",
                self.api.asset_url(
                    &file.id,
                    &sizing.fit,
                    sizing.width,
                    height,
                    self.image_quality,
                ),
            )
            .attr("alt", alt)
            .attr("width", sizing.width.to_string())
            .attr("height", height.to_string())
            .attr_if(lazy, "loading", "lazy")
    }
}

/// Serialize variables for the transport.
fn variables<T: serde::Serialize>(vars: &T) -> Result<serde_json::Value, CmsError> {
    Ok(serde_json::to_value(vars)?)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned CMS answering by operation name and recording every call.

    use crate::cms::query::Query;
    use crate::cms::{CmsError, GraphQl, RawResponse};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct CannedCms {
        responses: HashMap<&'static str, Value>,
        calls: Mutex<Vec<(&'static str, Value)>>,
    }

    impl CannedCms {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `query` with `{ "data": data }`.
        pub fn with(mut self, query: &Query, data: Value) -> Self {
            self.responses.insert(query.name, json!({ "data": data }));
            self
        }

        /// Answer `query` with a full response body.
        pub fn with_body(mut self, query: &Query, body: Value) -> Self {
            self.responses.insert(query.name, body);
            self
        }

        pub fn calls(&self) -> Vec<(&'static str, Value)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn variables_of(&self, query: &Query) -> Option<Value> {
            self.calls()
                .into_iter()
                .find(|(name, _)| *name == query.name)
                .map(|(_, vars)| vars)
        }

        pub fn was_called(&self, query: &Query) -> bool {
            self.variables_of(query).is_some()
        }
    }

    #[async_trait]
    impl GraphQl for CannedCms {
        async fn fetch_data(
            &self,
            query: &Query,
            variables: Value,
        ) -> Result<RawResponse, CmsError> {
            self.calls.lock().unwrap().push((query.name, variables));
            let body = self
                .responses
                .get(query.name)
                .cloned()
                .unwrap_or_else(|| json!({ "data": {} }));
            Ok(serde_json::from_value(body)?)
        }
    }
}
