//! The page URL a widget is rendered for.

use url::{Url, form_urlencoded};

pub const CATEGORY_PARAM: &str = "category";
pub const ARTICLE_PARAM: &str = "article";
pub const PAGE_PARAM: &str = "page";

/// Parsed page location: supplies the `category`, `article` and `page`
/// parameters, the last path segment and the origin for links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(location: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(location.trim())?,
        })
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// `category` split on commas, empty pieces dropped.
    pub fn category_param(&self) -> Vec<String> {
        self.query_param(CATEGORY_PARAM)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Non-empty `article` parameter.
    pub fn article_param(&self) -> Option<String> {
        self.query_param(ARTICLE_PARAM)
            .filter(|slug| !slug.trim().is_empty())
    }

    /// `page` parameter when it is a positive integer, otherwise 1.
    pub fn current_page(&self) -> u32 {
        self.query_param(PAGE_PARAM)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|&page| page > 0)
            .unwrap_or(1)
    }

    /// Last path segment, cut at the first `.html`: `/news/sports.html` → `sports`.
    pub fn last_path_segment(&self) -> Option<String> {
        let segment = self.url.path().rsplit('/').next()?;
        let segment = match segment.find(".html") {
            Some(end) => &segment[..end],
            None => segment,
        };
        let segment = urlencoding::decode(segment)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| segment.to_owned());
        (!segment.is_empty()).then_some(segment)
    }

    /// `scheme://host[:port]`
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Link to page `number` of a paged list.
    ///
    /// The current URL without its query string, followed by the remaining
    /// parameters minus `page`; `page=n` is appended for n > 1.
    pub fn page_url(&self, number: u32) -> String {
        let mut base = self.url.clone();
        base.set_query(None);
        base.set_fragment(None);

        let mut params = form_urlencoded::Serializer::new(String::new());
        params.extend_pairs(self.url.query_pairs().filter(|(key, _)| key != PAGE_PARAM));
        let params = params.finish();

        match (params.is_empty(), number > 1) {
            (true, false) => base.to_string(),
            (false, false) => format!("{base}?{params}"),
            (true, true) => format!("{base}?{PAGE_PARAM}={number}"),
            (false, true) => format!("{base}?{params}&{PAGE_PARAM}={number}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> PageLocation {
        PageLocation::parse(s).unwrap()
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            loc("https://example.com/news/sports.html").last_path_segment().as_deref(),
            Some("sports")
        );
        assert_eq!(
            loc("https://example.com/news/sports").last_path_segment().as_deref(),
            Some("sports")
        );
        assert_eq!(
            loc("https://example.com/sports.html.bak").last_path_segment().as_deref(),
            Some("sports")
        );
        assert_eq!(loc("https://example.com/news/").last_path_segment(), None);
        assert_eq!(loc("https://example.com/.html").last_path_segment(), None);
    }

    #[test]
    fn test_category_param() {
        let location = loc("https://example.com/news.html?category=sports,,local,");
        assert_eq!(location.category_param(), vec!["sports", "local"]);
        assert!(loc("https://example.com/").category_param().is_empty());
    }

    #[test]
    fn test_current_page() {
        assert_eq!(loc("https://example.com/?page=3").current_page(), 3);
        assert_eq!(loc("https://example.com/?page=0").current_page(), 1);
        assert_eq!(loc("https://example.com/?page=-2").current_page(), 1);
        assert_eq!(loc("https://example.com/?page=two").current_page(), 1);
        assert_eq!(loc("https://example.com/").current_page(), 1);
    }

    #[test]
    fn test_article_param() {
        assert_eq!(
            loc("https://example.com/post.html?article=hello-world").article_param().as_deref(),
            Some("hello-world")
        );
        assert_eq!(loc("https://example.com/post.html?article=").article_param(), None);
    }

    #[test]
    fn test_origin() {
        assert_eq!(loc("https://example.com/a/b.html?x=1").origin(), "https://example.com");
        assert_eq!(loc("http://localhost:5277/news.html").origin(), "http://localhost:5277");
    }

    #[test]
    fn test_page_url_without_other_params() {
        let location = loc("https://example.com/news.html?page=2");
        assert_eq!(location.page_url(1), "https://example.com/news.html");
        assert_eq!(location.page_url(3), "https://example.com/news.html?page=3");
    }

    #[test]
    fn test_page_url_keeps_other_params() {
        let location = loc("https://example.com/news.html?category=sports&page=2#top");
        assert_eq!(location.page_url(1), "https://example.com/news.html?category=sports");
        assert_eq!(
            location.page_url(2),
            "https://example.com/news.html?category=sports&page=2"
        );
    }
}
