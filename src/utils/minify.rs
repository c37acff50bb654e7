//! Minification of rewritten pages.

use crate::config::RenderConfig;
use std::borrow::Cow;

/// Minify a rendered page when `[render] minify` is on.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify_page<'a>(html: &'a [u8], config: &RenderConfig) -> Cow<'a, [u8]> {
    if config.minify {
        Cow::Owned(minify_html_inner(html))
    } else {
        Cow::Borrowed(html)
    }
}

fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_minify(enabled: bool) -> RenderConfig {
        RenderConfig {
            minify: enabled,
            ..Default::default()
        }
    }

    #[test]
    fn test_minify_page_basic() {
        let html = b"<html>\n  <head>\n  </head>\n  <body>\n    <div cms-control type=\"article-list\" name=\"news\">\n      <p>Hello</p>\n    </div>\n  </body>\n</html>";
        let result = minify_page(html, &config_with_minify(true));
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("\n  "));
        assert!(result_str.contains("<p>Hello</p>"));
        assert!(result_str.contains("cms-control"));
    }

    #[test]
    fn test_minify_page_drops_comments() {
        let html = b"<div><!-- Swiper --><p>kept</p></div>";
        let result = minify_page(html, &config_with_minify(true));
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("Swiper"));
        assert!(result_str.contains("kept"));
    }

    #[test]
    fn test_minify_page_disabled() {
        let html = b"<html>\n  <body>\n  </body>\n</html>";
        let result = minify_page(html, &config_with_minify(false));

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, html);
    }
}
