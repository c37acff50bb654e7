//! Typed HTML fragments.
//!
//! Widgets build a tree of [`Node`]s instead of formatting strings, so every
//! CMS-supplied value lands in the output escaped. Only [`Node::Raw`] bypasses
//! escaping: it carries trusted markup (article bodies, custom code, inline
//! CSS and icons).
//!
//! ```ignore
//! let link = Element::new("a")
//!     .class("cms-cy-posts__item-title")
//!     .attr("href", url)
//!     .child(Element::new("h3").text(title));
//! let html = to_html(&[link.into()]);
//! ```

use quick_xml::escape::escape;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Written verbatim.
    Raw(String),
    Comment(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::Element(elem) => elem.write(out),
            Self::Text(text) => out.push_str(&escape(text.as_str())),
            Self::Raw(html) => out.push_str(html),
            Self::Comment(text) => {
                out.push_str("<!-- ");
                out.push_str(&text.replace("--", "- -"));
                out.push_str(" -->");
            }
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(elem)
    }
}

/// An element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
    /// Void elements (`img`, `path`, ...) have no closing tag.
    void: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    pub fn void(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn attr_if(self, cond: bool, name: &'static str, value: impl Into<String>) -> Self {
        if cond { self.attr(name, value) } else { self }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn raw(self, html: impl Into<String>) -> Self {
        self.child(Node::Raw(html.into()))
    }

    #[cfg(test)]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[cfg(test)]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');
        if self.void {
            return;
        }
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl From<Element> for String {
    fn from(elem: Element) -> Self {
        to_html(&[Node::Element(elem)])
    }
}

/// Serialize nodes compactly, without added whitespace.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write(&mut out);
    }
    out
}

/// Element id derived from a component name, usable as a CSS id selector.
///
/// Keeps `[A-Za-z0-9_-]`.
pub fn dom_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let elem = Element::new("h3").text(r#"Fish & "Chips" <b>"#);
        assert_eq!(
            String::from(elem),
            "<h3>Fish &amp; &quot;Chips&quot; &lt;b&gt;</h3>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let elem = Element::void("img").attr("alt", r#"it's "big""#);
        assert_eq!(String::from(elem), r#"<img alt="it&apos;s &quot;big&quot;">"#);
    }

    #[test]
    fn test_raw_is_verbatim() {
        let elem = Element::new("div").raw("<p>trusted & <em>kept</em></p>");
        assert_eq!(
            String::from(elem),
            "<div><p>trusted & <em>kept</em></p></div>"
        );
    }

    #[test]
    fn test_attribute_order_and_empty_values() {
        let elem = Element::new("div")
            .attr("thumbsSlider", "")
            .class("swiper mySwiper")
            .attr_if(false, "loading", "lazy");
        assert_eq!(
            String::from(elem),
            r#"<div thumbsSlider="" class="swiper mySwiper"></div>"#
        );
    }

    #[test]
    fn test_nested_and_comment() {
        let nodes = vec![
            Node::comment("Swiper"),
            Element::new("ul")
                .children(["a", "b"].map(|s| Element::new("li").text(s)))
                .into(),
        ];
        assert_eq!(
            to_html(&nodes),
            "<!-- Swiper --><ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_get_attr() {
        let elem = Element::new("a").attr("href", "/x").class("page");
        assert_eq!(elem.tag(), "a");
        assert_eq!(elem.get_attr("class"), Some("page"));
        assert_eq!(elem.get_attr("target"), None);
    }

    #[test]
    fn test_dom_id_filters_characters() {
        assert_eq!(dom_id("news-list_2"), "news-list_2");
        assert_eq!(dom_id("latest news!"), "latestnews");
        assert_eq!(dom_id("\"><script>"), "script");
    }
}
