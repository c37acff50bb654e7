//! First pass: find the endpoint block and the mount points of a page.

use super::common::{
    attr_value, create_xml_reader, is_api_block, is_mount, is_raw_text, skip_element,
};
use crate::widget::WidgetKind;
use anyhow::{Result, bail};
use quick_xml::events::Event;

/// A `[cms-control]` element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Raw `type` attribute.
    pub type_attr: String,
    pub kind: Option<WidgetKind>,
    pub name: Option<String>,
}

impl Mount {
    /// Kind and name when the mount can be rendered.
    pub fn target(&self) -> Option<(WidgetKind, &str)> {
        Some((self.kind?, self.name.as_deref()?))
    }
}

#[derive(Debug, Default)]
pub struct PageScan {
    /// JSON text of the first `cms-cy-api` block.
    pub api_block: Option<String>,
    pub mounts: Vec<Mount>,
}

/// Scan a page. Mount contents are skipped: mounts nested inside another
/// mount are replaced along with it and never rendered.
pub fn scan_page(content: &[u8]) -> Result<PageScan> {
    let mut reader = create_xml_reader(content);
    let mut scan = PageScan::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) if is_mount(&elem) => {
                scan.mounts.push(read_mount(&elem));
                skip_element(&mut reader, elem.name())?;
            }
            Ok(Event::Empty(elem)) if is_mount(&elem) => {
                scan.mounts.push(read_mount(&elem));
            }
            Ok(Event::Start(elem)) if scan.api_block.is_none() && is_api_block(&elem) => {
                let range = skip_element(&mut reader, elem.name())?;
                let text = String::from_utf8_lossy(&content[range]).trim().to_owned();
                scan.api_block = Some(text);
            }
            Ok(Event::Start(elem)) if is_raw_text(&elem) => {
                skip_element(&mut reader, elem.name())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => bail!(
                "HTML parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        }
    }

    Ok(scan)
}

fn read_mount(elem: &quick_xml::events::BytesStart<'_>) -> Mount {
    let type_attr = attr_value(elem, b"type").unwrap_or_default();
    Mount {
        kind: WidgetKind::from_attr(&type_attr),
        type_attr,
        name: attr_value(elem, b"name").filter(|name| !name.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <script id="cms-cy-api" type="application/json">
    { "url": "https://projectapi.cms.cy", "project": "demo" }
  </script>
</head>
<body>
  <div cms-control type="article-list" name="news">loading<div cms-control type="single-article" name="nested"></div></div>
  <section cms-control="" type="single-article" name="post"/>
  <div cms-control type="carousel" name="slides"></div>
  <div cms-control type="article-list"></div>
</body>
</html>"#;

    #[test]
    fn test_scan_api_block() {
        let scan = scan_page(PAGE.as_bytes()).unwrap();
        assert_eq!(
            scan.api_block.as_deref(),
            Some(r#"{ "url": "https://projectapi.cms.cy", "project": "demo" }"#)
        );
    }

    #[test]
    fn test_scan_mounts_in_order() {
        let scan = scan_page(PAGE.as_bytes()).unwrap();
        let targets: Vec<_> = scan.mounts.iter().map(Mount::target).collect();
        assert_eq!(
            targets,
            vec![
                Some((WidgetKind::ArticleList, "news")),
                Some((WidgetKind::SingleArticle, "post")),
                None,
                None,
            ]
        );
        assert_eq!(scan.mounts[2].type_attr, "carousel");
        assert!(scan.mounts[3].name.is_none());
    }

    #[test]
    fn test_scan_ignores_markup_inside_scripts() {
        let page = r#"<html><head><script>var s = "<div cms-control type='x'>";</script>
<style>.a::before { content: "<div>"; }</style></head>
<body><script>document.write("<div>");</script><div cms-control type="article-list" name="news"></div></body></html>"#;
        let scan = scan_page(page.as_bytes()).unwrap();
        let targets: Vec<_> = scan.mounts.iter().map(Mount::target).collect();
        assert_eq!(targets, vec![Some((WidgetKind::ArticleList, "news"))]);
    }

    #[test]
    fn test_scan_page_without_mounts() {
        let scan = scan_page(b"<html><body><p>plain</p></body></html>").unwrap();
        assert!(scan.api_block.is_none());
        assert!(scan.mounts.is_empty());
    }
}
