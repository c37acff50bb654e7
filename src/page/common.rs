use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
    name::QName,
};
use std::io::Cursor;
use std::ops::Range;

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Attribute marking a mount point.
pub const MOUNT_ATTR: &[u8] = b"cms-control";
/// `id` of the endpoint configuration block.
pub const API_BLOCK_ID: &str = "cms-cy-api";

/// Lenient reader: pages are HTML, so end-name and escape checks are off.
#[inline]
pub fn create_xml_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Unescaped value of attribute `name`. Valueless attributes read as "".
pub fn attr_value(elem: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    elem.html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| {
            let raw = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
            match quick_xml::escape::unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw,
            }
        })
}

pub fn has_attr(elem: &BytesStart<'_>, name: &[u8]) -> bool {
    elem.html_attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == name)
}

pub fn is_mount(elem: &BytesStart<'_>) -> bool {
    has_attr(elem, MOUNT_ATTR)
}

pub fn is_api_block(elem: &BytesStart<'_>) -> bool {
    elem.name().as_ref() == b"script" && attr_value(elem, b"id").as_deref() == Some(API_BLOCK_ID)
}

/// `<script>` and `<style>` hold text, not markup: their contents are
/// never searched for mount points.
pub fn is_raw_text(elem: &BytesStart<'_>) -> bool {
    matches!(elem.name().as_ref(), b"script" | b"style")
}

/// Skip to the end tag matching `name`, returning the byte range of the
/// skipped content within the input.
pub fn skip_element(reader: &mut Reader<&[u8]>, name: QName<'_>) -> anyhow::Result<Range<usize>> {
    let span = reader.read_to_end(name)?;
    let start = usize::try_from(span.start)?;
    let end = usize::try_from(span.end)?;
    Ok(start..end)
}

/// Write trusted markup verbatim, bypassing the writer's escaping.
pub fn write_raw(writer: &mut XmlWriter, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    writer.get_mut().write_all(bytes)
}

/// Re-emit a self-closing element as an open tag.
pub fn expand_empty(elem: &BytesStart<'_>) -> Event<'static> {
    Event::Start(elem.clone().into_owned())
}
