//! Second pass: splice rendered fragments into the page.

use super::common::{
    XmlWriter, create_xml_reader, expand_empty, is_mount, is_raw_text, skip_element, write_raw,
};
use anyhow::{Result, bail};
use quick_xml::{
    Writer,
    events::{BytesEnd, Event},
};
use std::io::Cursor;

/// What to write into a page besides its own markup.
#[derive(Debug, Default)]
pub struct Splice<'a> {
    /// Per mount, in document order: new contents, or `None` to keep the
    /// mount untouched.
    pub mounts: &'a [Option<String>],
    /// `<style>` element inserted right after `<body>`.
    pub styles: Option<&'a str>,
    /// Inserted right before `</body>`.
    pub scripts: Option<&'a str>,
}

/// Rewrite `content` with `splice` applied.
///
/// Without a `<body>`, styles go first and scripts last.
pub fn rewrite_page(content: &[u8], splice: &Splice<'_>) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(content.len())));
    let mut reader = create_xml_reader(content);
    let mut mount_index = 0;
    let mut styles_written = splice.styles.is_none();
    let mut scripts_written = splice.scripts.is_none();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) if is_mount(&elem) => {
                let replacement = splice.mounts.get(mount_index).cloned().flatten();
                mount_index += 1;
                match replacement {
                    Some(html) => {
                        writer.write_event(Event::Start(elem.clone()))?;
                        skip_element(&mut reader, elem.name())?;
                        write_raw(&mut writer, html.as_bytes())?;
                        writer.write_event(Event::End(elem.to_end()))?;
                    }
                    None => {
                        let range = skip_element(&mut reader, elem.name())?;
                        writer.write_event(Event::Start(elem.clone()))?;
                        write_raw(&mut writer, &content[range])?;
                        writer.write_event(Event::End(elem.to_end()))?;
                    }
                }
            }
            Ok(Event::Empty(elem)) if is_mount(&elem) => {
                let replacement = splice.mounts.get(mount_index).cloned().flatten();
                mount_index += 1;
                match replacement {
                    Some(html) => {
                        writer.write_event(expand_empty(&elem))?;
                        write_raw(&mut writer, html.as_bytes())?;
                        writer.write_event(Event::End(elem.to_end()))?;
                    }
                    None => writer.write_event(Event::Empty(elem))?,
                }
            }
            Ok(Event::Start(elem)) if is_raw_text(&elem) => {
                let range = skip_element(&mut reader, elem.name())?;
                writer.write_event(Event::Start(elem.clone()))?;
                write_raw(&mut writer, &content[range])?;
                writer.write_event(Event::End(elem.to_end()))?;
            }
            Ok(Event::Start(elem)) if elem.name().as_ref() == b"body" => {
                writer.write_event(Event::Start(elem))?;
                if let Some(styles) = splice.styles
                    && !styles_written
                {
                    write_raw(&mut writer, styles.as_bytes())?;
                    styles_written = true;
                }
            }
            Ok(Event::End(elem)) if elem.name().as_ref() == b"body" => {
                write_closing_scripts(&mut writer, splice, &mut scripts_written)?;
                writer.write_event(Event::End(BytesEnd::new("body")))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event)?,
            Err(e) => bail!(
                "HTML parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        }
    }

    write_closing_scripts(&mut writer, splice, &mut scripts_written)?;

    let output = writer.into_inner().into_inner();
    match splice.styles {
        Some(styles) if !styles_written => {
            let mut prefixed = Vec::with_capacity(styles.len() + output.len());
            prefixed.extend_from_slice(styles.as_bytes());
            prefixed.extend_from_slice(&output);
            Ok(prefixed)
        }
        _ => Ok(output),
    }
}

fn write_closing_scripts(
    writer: &mut XmlWriter,
    splice: &Splice<'_>,
    written: &mut bool,
) -> Result<()> {
    if let Some(scripts) = splice.scripts
        && !*written
    {
        write_raw(writer, scripts.as_bytes())?;
        *written = true;
    }
    Ok(())
}
