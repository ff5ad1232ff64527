//! Word text extraction.
//!
//! Depending on the requested MIME type and on the document, Cellar answers with an OOXML package
//! (zip), with the bare main part of the package (`document.main+xml`), or with a binary OLE file.
//! The container is sniffed from the first bytes of the body.
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const MAIN_PART: &str = "word/document.xml";

/// Extract text from a Word document.
///
/// Paragraphs end with a newline, tabs and line breaks are kept.
pub fn extract(body: &[u8]) -> Result<String, Error> {
    if body.starts_with(ZIP_MAGIC) {
        from_package(body)
    } else if is_xml(body) {
        from_xml(body)
    } else if body.starts_with(OLE_MAGIC) {
        Err(Error::Decode(
            "binary (OLE) Word documents are not supported".to_string(),
        ))
    } else {
        Err(Error::Decode("unrecognized Word container".to_string()))
    }
}

fn is_xml(body: &[u8]) -> bool {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map_or(false, |b| *b == b'<')
}

fn from_package(body: &[u8]) -> Result<String, Error> {
    let mut archive = zip::ZipArchive::new(Cursor::new(body))?;
    let mut part = archive.by_name(MAIN_PART)?;
    // declared sizes are not trusted
    let mut xml = Vec::new();
    part.read_to_end(&mut xml)?;
    from_xml(&xml)
}

/// Walk WordprocessingML, keeping the content of `t` runs.
///
/// Prefixes are ignored so that both `w:` documents and flat packages work.
fn from_xml(xml: &[u8]) -> Result<String, Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut text = String::new();

    let mut in_run_text = false;
    // tab stops of paragraph properties are `tab` elements too
    let mut in_tab_stops = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = true,
                b"tabs" => in_tab_stops = true,
                _ => (),
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => text.push('\n'),
                _ => (),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => text.push('\t'),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => (),
            },
            Event::Text(e) if in_run_text => text.push_str(&e.unescape()?),
            Event::CData(e) if in_run_text => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    Ok(text)
}
