//! Document formats and their decoders.
use std::collections::BTreeSet;
use std::fmt;

use crate::error::Error;

use super::{pdf, word, xhtml};

/// A format Cellar can serve a document in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Pdf,
    Docx,
    Doc,
    Xhtml,
}

impl Format {
    /// Formats by extraction preference.
    pub const PRIORITY: [Format; 4] = [Format::Pdf, Format::Docx, Format::Doc, Format::Xhtml];

    /// Tag used in Cellar metadata (`mtypes`).
    pub fn tag(&self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
            Format::Doc => "doc",
            Format::Xhtml => "xhtml",
        }
    }

    /// MIME type requested in the `Accept` header.
    pub fn accept(&self) -> &'static str {
        match self {
            Format::Pdf => "application/pdf",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
            }
            Format::Doc => "application/msword",
            Format::Xhtml => "application/xhtml+xml",
        }
    }

    /// Pick the preferred format among a document's format tags.
    ///
    /// Tags are matched exactly: `pdfa1a` is not `pdf`.
    pub fn select(formats: &BTreeSet<String>) -> Option<Self> {
        Self::PRIORITY
            .iter()
            .copied()
            .find(|f| formats.contains(f.tag()))
    }

    /// Convert a successful response body into raw text.
    pub fn decode(&self, body: &[u8]) -> Result<String, Error> {
        match self {
            Format::Pdf => pdf::extract(body),
            Format::Docx | Format::Doc => word::extract(body),
            Format::Xhtml => Ok(xhtml::extract(body)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(t: &[&str]) -> BTreeSet<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn priority() {
        assert_eq!(
            Format::select(&tags(&["xhtml", "doc", "docx", "pdf"])),
            Some(Format::Pdf)
        );
        assert_eq!(
            Format::select(&tags(&["xhtml", "doc", "docx"])),
            Some(Format::Docx)
        );
        assert_eq!(Format::select(&tags(&["xhtml", "doc"])), Some(Format::Doc));
        assert_eq!(Format::select(&tags(&["fmx4", "xhtml"])), Some(Format::Xhtml));
    }

    #[test]
    fn unknown() {
        assert_eq!(Format::select(&tags(&["unknown"])), None);
        assert_eq!(Format::select(&tags(&["pdfa1a", "fmx4"])), None);
        assert_eq!(Format::select(&BTreeSet::new()), None);
    }
}
