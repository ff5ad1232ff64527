//! Corpus document.
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A Cellar document, as described by the metadata endpoint.
///
/// `text` is only set once the body has been fetched,
/// and is omitted from the serialized form until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    url: String,
    title: String,
    date: NaiveDate,
    lang: String,
    formats: BTreeSet<String>,
    eurovoc_concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Document {
    pub fn new(
        url: String,
        title: String,
        date: NaiveDate,
        lang: String,
        formats: BTreeSet<String>,
        eurovoc_concepts: Vec<String>,
    ) -> Self {
        Self {
            url,
            title,
            date,
            lang,
            formats,
            eurovoc_concepts,
            text: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn formats(&self) -> &BTreeSet<String> {
        &self.formats
    }

    pub fn eurovoc_concepts(&self) -> &[String] {
        &self.eurovoc_concepts
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}
