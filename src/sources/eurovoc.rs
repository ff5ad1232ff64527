//! EuroVoc thesaurus.
//!
//! The Publications Office exposes EuroVoc as an XML schema where each concept is an
//! `xs:enumeration`, named by its `xs:documentation` and identified by the `thesaurus_id` of its
//! `record`s:
//!
//! ```xml
//! <xs:enumeration value="http://eurovoc.europa.eu/100142">
//!   <xs:annotation>
//!     <xs:documentation>agricultural policy / policy</xs:documentation>
//!     <xs:appinfo><record thesaurus_id="100142"/></xs:appinfo>
//!   </xs:annotation>
//! </xs:enumeration>
//! ```
use std::collections::HashMap;

use log::{info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::cache::EUROVOC;
use crate::context::Context;
use crate::error::{Error, FetchError};

pub const EUROVOC_ENDPOINT: &str = "http://publications.europa.eu/resource/dataset/eurovoc";

/// A taxonomy entry that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyParseError {
    /// 1-based index of the `enumeration` in the schema.
    pub position: usize,
    pub reason: &'static str,
}

#[derive(Debug, Default)]
struct Entry {
    documentation: Option<String>,
    ids: Vec<String>,
    records: usize,
    malformed: Option<&'static str>,
}

impl Entry {
    fn record(&mut self, e: &BytesStart) {
        self.records += 1;
        let mut found = false;
        for attr in e.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(_) => {
                    self.malformed = Some("invalid record attribute");
                    continue;
                }
            };
            if attr.key.local_name().as_ref() == b"thesaurus_id" {
                found = true;
                match attr.unescape_value() {
                    Ok(id) if !id.is_empty() => self.ids.push(id.into_owned()),
                    Ok(_) => (),
                    Err(_) => self.malformed = Some("invalid thesaurus_id"),
                }
            }
        }
        if !found {
            self.malformed.get_or_insert("record without thesaurus_id");
        }
    }

    /// Term name and ids of the entry.
    fn finish(self, position: usize) -> Result<(String, Vec<String>), TaxonomyParseError> {
        let err = |reason| TaxonomyParseError { position, reason };
        if let Some(reason) = self.malformed {
            return Err(err(reason));
        }
        let documentation = self.documentation.ok_or_else(|| err("missing documentation"))?;
        if self.records == 0 {
            return Err(err("missing records"));
        }

        let name = documentation
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        Ok((name, self.ids))
    }
}

/// Lowercase term name → thesaurus id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuroVocTermMap(HashMap<String, String>);

impl EuroVocTermMap {
    /// Parse the EuroVoc schema.
    ///
    /// Malformed entries are logged and skipped.
    pub fn parse(xml: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut terms = HashMap::new();

        let mut entry: Option<Entry> = None;
        let mut in_documentation = false;
        let mut position = 0;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"enumeration" => {
                        position += 1;
                        entry = Some(Entry::default());
                    }
                    b"documentation" => in_documentation = entry.is_some(),
                    b"record" => {
                        if let Some(entry) = entry.as_mut() {
                            entry.record(&e);
                        }
                    }
                    _ => (),
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"enumeration" => {
                        position += 1;
                        warn!(
                            "could not parse taxonomy entry {:?}",
                            TaxonomyParseError {
                                position,
                                reason: "empty enumeration"
                            }
                        );
                    }
                    b"record" => {
                        if let Some(entry) = entry.as_mut() {
                            entry.record(&e);
                        }
                    }
                    _ => (),
                },
                Event::Text(t) if in_documentation => {
                    if let Some(entry) = entry.as_mut() {
                        match t.unescape() {
                            Ok(text) => entry
                                .documentation
                                .get_or_insert_with(String::new)
                                .push_str(&text),
                            Err(_) => entry.malformed = Some("invalid documentation text"),
                        }
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"documentation" => in_documentation = false,
                    b"enumeration" => {
                        if let Some(entry) = entry.take() {
                            match entry.finish(position) {
                                Ok((name, ids)) => {
                                    for id in ids {
                                        terms.insert(name.clone(), id);
                                    }
                                }
                                Err(e) => warn!("could not parse taxonomy entry {:?}", e),
                            }
                        }
                    }
                    _ => (),
                },
                Event::Eof => break,
                _ => (),
            }
            buf.clear();
        }

        Ok(Self(terms))
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.0.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Map concept labels to thesaurus ids.
    ///
    /// Labels are trimmed and lowercased, unknown ones are logged and dropped.
    pub fn concept_ids(&self, labels: &[String]) -> Vec<String> {
        labels
            .iter()
            .filter_map(|label| match self.get(&label.trim().to_lowercase()) {
                Some(id) => Some(id.to_string()),
                None => {
                    warn!("could not find {} in EuroVoc", label);
                    None
                }
            })
            .collect()
    }
}

/// EuroVoc term map download, memoized for two hours.
pub struct EuroVoc<'a> {
    ctx: &'a Context,
    endpoint: String,
}

impl<'a> EuroVoc<'a> {
    pub fn new(ctx: &'a Context, endpoint: &str) -> Self {
        Self {
            ctx,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn terms(&self) -> Result<EuroVocTermMap, Error> {
        self.ctx
            .cache()
            .get_or_insert_with(&EUROVOC, "eurovoc_terms", &[self.endpoint.as_str()], || {
                self.download()
            })
    }

    fn download(&self) -> Result<EuroVocTermMap, Error> {
        let response = self
            .ctx
            .client()
            .get(&self.endpoint, "application/xml", "en")?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::new(&self.endpoint, response.status(), response.body()).into());
        }
        let terms = EuroVocTermMap::parse(response.body())?;
        info!("loaded {} EuroVoc terms", terms.len());
        Ok(terms)
    }
}
