//! Cellar metadata enumeration.
//!
//! Documents of a given day are listed by querying the Cellar SPARQL endpoint
//! (see `cellar.sparql`) for a two-day window starting at that day.
//! Each result row becomes a [Document], without text.
use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::context::Context;
use crate::document::Document;
use crate::error::{Error, FetchError};
use crate::sources::eurovoc::{EuroVoc, EuroVocTermMap};

pub const SPARQL_ENDPOINT: &str = "https://publications.europa.eu/webapi/rdf/sparql";

const QUERY_TEMPLATE: &str = include_str!("cellar.sparql");

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

type Binding = HashMap<String, Term>;

/// SPARQL query listing the documents dated in `[day, day + 2 days)`.
pub fn query(day: NaiveDate) -> String {
    let end = day + Duration::days(2);
    QUERY_TEMPLATE
        .replace("{{ start }}", &day.format("%Y-%m-%d").to_string())
        .replace("{{ end }}", &end.format("%Y-%m-%d").to_string())
}

fn field<'b>(binding: &'b Binding, name: &str) -> Result<&'b str, Error> {
    binding
        .get(name)
        .map(|term| term.value.as_str())
        .ok_or_else(|| Error::Custom(format!("missing field {}", name)))
}

/// Split a comma-joined SPARQL aggregate, dropping empty items.
fn split(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .filter(|item| !item.is_empty())
        .map(String::from)
}

/// Reshape a result row into a [Document].
///
/// Only the known columns are read, the others (`authors`, `workTypes`, `workIds`...) are dropped.
fn reshape(binding: &Binding, terms: Option<&EuroVocTermMap>) -> Result<Document, Error> {
    let subjects = field(binding, "subjects")?.replace('\u{a0}', " ");
    let labels: Vec<String> = split(&subjects).collect();
    let eurovoc_concepts = match terms {
        Some(terms) => terms.concept_ids(&labels),
        None => labels,
    };

    let date = field(binding, "date")?;
    let date = NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d")
        .map_err(|e| Error::Custom(format!("invalid date {}: {}", date, e)))?;

    let formats: BTreeSet<String> = split(field(binding, "mtypes")?).collect();

    Ok(Document::new(
        field(binding, "cellarURIs")?.to_string(),
        field(binding, "title")?.to_string(),
        date,
        field(binding, "langIdentifier")?.to_lowercase(),
        formats,
        eurovoc_concepts,
    ))
}

/// Cellar SPARQL endpoint.
pub struct Cellar<'a> {
    ctx: &'a Context,
    endpoint: String,
    eurovoc: Option<EuroVoc<'a>>,
}

impl<'a> Cellar<'a> {
    pub fn new(ctx: &'a Context, endpoint: &str) -> Self {
        Self {
            ctx,
            endpoint: endpoint.to_string(),
            eurovoc: None,
        }
    }

    /// Resolve concept labels into EuroVoc thesaurus ids.
    ///
    /// By default, documents keep the labels as returned by the endpoint.
    pub fn with_concept_ids(mut self, eurovoc: EuroVoc<'a>) -> Self {
        self.eurovoc = Some(eurovoc);
        self
    }

    /// List the documents of `day`.
    ///
    /// Fails if the endpoint does not answer with `200 OK`.
    /// Rows missing a column are logged and skipped.
    pub fn documents(&self, day: NaiveDate) -> Result<impl Iterator<Item = Document>, Error> {
        let query = query(day);
        let params = [
            ("default-graph-uri", ""),
            ("query", query.as_str()),
            ("format", "application/sparql-results+json"),
            ("timeout", "0"),
            ("debug", "on"),
            ("run", "Run Query"),
        ];

        let response = self.ctx.client().get_query(&self.endpoint, &params)?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::new(&self.endpoint, response.status(), response.body()).into());
        }

        let response: SparqlResponse = serde_json::from_slice(response.body())?;
        debug!("{}: {} rows", day, response.results.bindings.len());

        let terms = match &self.eurovoc {
            Some(eurovoc) => Some(eurovoc.terms()?),
            None => None,
        };

        Ok(response
            .results
            .bindings
            .into_iter()
            .filter_map(move |binding| match reshape(&binding, terms.as_ref()) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!("skipping row {:?}: {:?}", binding, e);
                    None
                }
            }))
    }
}
