//! `300 Multiple Choices` resolution.
//!
//! Cellar answers with a list of links when a work has several manifestations in the requested
//! format (e.g. one file per annex). Every link is fetched in turn, with the same format and
//! language.
use lazy_static::lazy_static;
use log::warn;
use scraper::{Html, Selector};
use url::Url;

use crate::error::Error;

use super::{Extractor, Format};

/// Maximum number of nested multiple choice pages.
pub const MAX_DEPTH: usize = 8;

lazy_static! {
    static ref ANCHORS: Selector = Selector::parse("a[href]").unwrap();
}

/// URLs currently being resolved, outermost first.
///
/// Also counts the links skipped because they pointed back into the chain:
/// a text resolved while a link was skipped depends on where the resolution started.
#[derive(Debug, Default)]
pub struct Chain {
    urls: Vec<String>,
    skipped: usize,
}

impl Chain {
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn depth(&self) -> usize {
        self.urls.len()
    }

    /// Number of links skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Push `url`, failing if the chain is already [MAX_DEPTH] deep.
    pub fn enter(&mut self, url: &str) -> Result<(), Error> {
        if self.urls.len() >= MAX_DEPTH {
            return Err(Error::TooManyRedirects(url.to_string()));
        }
        self.urls.push(url.to_string());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.urls.pop();
    }
}

/// `href` of every anchor, in document order.
///
/// Relative links are resolved against `base`.
pub fn links(body: &[u8], base: &str) -> Vec<String> {
    let body = String::from_utf8_lossy(body);
    let html = Html::parse_document(&body);
    let base = Url::parse(base).ok();

    html.select(&ANCHORS)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| match base.as_ref().map(|base| base.join(href)) {
            Some(Ok(url)) => url.to_string(),
            _ => href.to_string(),
        })
        .collect()
}

/// Lazily fetch every link of a multiple choice page.
///
/// Links already on the resolution chain are skipped.
pub fn resolve<'a>(
    extractor: &'a Extractor,
    body: &[u8],
    base: &str,
    format: Format,
    lang: &'a str,
    chain: &'a mut Chain,
) -> impl Iterator<Item = Result<String, Error>> + 'a {
    links(body, base).into_iter().filter_map(move |url| {
        if chain.contains(&url) {
            warn!("{}: multiple choice loop, skipping", url);
            chain.skipped += 1;
            None
        } else {
            Some(extractor.fetch_raw(&url, format, lang, chain))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_in_order() {
        let body = br#"<html><body>
            <a href="http://publications.europa.eu/resource/cellar/1.0001.01/DOC_1">first</a>
            <a name="no-href">skip</a>
            <ul><li><a href="http://publications.europa.eu/resource/cellar/1.0001.01/DOC_2">second</a></li></ul>
            </body></html>"#;
        assert_eq!(
            links(body, "http://publications.europa.eu/resource/cellar/1"),
            vec![
                "http://publications.europa.eu/resource/cellar/1.0001.01/DOC_1",
                "http://publications.europa.eu/resource/cellar/1.0001.01/DOC_2",
            ]
        );
    }

    #[test]
    fn relative_links() {
        let body = br#"<a href="/resource/cellar/2">x</a><a href="DOC_3">y</a>"#;
        assert_eq!(
            links(body, "http://publications.europa.eu/resource/cellar/1"),
            vec![
                "http://publications.europa.eu/resource/cellar/2",
                "http://publications.europa.eu/resource/cellar/DOC_3",
            ]
        );
    }

    #[test]
    fn no_links() {
        assert!(links(b"<p>nothing</p>", "http://x").is_empty());
    }

    #[test]
    fn chain_depth() {
        let mut chain = Chain::default();
        for i in 0..MAX_DEPTH {
            chain.enter(&format!("http://x/{}", i)).unwrap();
        }
        assert_eq!(chain.depth(), MAX_DEPTH);
        assert!(chain.contains("http://x/0"));
        assert!(matches!(
            chain.enter("http://x/last"),
            Err(Error::TooManyRedirects(_))
        ));
        chain.leave();
        assert!(!chain.contains(&format!("http://x/{}", MAX_DEPTH - 1)));
        assert!(chain.enter("http://x/last").is_ok());
    }
}
