/*! Document body extraction.

Bodies are fetched with content negotiation (`Accept`/`Accept-Language`) and decoded according to
the requested [Format]:

- `200`: the body is decoded,
- `300`: the body is a list of links, each one being extracted in turn (see [resolver]),
- anything else: [crate::error::FetchError].

Raw extracted text is memoized in the [crate::cache::BODIES] namespace,
and normalized (see [crate::normalize]) on the way out.
!*/
mod format;
mod pdf;
pub mod resolver;
mod word;
mod xhtml;

use log::{debug, warn};
use reqwest::StatusCode;

pub use format::Format;
use resolver::Chain;

use crate::cache::BODIES;
use crate::context::Context;
use crate::error::{Error, FetchError};
use crate::normalize::normalize;

/// Fetches, decodes and normalizes document bodies.
///
/// Owns a handle on the [Context], and can be sent to worker threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    ctx: Context,
}

impl Extractor {
    pub fn new(ctx: &Context) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Extract the normalized text of the document at `url`.
    pub fn extract(&self, url: &str, format: Format, lang: &str) -> Result<String, Error> {
        let mut chain = Chain::default();
        let raw = self.fetch_raw(url, format, lang, &mut chain)?;
        Ok(normalize(&raw))
    }

    /// Memoized raw text of the document at `url`.
    ///
    /// Texts missing a link skipped by loop detection are not stored: fetched on their own, they
    /// would include it.
    pub(crate) fn fetch_raw(
        &self,
        url: &str,
        format: Format,
        lang: &str,
        chain: &mut Chain,
    ) -> Result<String, Error> {
        let cache = self.ctx.cache();
        let args = [format.tag(), url, lang];
        if let Some(text) = cache.get(&BODIES, "fetch_raw", &args) {
            debug!("cache hit {}", url);
            return Ok(text);
        }

        chain.enter(url)?;
        let skipped = chain.skipped();
        let text = self.download(url, format, lang, chain);
        let complete = chain.skipped() == skipped;
        chain.leave();
        let text = text?;

        if !complete {
            debug!("{}: resolved inside a loop, not cached", url);
        } else if let Err(e) = cache.insert(&BODIES, "fetch_raw", &args, &text) {
            warn!("could not store {} in cache: {:?}", url, e);
        }
        Ok(text)
    }

    fn download(
        &self,
        url: &str,
        format: Format,
        lang: &str,
        chain: &mut Chain,
    ) -> Result<String, Error> {
        let response = self.ctx.client().get(url, format.accept(), lang)?;
        match response.status() {
            StatusCode::OK => {
                debug!("{}: decoding {} bytes as {}", url, response.body().len(), format);
                format.decode(response.body())
            }
            StatusCode::MULTIPLE_CHOICES => {
                debug!("{}: multiple choices (depth {})", url, chain.depth());
                let texts: Vec<String> =
                    resolver::resolve(self, response.body(), url, format, lang, chain)
                        .collect::<Result<_, _>>()?;
                Ok(texts.join(" "))
            }
            status => Err(FetchError::new(url, status, response.body()).into()),
        }
    }
}
