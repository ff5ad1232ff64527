//! Parallel body fetching.
//!
//! Documents of a day are dispatched on a fixed size [rayon::ThreadPool].
//! Each worker selects the extraction path of its document, fetches and normalizes the body,
//! then sends the document back through a channel as soon as it is done.
//!
//! Failures are isolated at document level:
//! - no known format: the document is kept, without text,
//! - non-success status ([Error::Fetch]): the document is kept, with an empty text,
//! - any other error: the document is dropped.
use std::sync::mpsc;

use log::{error, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::document::Document;
use crate::error::Error;
use crate::extract::{Extractor, Format};

/// Default number of concurrent downloads.
pub const DEFAULT_WORKERS: usize = 16;

/// Something that can provide the text of a document.
pub trait BodySource: Sync {
    fn body(&self, url: &str, format: Format, lang: &str) -> Result<String, Error>;
}

impl BodySource for Extractor {
    fn body(&self, url: &str, format: Format, lang: &str) -> Result<String, Error> {
        self.extract(url, format, lang)
    }
}

pub struct FetchAll {
    pool: ThreadPool,
}

impl FetchAll {
    pub fn new(workers: usize) -> Result<Self, Error> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("fetch-{}", idx))
            .panic_handler(|_| error!("fetch worker panicked"))
            .build()?;
        Ok(Self { pool })
    }

    /// Fetch the text of every document.
    ///
    /// Documents are yielded as they complete, so output order is not guaranteed to match input
    /// order. The iterator ends once every document has been processed or dropped.
    pub fn fetch_all<S>(&self, source: S, documents: Vec<Document>) -> mpsc::IntoIter<Document>
    where
        S: BodySource + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();

        self.pool.spawn(move || {
            documents
                .into_par_iter()
                .for_each_with(sender, |sender, mut document| {
                    match Self::text(&source, &document) {
                        Ok(Some(text)) => document.set_text(text),
                        Ok(None) => (),
                        Err(e) => {
                            error!("{:?} {:?}", e, document);
                            return;
                        }
                    }
                    // receiver gone: the caller stopped reading
                    let _ = sender.send(document);
                })
        });

        receiver.into_iter()
    }

    fn text<S: BodySource>(source: &S, document: &Document) -> Result<Option<String>, Error> {
        let format = match Format::select(document.formats()) {
            Some(format) => format,
            None => {
                warn!(
                    "could not find a parser for {:?} ({})",
                    document.formats(),
                    document.url()
                );
                return Ok(None);
            }
        };

        match source.body(document.url(), format, document.lang()) {
            Ok(text) => Ok(Some(text)),
            Err(Error::Fetch(e)) => {
                warn!(
                    "could not download {} as {}: {} {:?}",
                    e.url, format, e.status, e.body
                );
                Ok(Some(String::new()))
            }
            Err(e) => Err(e),
        }
    }
}
