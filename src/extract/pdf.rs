//! PDF text extraction.
use std::panic;

use crate::error::Error;

/// Extract the text layer of a PDF, following its layout.
///
/// The PDF decoder panics on some malformed files, panics are turned into [Error::Pdf].
pub fn extract(body: &[u8]) -> Result<String, Error> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(body)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Pdf(format!("{:?}", e))),
        Err(_) => Err(Error::Pdf("decoder panicked".to_string())),
    }
}
