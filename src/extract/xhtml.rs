//! XHTML text extraction.
use scraper::Html;

/// Strip every tag, keeping text nodes in document order.
pub fn extract(body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    let html = Html::parse_document(&body);
    html.root_element().text().collect()
}
