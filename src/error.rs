//! Error enum
use reqwest::StatusCode;

/// Non-success HTTP status on a document or metadata fetch.
#[derive(Debug)]
pub struct FetchError {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl FetchError {
    pub fn new(url: &str, status: StatusCode, body: &[u8]) -> Self {
        Self {
            url: url.to_string(),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[derive(Debug)]
#[allow(dead_code)]
pub enum Error {
    Io(std::io::Error),
    Http(reqwest::Error),
    Fetch(FetchError),
    Serde(serde_json::Error),
    Xml(quick_xml::Error),
    Zip(zip::result::ZipError),
    Pdf(String),
    Decode(String),
    TooManyRedirects(String),
    ThreadPool(rayon::ThreadPoolBuildError),
    GlobPattern(glob::PatternError),
    Glob(glob::GlobError),
    Custom(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Error {
        Error::Fetch(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Error {
        Error::Xml(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Error {
        Error::Zip(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Error {
        Error::ThreadPool(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}
