//! Blocking HTTP access to Cellar.
//!
//! Every request carries the same browser user agent, Cellar refuses some default ones.
use bytes::Bytes;
use log::debug;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::StatusCode;

use crate::error::Error;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Status and full body of a response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Wraps a [reqwest::blocking::Client].
///
/// Redirections are left to reqwest, `300 Multiple Choices` is returned as is.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Content-negotiated GET.
    pub fn get(&self, url: &str, accept: &str, language: &str) -> Result<Response, Error> {
        debug!("GET {} ({}, {})", url, accept, language);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(ACCEPT_LANGUAGE, language)
            .send()?;
        let status = response.status();
        let body = response.bytes()?;
        Ok(Response::new(status, body))
    }

    /// GET with query parameters.
    pub fn get_query(&self, url: &str, params: &[(&str, &str)]) -> Result<Response, Error> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(params).send()?;
        let status = response.status();
        let body = response.bytes()?;
        Ok(Response::new(status, body))
    }
}
