//! Process-wide resources.
use std::path::Path;

use log::info;

use crate::cache::Cache;
use crate::error::Error;
use crate::http::HttpClient;

/// Built once at startup and lent to every component needing HTTP or caching.
#[derive(Debug, Clone)]
pub struct Context {
    client: HttpClient,
    cache: Cache,
}

impl Context {
    pub fn new(cache_dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            client: HttpClient::new()?,
            cache: Cache::new(cache_dir)?,
        })
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Flush the logger. Called once every pipeline is done.
    pub fn shutdown(self) {
        info!("shutting down, cache at {:?}", self.cache.root());
        log::logger().flush();
    }
}
