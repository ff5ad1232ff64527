/*! On-disk memoization of expensive calls.

Each entry is keyed by a SHA-256 digest of its namespace, the identity of the memoized
function and its arguments, and is stored as a JSON file under `root/<namespace>/`.

Namespaces carry their own [Expiry]: extracted bodies are kept forever while the EuroVoc
term map is refreshed every 120 minutes.

Entries are written to a temporary file in the namespace directory and then renamed over their
final path, so concurrent workers writing distinct keys never see partial entries.
Two workers racing on the same key both compute the value and the last rename wins.
!*/
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::Error;

/// Expiration policy of a [Namespace].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Never,
    After(Duration),
}

/// Group of entries sharing an expiration policy.
#[derive(Debug, Clone, Copy)]
pub struct Namespace {
    name: &'static str,
    expiry: Expiry,
}

impl Namespace {
    pub const fn new(name: &'static str, expiry: Expiry) -> Self {
        Self { name, expiry }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }
}

/// Extracted document bodies.
pub const BODIES: Namespace = Namespace::new("bodies", Expiry::Never);

/// EuroVoc term maps.
pub const EUROVOC: Namespace =
    Namespace::new("eurovoc", Expiry::After(Duration::from_secs(120 * 60)));

#[derive(Serialize, Deserialize)]
struct Entry<T> {
    created: DateTime<Utc>,
    function: String,
    args: Vec<String>,
    value: T,
}

impl<T> Entry<T> {
    fn is_expired(&self, expiry: Expiry) -> bool {
        match expiry {
            Expiry::Never => false,
            Expiry::After(ttl) => match (Utc::now() - self.created).to_std() {
                Ok(age) => age >= ttl,
                // created in the future: clock went backwards
                Err(_) => true,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Open (and create if needed) a cache rooted at `root`.
    pub fn new(root: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic key of a call.
    pub fn key(namespace: &Namespace, function: &str, args: &[&str]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(namespace.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(function.as_bytes());
        for arg in args {
            hasher.update(b"\0");
            hasher.update(arg.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    fn path(&self, namespace: &Namespace, key: &str) -> PathBuf {
        let mut path = self.root.join(namespace.name);
        path.push(format!("{}.json", key));
        path
    }

    /// Get a live entry.
    ///
    /// Expired and unreadable entries are treated as missing.
    pub fn get<T: DeserializeOwned>(
        &self,
        namespace: &Namespace,
        function: &str,
        args: &[&str],
    ) -> Option<T> {
        let path = self.path(namespace, &Self::key(namespace, function, args));
        let file = File::open(&path).ok()?;
        match serde_json::from_reader::<_, Entry<T>>(BufReader::new(file)) {
            Ok(entry) if entry.is_expired(namespace.expiry) => {
                debug!("{:?}: expired", path);
                None
            }
            Ok(entry) => Some(entry.value),
            Err(e) => {
                warn!("could not read cache entry {:?}: {:?}", path, e);
                None
            }
        }
    }

    /// Store a value, replacing any previous entry.
    pub fn insert<T: Serialize>(
        &self,
        namespace: &Namespace,
        function: &str,
        args: &[&str],
        value: &T,
    ) -> Result<(), Error> {
        let path = self.path(namespace, &Self::key(namespace, function, args));
        let dir = self.root.join(namespace.name);
        std::fs::create_dir_all(&dir)?;

        let entry = Entry {
            created: Utc::now(),
            function: function.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            value,
        };

        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, &entry)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Memoize `f`: return the live entry for `(function, args)` if any, otherwise compute,
    /// store and return it.
    ///
    /// Errors from `f` are returned and never stored.
    pub fn get_or_insert_with<T, F>(
        &self,
        namespace: &Namespace,
        function: &str,
        args: &[&str],
        f: F,
    ) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, Error>,
    {
        if let Some(value) = self.get(namespace, function, args) {
            debug!("cache hit {}{:?}", function, args);
            return Ok(value);
        }

        let value = f()?;
        if let Err(e) = self.insert(namespace, function, args, &value) {
            warn!("could not store {}{:?} in cache: {:?}", function, args, e);
        }
        Ok(value)
    }

    /// Remove a single entry. Returns whether an entry was removed.
    pub fn invalidate(
        &self,
        namespace: &Namespace,
        function: &str,
        args: &[&str],
    ) -> Result<bool, Error> {
        let path = self.path(namespace, &Self::key(namespace, function, args));
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every entry of a namespace.
    pub fn clear(&self, namespace: &Namespace) -> Result<(), Error> {
        let dir = self.root.join(namespace.name);
        if dir.exists() {
            std::fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
