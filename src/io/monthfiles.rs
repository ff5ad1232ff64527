/*! Month-separated JSON lines writer.

Each month (`YYYY-MM`) is given a file `data_<YYYY-MM>.jsonl` in the destination folder.
Files are opened (and truncated) on first use during a run, then kept open until [MonthFiles::close].

Every record is flushed right away: a crash loses at most the record being written.
!*/
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::document::Document;
use crate::error::Error;

pub struct MonthFiles {
    dst: PathBuf,
    writers: HashMap<String, BufWriter<File>>,
}

impl MonthFiles {
    /// Create a new [MonthFiles], creating `dst` if needed.
    pub fn new(dst: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(dst)?;
        Ok(Self {
            dst: dst.to_path_buf(),
            writers: HashMap::new(),
        })
    }

    /// Path of the file holding `month`.
    pub fn path(&self, month: &str) -> PathBuf {
        self.dst.join(format!("data_{}.jsonl", month))
    }

    fn writer(&mut self, month: &str) -> Result<&mut BufWriter<File>, Error> {
        let path = self.path(month);
        match self.writers.entry(month.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                info!("Creating {:?}", path);
                let file = File::create(path)?;
                Ok(e.insert(BufWriter::new(file)))
            }
        }
    }

    /// Make sure the file of `month` is open.
    pub fn open(&mut self, month: &str) -> Result<(), Error> {
        self.writer(month).map(|_| ())
    }

    /// Append a document to the file of `month`.
    pub fn write(&mut self, month: &str, document: &Document) -> Result<(), Error> {
        let writer = self.writer(month)?;
        serde_json::to_writer(&mut *writer, document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and close every file.
    pub fn close(self) -> Result<(), Error> {
        for (month, mut writer) in self.writers {
            info!("Closing {}", month);
            writer.flush()?;
        }
        Ok(())
    }
}
