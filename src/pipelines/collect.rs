//! Daily collection pipeline.
//!
//! Walks back day by day from `today`, and for each day:
//! 1. lists the documents of the day from Cellar,
//! 2. fetches their bodies in parallel (see [super::FetchAll]),
//! 3. appends them to the file of the day's month.
//!
//! A failing day is logged and skipped.
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use log::{error, info};

use crate::document::Document;
use crate::error::Error;
use crate::extract::{Extractor, Format};
use crate::io::MonthFiles;
use crate::pipelines::fetch::FetchAll;
use crate::pipelines::pipeline::Pipeline;
use crate::sources::Cellar;

pub struct Collect<'a> {
    cellar: Cellar<'a>,
    extractor: Extractor,
    fetch: FetchAll,
    dst: PathBuf,
    days: u32,
    today: NaiveDate,
}

impl<'a> Collect<'a> {
    pub fn new(
        cellar: Cellar<'a>,
        extractor: Extractor,
        fetch: FetchAll,
        dst: PathBuf,
        days: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            cellar,
            extractor,
            fetch,
            dst,
            days,
            today,
        }
    }

    /// Days to process, most recent first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days).map(move |i| self.today - Duration::days(i64::from(i)))
    }

    /// Collect the documents of `day`, returning the number of written records.
    fn process_day(&self, files: &mut MonthFiles, day: NaiveDate) -> Result<usize, Error> {
        let month = day.format("%Y-%m").to_string();
        files.open(&month)?;

        let documents: Vec<Document> = self.cellar.documents(day)?.collect();
        println!("Processing documents ... {}", documents.len());
        info!(
            "{}: {} documents {:?}",
            day,
            documents.len(),
            documents
                .iter()
                .map(|d| Format::select(d.formats()).map_or("none", |f| f.tag()))
                .counts()
        );

        let mut written = 0;
        for document in self.fetch.fetch_all(self.extractor.clone(), documents) {
            files.write(&month, &document)?;
            written += 1;
        }
        Ok(written)
    }
}

impl Pipeline<()> for Collect<'_> {
    fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn run(&self) -> Result<(), Error> {
        let mut files = MonthFiles::new(&self.dst)?;

        for day in self.days() {
            println!("{}", day);
            match self.process_day(&mut files, day) {
                Ok(written) => info!("{}: wrote {} documents", day, written),
                Err(e) => error!("Day {} {:?}", day, e),
            }
        }

        files.close()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::context::Context;

    #[test]
    fn days_go_backwards() {
        let dir = tempdir().unwrap();
        let ctx = Context::new(dir.path()).unwrap();
        let collect = Collect::new(
            Cellar::new(&ctx, "http://localhost/sparql"),
            Extractor::new(&ctx),
            FetchAll::new(1).unwrap(),
            dir.path().join("data"),
            3,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let days: Vec<String> = collect.days().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-03-01", "2024-02-29", "2024-02-28"]);
    }

    #[test]
    fn no_days() {
        let dir = tempdir().unwrap();
        let ctx = Context::new(dir.path()).unwrap();
        let dst = dir.path().join("data");
        let collect = Collect::new(
            Cellar::new(&ctx, "http://localhost/sparql"),
            Extractor::new(&ctx),
            FetchAll::new(1).unwrap(),
            dst.clone(),
            0,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        collect.run().unwrap();
        assert!(dst.is_dir());
        assert_eq!(std::fs::read_dir(&dst).unwrap().count(), 0);
    }
}
