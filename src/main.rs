//! # cellar-corpus
//!
//! Collects the documents published in Cellar during the last `days` days.
//!
//! ```sh
//! cellar-corpus 0.1.0
//! Collect EU legal documents from Cellar into month-separated JSON lines files.
//!
//! USAGE:
//!     cellar-corpus [FLAGS] [OPTIONS] <days>
//! ```
//!
//! Logs are appended to `collect.log` (see `--log-file`), verbosity is set with `RUST_LOG`.
use std::fs::OpenOptions;

use cellar_corpus::context::Context;
use cellar_corpus::error::Error;
use cellar_corpus::extract::Extractor;
use cellar_corpus::pipelines::{Collect, FetchAll, Pipeline};
use cellar_corpus::sources::{Cellar, EuroVoc};
use env_logger::{Builder, Env, Target};
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    let opt = cli::Collect::from_args();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&opt.log_file)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .init();
    debug!("cli args\n{:#?}", opt);
    info!("cellar-corpus {}", Collect::version());

    let ctx = Context::new(&opt.cache)?;

    let mut cellar = Cellar::new(&ctx, &opt.sparql_endpoint);
    if opt.resolve_concepts {
        cellar = cellar.with_concept_ids(EuroVoc::new(&ctx, &opt.eurovoc_endpoint));
    }

    {
        let collect = Collect::new(
            cellar,
            Extractor::new(&ctx),
            FetchAll::new(opt.workers)?,
            opt.dst,
            opt.days,
            chrono::Local::now().date_naive(),
        );
        collect.run()?;
    }

    ctx.shutdown();
    Ok(())
}
