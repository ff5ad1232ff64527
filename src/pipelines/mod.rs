//! Pipelines.
//!
//! The [collect::Collect] pipeline builds the corpus, using [fetch::FetchAll] to process a day's
//! documents in parallel.
//! The module also provides a light [pipeline::Pipeline] trait.
pub mod collect;
pub mod fetch;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use collect::Collect;
pub use fetch::{BodySource, FetchAll, DEFAULT_WORKERS};
pub use pipeline::Pipeline;
