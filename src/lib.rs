/*! # cellar-corpus

Builds a multilingual corpus of EU legal documents from the Publications Office's Cellar repository.

Documents of each day are listed through the Cellar SPARQL endpoint ([sources::Cellar]),
their bodies are fetched and turned into plain text ([extract::Extractor], [normalize]),
and records are written in month-separated JSON lines files ([io::MonthFiles]).

The [pipelines::Collect] pipeline glues everything together.
!*/
pub mod cache;
pub mod context;
pub mod document;
pub mod error;
pub mod extract;
pub mod http;
pub mod io;
pub mod normalize;
pub mod pipelines;
pub mod sources;
