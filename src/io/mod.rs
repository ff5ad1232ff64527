/*!
# IO utilities

Corpus saving and loading.

Documents are saved in month-separated JSON lines files by [MonthFiles],
and can be read back as training examples by [reader::CorpusReader].
!*/
mod monthfiles;
pub mod reader;
pub use monthfiles::MonthFiles;
