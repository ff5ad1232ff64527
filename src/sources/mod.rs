/*! Metadata sources.

- [cellar]: documents of a given day, from the Cellar SPARQL endpoint,
- [eurovoc]: the EuroVoc thesaurus, used to map subject labels to concept ids.
!*/
pub mod cellar;
pub mod eurovoc;

pub use cellar::Cellar;
pub use eurovoc::{EuroVoc, EuroVocTermMap};
