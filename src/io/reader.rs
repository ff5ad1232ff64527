/*! Corpus reader

Reads generated `data_*.jsonl` files back as training examples:
the title and text of each document are concatenated, and kept alongside its EuroVoc concepts.
Documents without text (no known format) are skipped, as are near-empty lines.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lines shorter than this are skipped.
const MIN_LINE_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub eurovoc_concepts: Vec<String>,
}

/// Subset of a corpus line needed to build a [TrainingExample].
#[derive(Deserialize)]
struct Line {
    title: String,
    text: Option<String>,
    #[serde(default)]
    eurovoc_concepts: Vec<String>,
}

pub struct CorpusReader<R> {
    lines: Lines<R>,
}

impl CorpusReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        debug!("reading {:?}", path);
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }

    /// Read every `data_*.jsonl` file of `dir`, in file name (i.e. month) order.
    pub fn from_dir(
        dir: &Path,
    ) -> Result<impl Iterator<Item = Result<TrainingExample, Error>>, Error> {
        let pattern = dir.join("data_*.jsonl");
        let mut paths = glob::glob(&pattern.to_string_lossy())?
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        let readers = paths
            .iter()
            .map(|path| Self::open(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(readers.into_iter().flatten())
    }
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<TrainingExample, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.len() < MIN_LINE_LENGTH {
                continue;
            }

            let line: Line = match serde_json::from_str(&line) {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };

            if let Some(text) = line.text {
                return Some(Ok(TrainingExample {
                    text: line.title + &text,
                    eurovoc_concepts: line.eurovoc_concepts,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::tempdir;

    use super::*;

    const CORPUS: &str = r#"{"url":"1","title":"Title one. ","date":"2024-06-03","lang":"en","formats":["pdf"],"eurovoc_concepts":["fisheries"],"text":"Body one."}

{}
{"url":"2","title":"No text","date":"2024-06-03","lang":"en","formats":["unknown"],"eurovoc_concepts":[]}
{"url":"3","title":"Title three. ","date":"2024-06-02","lang":"en","formats":["xhtml"],"eurovoc_concepts":["energy","transport"],"text":""}
"#;

    #[test]
    fn read() {
        let examples: Vec<TrainingExample> = CorpusReader::new(Cursor::new(CORPUS))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            examples,
            vec![
                TrainingExample {
                    text: "Title one. Body one.".to_string(),
                    eurovoc_concepts: vec!["fisheries".to_string()],
                },
                TrainingExample {
                    text: "Title three. ".to_string(),
                    eurovoc_concepts: vec!["energy".to_string(), "transport".to_string()],
                },
            ]
        );
    }

    #[test]
    fn invalid_line() {
        let mut reader = CorpusReader::new(Cursor::new("this is not json at all\n"));
        assert!(matches!(reader.next(), Some(Err(Error::Serde(_)))));
    }

    #[test]
    fn min_line_length() {
        // 9 bytes: skipped
        assert!(CorpusReader::new(Cursor::new("{\"a\":\"b\"}\n")).next().is_none());
        // 10 bytes: read
        let mut reader = CorpusReader::new(Cursor::new("{\"a\":\"bc\"}\n"));
        assert!(matches!(reader.next(), Some(Err(Error::Serde(_)))));
    }

    #[test]
    fn from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("data_2024-06.jsonl"), CORPUS).unwrap();
        std::fs::write(
            dir.path().join("data_2024-05.jsonl"),
            r#"{"title":"May. ","text":"Earlier.","eurovoc_concepts":[]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("other.jsonl"), CORPUS).unwrap();

        let examples: Vec<TrainingExample> = CorpusReader::from_dir(dir.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].text, "May. Earlier.");
    }
}
