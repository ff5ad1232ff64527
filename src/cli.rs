//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cellar-corpus",
    about = "Collect EU legal documents from Cellar into month-separated JSON lines files."
)]
pub struct Collect {
    #[structopt(help = "number of days to collect, going back from today")]
    pub days: u32,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        help = "corpus destination",
        default_value = "data"
    )]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "cache",
        help = "cache location",
        default_value = "cache"
    )]
    pub cache: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "log-file",
        help = "log file, appended to",
        default_value = "collect.log"
    )]
    pub log_file: PathBuf,
    #[structopt(
        short = "t",
        long = "workers",
        help = "number of concurrent downloads",
        default_value = "16"
    )]
    pub workers: usize,
    #[structopt(
        long = "sparql-endpoint",
        default_value = "https://publications.europa.eu/webapi/rdf/sparql"
    )]
    pub sparql_endpoint: String,
    #[structopt(
        long = "eurovoc-endpoint",
        default_value = "http://publications.europa.eu/resource/dataset/eurovoc"
    )]
    pub eurovoc_endpoint: String,
    #[structopt(
        long = "resolve-concepts",
        help = "replace subject labels by EuroVoc concept ids"
    )]
    pub resolve_concepts: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opt = Collect::from_iter_safe(["cellar-corpus", "3"]).unwrap();
        assert_eq!(opt.days, 3);
        assert_eq!(opt.dst, PathBuf::from("data"));
        assert_eq!(opt.cache, PathBuf::from("cache"));
        assert_eq!(opt.log_file, PathBuf::from("collect.log"));
        assert_eq!(opt.workers, 16);
        assert_eq!(
            opt.sparql_endpoint,
            cellar_corpus::sources::cellar::SPARQL_ENDPOINT
        );
        assert_eq!(
            opt.eurovoc_endpoint,
            cellar_corpus::sources::eurovoc::EUROVOC_ENDPOINT
        );
        assert!(!opt.resolve_concepts);
    }

    #[test]
    fn flags() {
        let opt = Collect::from_iter_safe([
            "cellar-corpus",
            "-t",
            "4",
            "--dst",
            "out",
            "--resolve-concepts",
            "1",
        ])
        .unwrap();
        assert_eq!(opt.days, 1);
        assert_eq!(opt.workers, 4);
        assert_eq!(opt.dst, PathBuf::from("out"));
        assert!(opt.resolve_concepts);
    }

    #[test]
    fn days_required() {
        assert!(Collect::from_iter_safe(["cellar-corpus"]).is_err());
        assert!(Collect::from_iter_safe(["cellar-corpus", "-1"]).is_err());
    }
}
