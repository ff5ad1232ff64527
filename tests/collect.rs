use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cellar_corpus::context::Context;
use cellar_corpus::extract::Extractor;
use cellar_corpus::pipelines::{Collect, FetchAll, Pipeline};
use cellar_corpus::sources::Cellar;
use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tempfile::tempdir;

fn row(url: &str, mtypes: &str) -> Value {
    json!({
        "subjects": {"type": "literal", "value": "fisheries"},
        "cellarURIs": {"type": "uri", "value": url},
        "title": {"type": "literal", "value": "Council Decision"},
        "date": {"type": "typed-literal", "value": "2024-06-02"},
        "langIdentifier": {"type": "literal", "value": "EN"},
        "mtypes": {"type": "literal", "value": mtypes}
    })
}

fn results(rows: Vec<Value>) -> String {
    json!({"head": {"vars": []}, "results": {"bindings": rows}}).to_string()
}

fn lines(path: &Path) -> Vec<Value> {
    BufReader::new(File::open(path).unwrap())
        .lines()
        .map(|l| serde_json::from_str(&l.unwrap()).unwrap())
        .collect()
}

fn run(server: &Server, cache: &Path, dst: &Path, days: u32) {
    let ctx = Context::new(cache).unwrap();
    let collect = Collect::new(
        Cellar::new(&ctx, &format!("{}/sparql", server.url())),
        Extractor::new(&ctx),
        FetchAll::new(4).unwrap(),
        dst.to_path_buf(),
        days,
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    );
    collect.run().unwrap();
}

#[test_log::test]
fn failing_day_is_skipped() {
    let mut server = Server::new();
    let doc_url = format!("{}/doc/1", server.url());

    // window of 2024-06-03 ends on 2024-06-05
    let failing = server
        .mock("GET", "/sparql")
        .match_query(Matcher::Regex("2024-06-05".to_string()))
        .with_status(500)
        .create();
    let ok = server
        .mock("GET", "/sparql")
        .match_query(Matcher::Regex("2024-06-02".to_string()))
        .with_body(results(vec![row(&doc_url, "xhtml")]))
        .create();
    let doc = server
        .mock("GET", "/doc/1")
        .with_body("<html><body><p>Hello  world .</p></body></html>")
        .create();

    let dir = tempdir().unwrap();
    let dst = dir.path().join("data");
    run(&server, &dir.path().join("cache"), &dst, 2);

    failing.assert();
    ok.assert();
    doc.assert();

    let records = lines(&dst.join("data_2024-06.jsonl"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["url"], doc_url.as_str());
    assert_eq!(records[0]["text"], "Hello world.");
    assert_eq!(records[0]["date"], "2024-06-02");
    assert_eq!(records[0]["eurovoc_concepts"], json!(["fisheries"]));
}

#[test_log::test]
fn day_documents() {
    let mut server = Server::new();
    let base = server.url();

    let _sparql = server
        .mock("GET", "/sparql")
        .match_query(Matcher::Any)
        .with_body(results(vec![
            row(&format!("{}/doc/html", base), "xhtml"),
            row(&format!("{}/doc/fmx", base), "fmx4"),
            row(&format!("{}/doc/gone", base), "pdf,fmx4"),
            row(&format!("{}/doc/choice", base), "xhtml"),
            json!({"title": {"value": "incomplete row"}}),
        ]))
        .create();
    let _html = server
        .mock("GET", "/doc/html")
        .match_header("accept", "application/xhtml+xml")
        .match_header("accept-language", "en")
        .with_body("<html><body><p>Article 1 .</p></body></html>")
        .create();
    let _gone = server.mock("GET", "/doc/gone").with_status(404).create();
    let _choice = server
        .mock("GET", "/doc/choice")
        .with_status(300)
        .with_body(r#"<html><body><a href="/doc/html">1</a><a href="/doc/html2">2</a></body></html>"#)
        .create();
    let _html2 = server
        .mock("GET", "/doc/html2")
        .with_body("<html><body><p>Article 2.</p></body></html>")
        .create();

    let dir = tempdir().unwrap();
    let dst = dir.path().join("data");
    run(&server, &dir.path().join("cache"), &dst, 1);

    let mut records = lines(&dst.join("data_2024-06.jsonl"));
    records.sort_by_key(|r| r["url"].as_str().unwrap().to_string());
    assert_eq!(records.len(), 4);

    let by_suffix = |suffix: &str| {
        records
            .iter()
            .find(|r| r["url"].as_str().unwrap().ends_with(suffix))
            .unwrap()
    };
    assert_eq!(by_suffix("/doc/html")["text"], "Article 1.");
    assert!(by_suffix("/doc/fmx").get("text").is_none());
    assert_eq!(by_suffix("/doc/gone")["text"], "");
    assert_eq!(by_suffix("/doc/choice")["text"], "Article 1. Article 2.");
}

#[test]
fn month_file_is_truncated() {
    let mut server = Server::new();
    let _sparql = server
        .mock("GET", "/sparql")
        .match_query(Matcher::Any)
        .with_body(results(vec![row("http://localhost/doc", "fmx4")]))
        .create();

    let dir = tempdir().unwrap();
    let dst = dir.path().join("data");
    std::fs::create_dir_all(&dst).unwrap();
    std::fs::write(dst.join("data_2024-06.jsonl"), "stale\n").unwrap();

    run(&server, &dir.path().join("cache"), &dst, 2);
    let records = lines(&dst.join("data_2024-06.jsonl"));
    assert_eq!(records.len(), 2);
}
