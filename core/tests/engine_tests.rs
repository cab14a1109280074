use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tinysearch::{
    DocumentId, DocumentStore, Engine, EngineConfig, MemoryDocumentStore, Searcher, SledDocumentStore,
    TinysearchError,
};

const DOCS: &[(&str, &str)] = &[
    ("test1", "Do you quarrel, sir?"),
    ("test2", "No better."),
    ("test3", "Quarrel sir! no, sir!"),
];

fn build_engine(index_dir: &Path) -> Engine<MemoryDocumentStore> {
    let mut engine = Engine::new(EngineConfig::new(index_dir), MemoryDocumentStore::new());
    for (title, body) in DOCS {
        engine.add_document(title, body.as_bytes()).unwrap();
    }
    engine.flush().unwrap();
    engine
}

#[test]
fn flush_writes_one_file_per_term() {
    let dir = tempdir().unwrap();
    build_engine(dir.path());

    let cases = [
        ("_0.dc", "3"),
        ("better", r#"[{"DocID":2,"Positions":[1],"TermFrequency":1}]"#),
        ("no", r#"[{"DocID":2,"Positions":[0],"TermFrequency":1},{"DocID":3,"Positions":[2],"TermFrequency":1}]"#),
        ("do", r#"[{"DocID":1,"Positions":[0],"TermFrequency":1}]"#),
        ("quarrel", r#"[{"DocID":1,"Positions":[2],"TermFrequency":1},{"DocID":3,"Positions":[0],"TermFrequency":1}]"#),
        ("sir", r#"[{"DocID":1,"Positions":[3],"TermFrequency":1},{"DocID":3,"Positions":[1,3],"TermFrequency":2}]"#),
        ("you", r#"[{"DocID":1,"Positions":[1],"TermFrequency":1}]"#),
    ];
    for (file, want) in cases {
        let got = fs::read_to_string(dir.path().join(file)).unwrap();
        assert_eq!(got, want, "contents of {file}");
    }
}

#[test]
fn search_ranks_by_tf_idf() {
    let dir = tempdir().unwrap();
    let engine = build_engine(dir.path());

    let results = engine.search("Quarrel, sir.", 5).unwrap();
    assert_eq!(results.total_hits, 2);
    let got: Vec<(u64, &str)> = results.hits.iter().map(|h| (h.doc_id, h.title.as_str())).collect();
    assert_eq!(got, vec![(3, "test3"), (1, "test1")]);
    assert!((results.hits[0].score - 1.754887502163469).abs() < 1e-12);
    assert!((results.hits[1].score - 1.1699250014423126).abs() < 1e-12);
}

#[test]
fn search_truncates_to_k_but_counts_all_hits() {
    let dir = tempdir().unwrap();
    let engine = build_engine(dir.path());

    let results = engine.search("sir", 1).unwrap();
    assert_eq!(results.total_hits, 2);
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].doc_id, 3);
}

#[test]
fn absent_term_means_no_results() {
    let dir = tempdir().unwrap();
    let engine = build_engine(dir.path());

    let results = engine.search("quarrel dragon", 5).unwrap();
    assert_eq!(results.total_hits, 0);
    assert!(results.hits.is_empty());

    let top = Searcher::new(dir.path()).search_top_k(&["zzz".to_string()], 5).unwrap();
    assert_eq!(top.total_hits, 0);
    assert!(top.scored_docs.is_empty());
}

#[test]
fn equal_scores_order_by_doc_id() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::new(EngineConfig::new(dir.path()), MemoryDocumentStore::new());
    for body in ["apple pie", "pear", "apple tart", "apple crumble"] {
        engine.add_document(body, body.as_bytes()).unwrap();
    }
    engine.flush().unwrap();

    let results = engine.search("apple", 10).unwrap();
    let ids: Vec<u64> = results.hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn missing_doc_count_fails_the_query() {
    let dir = tempdir().unwrap();
    let engine = build_engine(dir.path());
    fs::remove_file(dir.path().join("_0.dc")).unwrap();

    let err = engine.search("sir", 5).unwrap_err();
    assert!(matches!(err, TinysearchError::DocCount { .. }));
}

#[test]
fn corrupt_term_file_fails_the_query() {
    let dir = tempdir().unwrap();
    let engine = build_engine(dir.path());
    fs::write(dir.path().join("sir"), "not json").unwrap();

    let err = engine.search("quarrel sir", 5).unwrap_err();
    assert!(matches!(err, TinysearchError::CorruptPostings { .. }));
}

#[test]
fn sled_store_backs_titles() {
    let dir = tempdir().unwrap();
    let config = EngineConfig::new(dir.path().join("index"));
    let store = SledDocumentStore::open(&config.doc_store_dir).unwrap();
    let mut engine = Engine::new(config, store);
    for (title, body) in DOCS {
        engine.add_document(title, body.as_bytes()).unwrap();
    }
    engine.flush().unwrap();

    let results = engine.search("better", 5).unwrap();
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].title, "test2");
}

/// Hands out ids but has lost every title.
struct AmnesiacStore {
    inner: MemoryDocumentStore,
}

impl DocumentStore for AmnesiacStore {
    fn save(&self, title: &str) -> tinysearch::Result<DocumentId> {
        self.inner.save(title)
    }

    fn fetch_title(&self, doc_id: DocumentId) -> tinysearch::Result<String> {
        Err(TinysearchError::DocumentNotFound(doc_id))
    }
}

#[test]
fn missing_title_fails_the_search() {
    let dir = tempdir().unwrap();
    let store = AmnesiacStore { inner: MemoryDocumentStore::new() };
    let mut engine = Engine::new(EngineConfig::new(dir.path()), store);
    for (title, body) in DOCS {
        engine.add_document(title, body.as_bytes()).unwrap();
    }
    engine.flush().unwrap();

    let err = engine.search("sir", 5).unwrap_err();
    assert!(matches!(err, TinysearchError::DocumentNotFound(3)));

    // a query with no matches never asks for a title
    let results = engine.search("dragon", 5).unwrap();
    assert_eq!(results.total_hits, 0);
}
