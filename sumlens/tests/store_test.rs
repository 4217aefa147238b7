use sumlens::store::ArticleStore;

// Body long enough to survive any later summarization length checks.
const BODY: &str = "Rust is a systems programming language focused on safety, speed and \
    concurrency. It accomplishes these goals without a garbage collector, making it useful \
    for services and embedded targets alike.";

fn store_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("articles.json")
}

#[test]
fn seeds_three_articles_on_first_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = store_path(&dir);

    let store = ArticleStore::open(&path).expect("open fresh store");

    let ids: Vec<u64> = store.all().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(path.exists(), "seeding must persist the file immediately");

    // The persisted file is the documented JSON object shape
    let raw = std::fs::read_to_string(&path).expect("read seeded file");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(parsed["articles"].as_array().map(|a| a.len()), Some(3));
    assert_eq!(parsed["articles"][0]["id"], 1);
    assert_eq!(parsed["articles"][0]["category"], "Technology");
}

#[test]
fn add_assigns_monotonic_unique_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = ArticleStore::open(store_path(&dir)).expect("open");

    let mut ids: Vec<u64> = store.all().iter().map(|a| a.id).collect();
    for i in 0..5 {
        let max_before = ids.iter().copied().max().unwrap_or(0);
        let id = store
            .add(&format!("Title {}", i), BODY, "Testing")
            .expect("add article");
        assert_eq!(id, max_before + 1);
        ids.push(id);
    }

    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len(), "ids must be pairwise distinct");
}

#[test]
fn category_match_is_case_insensitive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = ArticleStore::open(store_path(&dir)).expect("open");
    store.add("Compilers", BODY, "technology").expect("add");

    let lower: Vec<u64> = store.by_category("technology").iter().map(|a| a.id).collect();
    let upper: Vec<u64> = store.by_category("Technology").iter().map(|a| a.id).collect();
    assert_eq!(lower, upper);
    assert_eq!(lower.len(), 2, "seed article plus the new one");

    assert!(store.by_category("NoSuchCategory").is_empty());
}

#[test]
fn add_then_get_round_trips_with_trimmed_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = ArticleStore::open(store_path(&dir)).expect("open");

    let padded = format!("\n   {}   \n\t", BODY);
    let id = store.add("Round Trip", &padded, "Testing").expect("add");

    let article = store.get(id).expect("article exists");
    assert_eq!(article.title, "Round Trip");
    assert_eq!(article.category, "Testing");
    assert_eq!(article.content, BODY, "content is stored trimmed");
}

#[test]
fn get_miss_returns_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ArticleStore::open(store_path(&dir)).expect("open");

    assert!(store.get(9999).is_none());
}

#[test]
fn added_article_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = store_path(&dir);

    let id = {
        let mut store = ArticleStore::open(&path).expect("open");
        store.add("Persisted", BODY, "Testing").expect("add")
    };

    let reopened = ArticleStore::open(&path).expect("reopen");
    let article = reopened.get(id).expect("article persisted");
    assert_eq!(article.title, "Persisted");
    assert_eq!(article.id, id);
    assert_eq!(reopened.all().len(), 4);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = store_path(&dir);
    std::fs::write(&path, "{ not json at all").expect("write garbage");

    let err = ArticleStore::open(&path).expect_err("corrupt file must fail");
    assert!(err.to_string().contains("malformed article store file"));
}

#[test]
fn non_ascii_content_round_trips_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = store_path(&dir);

    let body = format!("{} Überraschung — caffè, 記事の本文。", BODY);
    let id = {
        let mut store = ArticleStore::open(&path).expect("open");
        store.add("Unicode", &body, "Testing").expect("add")
    };

    // Characters are written verbatim, not \u-escaped
    let raw = std::fs::read_to_string(&path).expect("read file");
    assert!(raw.contains("記事の本文"));

    let reopened = ArticleStore::open(&path).expect("reopen");
    assert_eq!(reopened.get(id).expect("exists").content, body);
}

#[test]
fn stores_at_different_paths_do_not_interfere() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut a = ArticleStore::open(dir.path().join("a.json")).expect("open a");
    let b = ArticleStore::open(dir.path().join("b.json")).expect("open b");

    a.add("Only in A", BODY, "Testing").expect("add");
    assert_eq!(a.all().len(), 4);
    assert_eq!(b.all().len(), 3);
}
