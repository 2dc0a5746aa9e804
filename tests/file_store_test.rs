use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use storefront_search::cache::{FileStore, KeyValueStore, ResultCache};
use storefront_search::search::{ProductSummary, SearchHistory};

fn summary(id: u64, title: &str) -> ProductSummary {
    ProductSummary {
        id,
        title: title.to_string(),
        url: "#".to_string(),
        available: true,
        ..ProductSummary::default()
    }
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("store.json");

    {
        let store = FileStore::open(&path).expect("open");
        store.set("a", "1".to_string()).expect("set a");
        store.set("b", "2".to_string()).expect("set b");
        store.remove("a");
    }

    let reopened = FileStore::open(&path).expect("reopen");
    assert_eq!(reopened.get("a"), None);
    assert_eq!(reopened.get("b").as_deref(), Some("2"));
    assert_eq!(reopened.keys(), vec!["b".to_string()]);
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").expect("write");

    let store = FileStore::open(&path).expect("open");
    assert!(store.keys().is_empty());

    store.set("k", "v".to_string()).expect("set");
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("\"k\""));
}

#[test]
fn test_result_cache_persists_across_instances() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("store.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).expect("open"));
        let cache = ResultCache::new(store, 2);
        assert!(cache.put("boots", &[summary(1, "Boots")], Duration::from_secs(300)));
        assert!(cache.put("hats", &[summary(2, "Hat")], Duration::from_secs(300)));
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).expect("reopen"));
    let cache = ResultCache::new(store.clone(), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("Boots").expect("cached")[0].title, "Boots");

    // Adopted entries still count against the bound; "hats" is now oldest
    assert!(cache.put("socks", &[summary(3, "Socks")], Duration::from_secs(300)));
    assert_eq!(cache.len(), 2);
    assert!(cache.get("hats").is_none());
    assert!(cache.get("boots").is_some());
}

#[test]
fn test_history_persists_in_file_store() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("store.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).expect("open"));
        let history = SearchHistory::new(store, 3);
        for query in ["shoes", "hats", "socks", "belts"] {
            history.record(query);
        }
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).expect("reopen"));
    let history = SearchHistory::new(store, 3);
    assert_eq!(history.recent(), vec!["belts", "socks", "hats"]);
}
