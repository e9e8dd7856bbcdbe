use std::{
  path::{Path, PathBuf},
  sync::{Arc, LazyLock, Mutex, MutexGuard},
  time::SystemTime,
};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::generator::document::Document;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

static GLOBAL_CACHE: LazyLock<SpecCache> = LazyLock::new(|| SpecCache::new(DEFAULT_CACHE_CAPACITY));

/// Identity of one version of an input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub path: PathBuf,
  pub modified: Option<SystemTime>,
  pub content_hash: blake3::Hash,
}

impl CacheKey {
  pub fn new(path: &Path, modified: Option<SystemTime>, content: &[u8]) -> Self {
    Self {
      path: path.to_path_buf(),
      modified,
      content_hash: blake3::hash(content),
    }
  }
}

/// Bounded least-recently-used map from input files to parsed documents.
///
/// Entries are kept in recency order: the front is evicted first, every hit
/// moves its entry to the back.
#[derive(Debug)]
pub struct SpecCache {
  capacity: usize,
  entries: Mutex<IndexMap<CacheKey, Arc<Document>>>,
}

impl SpecCache {
  /// A capacity of zero is raised to one.
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      capacity,
      entries: Mutex::new(IndexMap::with_capacity(capacity)),
    }
  }

  /// The process-wide cache shared by every loader.
  pub fn global() -> &'static SpecCache {
    &GLOBAL_CACHE
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn get(&self, key: &CacheKey) -> Option<Arc<Document>> {
    let mut entries = self.lock();
    let index = entries.get_index_of(key)?;
    let last = entries.len() - 1;
    entries.move_index(index, last);
    debug!(path = %key.path.display(), "spec cache hit");
    entries.get_index(last).map(|(_, document)| Arc::clone(document))
  }

  pub fn set(&self, key: CacheKey, document: Arc<Document>) {
    let mut entries = self.lock();
    entries.shift_remove(&key);
    while entries.len() >= self.capacity {
      if let Some((evicted, _)) = entries.shift_remove_index(0) {
        trace!(path = %evicted.path.display(), "spec cache eviction");
      }
    }
    entries.insert(key, document);
  }

  /// Membership test that leaves recency untouched.
  pub fn has(&self, key: &CacheKey) -> bool {
    self.lock().contains_key(key)
  }

  pub fn clear(&self) {
    self.lock().clear();
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  /// A panic while holding the lock cannot leave the map half-updated, so the
  /// poisoned guard is used as is.
  fn lock(&self) -> MutexGuard<'_, IndexMap<CacheKey, Arc<Document>>> {
    self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn document(title: &str) -> Arc<Document> {
    let value = json!({
      "openapi": "3.0.3",
      "info": { "title": title, "version": "1.0.0" },
      "components": { "schemas": { "Thing": { "type": "string" } } }
    });
    Arc::new(Document::from_value(value, None).unwrap())
  }

  fn key(name: &str) -> CacheKey {
    CacheKey::new(Path::new(name), None, name.as_bytes())
  }

  #[test]
  fn test_get_returns_shared_document() {
    let cache = SpecCache::new(4);
    let doc = document("A");
    cache.set(key("a.json"), Arc::clone(&doc));

    let hit = cache.get(&key("a.json")).unwrap();
    assert!(Arc::ptr_eq(&hit, &doc));
    assert!(cache.get(&key("b.json")).is_none());
  }

  #[test]
  fn test_least_recently_used_is_evicted() {
    let cache = SpecCache::new(2);
    cache.set(key("a.json"), document("A"));
    cache.set(key("b.json"), document("B"));

    // Touch `a` so `b` becomes the oldest entry.
    assert!(cache.get(&key("a.json")).is_some());
    cache.set(key("c.json"), document("C"));

    assert_eq!(cache.len(), 2);
    assert!(cache.has(&key("a.json")));
    assert!(!cache.has(&key("b.json")));
    assert!(cache.has(&key("c.json")));
  }

  #[test]
  fn test_has_does_not_refresh_recency() {
    let cache = SpecCache::new(2);
    cache.set(key("a.json"), document("A"));
    cache.set(key("b.json"), document("B"));

    assert!(cache.has(&key("a.json")));
    cache.set(key("c.json"), document("C"));

    assert!(!cache.has(&key("a.json")));
    assert!(cache.has(&key("b.json")));
  }

  #[test]
  fn test_set_replaces_existing_key_without_growing() {
    let cache = SpecCache::new(2);
    cache.set(key("a.json"), document("First"));
    cache.set(key("a.json"), document("Second"));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key("a.json")).unwrap().info.title, "Second");
  }

  #[test]
  fn test_changed_content_is_a_different_key() {
    let path = Path::new("spec.json");
    let before = CacheKey::new(path, None, b"{\"a\":1}");
    let after = CacheKey::new(path, None, b"{\"a\":2}");
    assert_ne!(before, after);

    let cache = SpecCache::new(2);
    cache.set(before.clone(), document("Old"));
    assert!(cache.has(&before));
    assert!(!cache.has(&after));
  }

  #[test]
  fn test_clear_and_zero_capacity() {
    let cache = SpecCache::new(0);
    assert_eq!(cache.capacity(), 1);

    cache.set(key("a.json"), document("A"));
    cache.set(key("b.json"), document("B"));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
  }

  #[test]
  fn test_concurrent_access_is_safe() {
    let cache = Arc::new(SpecCache::new(8));
    let handles = (0..8)
      .map(|i| {
        let cache = Arc::clone(&cache);
        std::thread::spawn(move || {
          let name = format!("spec-{}.json", i % 4);
          cache.set(key(&name), document(&name));
          cache.get(&key(&name)).is_some()
        })
      })
      .collect::<Vec<_>>();

    for handle in handles {
      assert!(handle.join().unwrap());
    }
    assert_eq!(cache.len(), 4);
  }
}
