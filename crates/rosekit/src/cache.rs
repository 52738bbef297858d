//! Path-keyed asset cache with least-recently-used eviction.

use std::sync::Arc;

use hashbrown::HashMap as FastHashMap;
use parking_lot::Mutex;

/// Normalize an asset path for use as a cache key.
///
/// Lowercases, converts backslashes to slashes and strips leading `./`.
pub fn normalize_path(path: &str) -> String {
    let mut key = path.replace('\\', "/").to_lowercase();
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    key
}

struct Entry<T> {
    value: Arc<T>,
    last_used: u64,
}

struct State<T> {
    entries: FastHashMap<String, Entry<T>>,
    clock: u64,
}

impl<T> State<T> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    tracing::trace!(path = %key, "evicting cached asset");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// A bounded cache of decoded assets shared behind [`Arc`].
///
/// Keys are normalized with [`normalize_path`], so `3DDATA\A.ZMD` and
/// `./3ddata/a.zmd` hit the same entry. A capacity of zero disables caching.
pub struct AssetCache<T> {
    capacity: usize,
    state: Mutex<State<T>>,
}

impl<T> AssetCache<T> {
    /// Create a cache holding at most `capacity` assets.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(State {
                entries: FastHashMap::with_capacity(capacity),
                clock: 0,
            }),
        }
    }

    /// Get the maximum number of cached assets.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of cached assets.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a path is cached, without touching its recency.
    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().entries.contains_key(&normalize_path(path))
    }

    /// Drop every cached asset.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Get a cached asset, marking it as recently used.
    pub fn get(&self, path: &str) -> Option<Arc<T>> {
        let key = normalize_path(path);
        let mut state = self.state.lock();
        let now = state.tick();
        let entry = state.entries.get_mut(&key)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.value))
    }

    /// Insert an asset, evicting the least recently used ones if full.
    pub fn insert(&self, path: &str, value: T) -> Arc<T> {
        let value = Arc::new(value);
        if self.capacity == 0 {
            return value;
        }

        let key = normalize_path(path);
        let mut state = self.state.lock();
        let last_used = state.tick();
        state.entries.insert(
            key,
            Entry {
                value: Arc::clone(&value),
                last_used,
            },
        );
        state.evict_to(self.capacity);
        value
    }

    /// Remove an asset from the cache.
    pub fn remove(&self, path: &str) -> Option<Arc<T>> {
        let key = normalize_path(path);
        self.state.lock().entries.remove(&key).map(|entry| entry.value)
    }

    /// Get a cached asset or load and cache it.
    ///
    /// The loader runs without the lock held, so concurrent misses on the
    /// same path may load twice; the first insert wins. Loader errors are
    /// returned as-is and nothing is cached.
    pub fn get_or_load<E, F>(&self, path: &str, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&str) -> Result<T, E>,
    {
        if let Some(hit) = self.get(path) {
            return Ok(hit);
        }

        tracing::debug!(path, "asset cache miss");
        let value = loader(path)?;

        if self.capacity == 0 {
            return Ok(Arc::new(value));
        }

        let key = normalize_path(path);
        let mut state = self.state.lock();
        let now = state.tick();
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.value));
        }

        let value = Arc::new(value);
        state.entries.insert(
            key,
            Entry {
                value: Arc::clone(&value),
                last_used: now,
            },
        );
        state.evict_to(self.capacity);
        Ok(value)
    }
}

impl<T> std::fmt::Debug for AssetCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("3DDATA\\NPC\\Male.ZMD"), "3ddata/npc/male.zmd");
        assert_eq!(normalize_path("./././a/b.zmo"), "a/b.zmo");
        assert_eq!(normalize_path(".\\x.chr"), "x.chr");
        assert_eq!(normalize_path("../x.chr"), "../x.chr");
    }

    #[test]
    fn test_get_or_load_caches() {
        let cache = AssetCache::new(4);
        let loads = Cell::new(0);
        let loader = |path: &str| -> Result<String, ()> {
            loads.set(loads.get() + 1);
            Ok(path.to_uppercase())
        };

        let a = cache.get_or_load("3DDATA\\a.zmd", loader).unwrap();
        let b = cache.get_or_load("./3ddata/A.zmd", loader).unwrap();
        assert_eq!(loads.get(), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, "3DDATA\\A.ZMD");
        assert!(cache.contains("3ddata/a.zmd"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let cache = AssetCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        // Touch "a" so "b" becomes the oldest.
        assert_eq!(cache.get("a").as_deref(), Some(&1));
        cache.insert("c", 3);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);

        cache.insert("d", 4);
        assert!(!cache.contains("a"));
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_loader_error_not_cached() {
        let cache: AssetCache<u32> = AssetCache::new(2);
        let err = cache.get_or_load("x", |_| Err("broken")).unwrap_err();
        assert_eq!(err, "broken");
        assert!(cache.is_empty());

        let value = cache.get_or_load("x", |_| Ok::<_, &str>(7)).unwrap();
        assert_eq!(*value, 7);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = AssetCache::new(0);
        let loads = Cell::new(0);
        for _ in 0..3 {
            cache
                .get_or_load("a", |_| {
                    loads.set(loads.get() + 1);
                    Ok::<_, ()>(())
                })
                .unwrap();
        }
        assert_eq!(loads.get(), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_and_remove() {
        let cache = AssetCache::new(3);
        cache.insert("a", "x");
        cache.insert("b", "y");
        assert_eq!(cache.remove("A").as_deref(), Some(&"x"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = AssetCache::new(8);
        std::thread::scope(|scope| {
            for i in 0..4 {
                let cache = &cache;
                scope.spawn(move || {
                    cache.insert(&format!("asset{i}"), i);
                });
            }
        });
        assert_eq!(cache.len(), 4);
    }
}
