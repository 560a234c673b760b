use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Interface shared by caches holding cloneable values.
pub trait Cacheable<K, V> {
    /// Stores `value` under `key`, replacing any previous value.
    /// Passing `None` removes the key.
    fn insert(&self, key: K, value: Option<V>);
    /// Removes `key` and returns its value, if any.
    fn remove(&self, key: &K) -> Option<V>;
    /// Returns the value stored under `key`, if any.
    fn lookup(&self, key: &K) -> Option<V>;
    /// Returns every stored value.
    fn all_values(&self) -> Vec<V>;
    /// Removes every entry.
    fn clear(&self);
}

/// A single slot of the recency list. `prev` points towards the most
/// recently used end, `next` towards the least recently used end.
#[derive(Debug)]
struct CacheEntry<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct LruState<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<CacheEntry<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> LruState<K, V>
where
    K: Eq + Hash + Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn entry(&self, slot: usize) -> &CacheEntry<K, V> {
        self.slots[slot].as_ref().expect("linked slot is occupied")
    }

    fn entry_mut(&mut self, slot: usize) -> &mut CacheEntry<K, V> {
        self.slots[slot].as_mut().expect("linked slot is occupied")
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let entry = self.entry(slot);
            (entry.prev, entry.next)
        };

        match prev {
            Some(p) => self.entry_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entry_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let entry = self.entry_mut(slot);
        entry.prev = None;
        entry.next = None;
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let entry = self.entry_mut(slot);
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(h) => self.entry_mut(h).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn promote(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn allocate(&mut self, key: K, value: V) -> usize {
        let entry = CacheEntry {
            key,
            value,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> CacheEntry<K, V> {
        self.unlink(slot);
        self.free.push(slot);
        self.slots[slot].take().expect("released slot is occupied")
    }

    fn evict_lru(&mut self) -> Option<K> {
        let tail = self.tail?;
        let entry = self.release(tail);
        self.index.remove(&entry.key);
        self.evictions += 1;
        Some(entry.key)
    }

    fn reset(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }
}

/// Thread-safe, fixed-capacity cache with least-recently-used eviction.
///
/// Entries live in an arena addressed by slot index; the recency order is a
/// doubly linked list threaded through those indices, so insert, lookup and
/// remove are all O(1). A single mutex guards the index and the list together
/// and is never held across an await point.
#[derive(Debug)]
pub struct LruCache<K, V> {
    state: Mutex<LruState<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be > 0");

        Self {
            state: Mutex::new(LruState::with_capacity(capacity)),
            capacity,
        }
    }

    /// Stores `value` under `key` and marks it most recently used,
    /// evicting the least recently used entry when the cache is full.
    pub fn put(&self, key: K, value: V) {
        let mut state = self.state.lock();

        if let Some(&slot) = state.index.get(&key) {
            state.entry_mut(slot).value = value;
            state.promote(slot);
            return;
        }

        if state.index.len() >= self.capacity {
            if let Some(_evicted) = state.evict_lru() {
                log::debug!("Evicted least recently used entry, capacity {}", self.capacity);
            }
        }

        let slot = state.allocate(key.clone(), value);
        state.push_front(slot);
        state.index.insert(key, slot);
    }

    /// Returns `true` if `key` is cached. Does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            total_entries: state.index.len(),
            max_entries: self.capacity,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }
}

impl<K, V> Cacheable<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn insert(&self, key: K, value: Option<V>) {
        match value {
            Some(value) => self.put(key, value),
            None => {
                self.remove(&key);
            }
        }
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let slot = state.index.remove(key)?;
        Some(state.release(slot).value)
    }

    fn lookup(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        match state.index.get(key).copied() {
            Some(slot) => {
                state.hits += 1;
                state.promote(slot);
                Some(state.entry(slot).value.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Values are returned from most to least recently used.
    fn all_values(&self) -> Vec<V> {
        let state = self.state.lock();
        let mut values = Vec::with_capacity(state.index.len());
        let mut cursor = state.head;
        while let Some(slot) = cursor {
            let entry = state.entry(slot);
            values.push(entry.value.clone());
            cursor = entry.next;
        }
        values
    }

    fn clear(&self) {
        self.state.lock().reset();
        log::info!("Cache cleared");
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_capacity_is_never_exceeded() {
        let cache = LruCache::new(3);
        for i in 0..10 {
            cache.put(i, i * 10);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.all_values(), vec![90, 80, 70]);
        assert_eq!(cache.stats().evictions, 7);
    }

    #[test]
    fn test_overflow_evicts_exactly_the_oldest() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn test_overflow_then_read_then_insert() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        assert_eq!(cache.lookup(&"a"), None);
        cache.put("d", 4);

        assert!(!cache.contains(&"b"));
        assert_eq!(cache.all_values(), vec![4, 3]);
    }

    #[test]
    fn test_lookup_promotes_entry() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.lookup(&"a"), Some(1));
        cache.put("c", 3);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.all_values(), vec![3, 1]);
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let cache = LruCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        assert_eq!(cache.lookup(&"a"), Some(1));
        cache.put("d", 4);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.all_values(), vec![4, 1, 3]);
    }

    #[test]
    fn test_update_in_place() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&"a"), Some(10));
        assert_eq!(cache.all_values(), vec![10, 2]);

        // "b" is now the oldest
        cache.put("c", 3);
        assert!(!cache.contains(&"b"));
    }

    #[test]
    fn test_insert_none_removes() {
        let cache = LruCache::new(2);
        cache.insert("a", Some(1));
        cache.insert("a", None);
        assert!(cache.is_empty());

        cache.insert("missing", None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove(&"a"), None);
        assert_eq!(cache.remove(&"zzz"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let cache = LruCache::new(2);
        cache.put(1, "one");
        cache.put(2, "two");
        cache.remove(&1);
        cache.remove(&2);
        cache.put(3, "three");
        cache.put(4, "four");
        cache.put(5, "five");

        assert_eq!(cache.all_values(), vec!["five", "four"]);
        assert_eq!(cache.state.lock().slots.len(), 2);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let cache = LruCache::new(3);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);

        cache.remove(&3);
        assert_eq!(cache.all_values(), vec![2, 1]);
        cache.remove(&1);
        assert_eq!(cache.all_values(), vec![2]);
        cache.remove(&2);
        assert!(cache.all_values().is_empty());

        cache.put(4, 4);
        assert_eq!(cache.all_values(), vec![4]);
    }

    #[test]
    fn test_clear() {
        let cache = LruCache::new(4);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.all_values().is_empty());
        assert_eq!(cache.lookup(&"a"), None);

        cache.put("c", 3);
        assert_eq!(cache.all_values(), vec![3]);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.lookup(&"a");
        cache.lookup(&"b");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.max_entries, 2);
    }

    #[test]
    #[should_panic(expected = "cache capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = LruCache::<u8, u8>::new(0);
    }

    #[test]
    fn test_concurrent_access_keeps_structure_intact() {
        let cache = Arc::new(LruCache::new(16));
        let mut handles = vec![];

        for t in 0..8usize {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for i in 0..2_000usize {
                    let key = (i * 31 + t * 17) % 64;
                    match (i + t) % 3 {
                        0 => cache.put(key, i),
                        1 => {
                            cache.lookup(&key);
                        }
                        _ => {
                            cache.remove(&key);
                        }
                    }
                    assert!(cache.len() <= 16);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let state = cache.state.lock();
        let mut walked = 0;
        let mut cursor = state.head;
        let mut prev = None;
        while let Some(slot) = cursor {
            let entry = state.entry(slot);
            assert_eq!(entry.prev, prev);
            assert_eq!(state.index.get(&entry.key), Some(&slot));
            prev = Some(slot);
            cursor = entry.next;
            walked += 1;
        }
        assert_eq!(state.tail, prev);
        assert_eq!(walked, state.index.len());
        assert!(walked <= 16);
    }
}
