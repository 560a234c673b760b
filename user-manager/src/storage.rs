use crate::cache::{CacheStats, Cacheable, LruCache};
use crate::User;

/// User records kept in a bounded LRU cache, keyed by user id.
#[derive(Debug)]
pub struct UserStorage {
    cache: LruCache<String, User>,
}

impl UserStorage {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Inserts or fully replaces the record for the user's id.
    pub fn upsert_user(&self, user: User) {
        log::debug!("Caching user {}", user.user_id());
        self.cache.insert(user.user_id().clone(), Some(user));
    }

    /// All cached users, most recently used first.
    pub fn get_users(&self) -> Vec<User> {
        self.cache.all_values()
    }

    pub fn get_users_for_nickname(&self, nickname: &str) -> Vec<User> {
        self.get_users()
            .into_iter()
            .filter(|user| user.nickname().as_deref() == Some(nickname))
            .collect()
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.cache.lookup(&user_id.to_string())
    }

    pub fn remove_all_users(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
