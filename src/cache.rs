use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::kinds::{ActionKind, ObjectKind};
use crate::language::ClientLanguage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Action(ActionKind),
    Object(ObjectKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: NameKind,
    pub id: u32,
    pub language: ClientLanguage,
}

/// Permanent memo of action and object display names. Entries are never
/// evicted.
///
/// A miss computes outside any lock. Two threads missing on the same key may
/// both compute; the first stored value wins and is what both get back.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<CacheKey, Arc<str>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn get_or_insert_with<F>(&self, key: CacheKey, compute: F) -> Arc<str>
    where
        F: FnOnce() -> String,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        debug!("Name cache miss: {:?}", key);
        let value: Arc<str> = Arc::from(compute());
        self.entries.entry(key).or_insert(value).value().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Completion group to the row holding the group's lookup table, indexed by
/// one scan of the `Completion` sheet per language.
#[derive(Debug, Default)]
pub struct CompletionGroupIndex {
    languages: DashMap<ClientLanguage, Arc<HashMap<u32, u32>>>,
}

impl CompletionGroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups<F>(&self, language: ClientLanguage, build: F) -> Arc<HashMap<u32, u32>>
    where
        F: FnOnce() -> HashMap<u32, u32>,
    {
        if let Some(hit) = self.languages.get(&language) {
            return hit.value().clone();
        }
        debug!("Indexing completion groups ({})", language);
        let groups = Arc::new(build());
        self.languages
            .entry(language)
            .or_insert(groups)
            .value()
            .clone()
    }

    /// Languages indexed so far.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u32) -> CacheKey {
        CacheKey {
            kind: NameKind::Action(ActionKind::Action),
            id,
            language: ClientLanguage::English,
        }
    }

    #[test]
    fn test_computes_once() {
        let cache = ResultCache::new();
        let mut calls = 0;
        let first = cache.get_or_insert_with(key(1), || {
            calls += 1;
            "Fire".to_string()
        });
        let second = cache.get_or_insert_with(key(1), || {
            calls += 1;
            "Blizzard".to_string()
        });
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*second, "Fire");
    }

    #[test]
    fn test_language_is_part_of_the_key() {
        let cache = ResultCache::new();
        cache.get_or_insert_with(key(1), || "Fire".to_string());
        let german = CacheKey {
            language: ClientLanguage::German,
            ..key(1)
        };
        assert!(cache.get(&german).is_none());
        cache.get_or_insert_with(german, || "Feuer".to_string());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_object_and_action_keys_differ() {
        let cache = ResultCache::new();
        cache.get_or_insert_with(key(3), || "a".to_string());
        let object = CacheKey {
            kind: NameKind::Object(ObjectKind::Pc),
            ..key(3)
        };
        assert!(cache.get(&object).is_none());
    }

    #[test]
    fn test_completion_groups_build_once_per_language() {
        let index = CompletionGroupIndex::new();
        let mut builds = 0;
        for _ in 0..2 {
            let groups = index.groups(ClientLanguage::English, || {
                builds += 1;
                HashMap::from([(1, 10), (2, 20)])
            });
            assert_eq!(groups.get(&2), Some(&20));
        }
        assert_eq!(builds, 1);
        index.groups(ClientLanguage::French, HashMap::new);
        assert_eq!(index.len(), 2);
    }
}
