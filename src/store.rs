use std::collections::HashMap;

use crate::models::{Hit, PageResult};

/// Per search key result cache for the whole session.
///
/// Entries are only ever appended to (`merge`) or filtered (`dismiss`);
/// switching keys never evicts another key's entry.
#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    results: HashMap<String, PageResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, search_key: &str, hits: Vec<Hit>, page: u32) {
        let entry = self.results.entry(search_key.to_string()).or_default();
        entry.hits.extend(hits);
        entry.page = page;
    }

    // Linear removal; a key holds at most a few pages of hits.
    pub fn dismiss(&mut self, search_key: &str, object_id: &str) {
        if let Some(entry) = self.results.get_mut(search_key) {
            entry.hits.retain(|hit| hit.object_id != object_id);
        }
    }

    /// True only when `search_key` has never been merged, even with zero hits.
    pub fn needs_fetch(&self, search_key: &str) -> bool {
        !self.results.contains_key(search_key)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, search_key: &str) -> Option<&PageResult> {
        self.results.get(search_key)
    }

    pub fn hits(&self, search_key: &str) -> &[Hit] {
        self.results
            .get(search_key)
            .map(|entry| entry.hits.as_slice())
            .unwrap_or(&[])
    }

    pub fn page(&self, search_key: &str) -> u32 {
        self.results.get(search_key).map(|entry| entry.page).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str) -> Hit {
        Hit {
            object_id: id.to_string(),
            title: Some(format!("title {}", id)),
            url: None,
            author: None,
            num_comments: None,
            points: None,
            created_at: None,
        }
    }

    fn ids(store: &ResultStore, key: &str) -> Vec<String> {
        store.hits(key).iter().map(|h| h.object_id.clone()).collect()
    }

    #[test]
    fn merge_appends_in_call_order() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("a"), hit("b")], 0);
        store.merge("redux", vec![hit("c")], 1);
        store.merge("redux", vec![hit("a")], 2);

        assert_eq!(ids(&store, "redux"), vec!["a", "b", "c", "a"]);
        assert_eq!(store.page("redux"), 2);
    }

    #[test]
    fn merge_leaves_other_keys_alone() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("a")], 0);
        store.merge("rust", vec![hit("r")], 0);
        store.merge("rust", vec![hit("s")], 1);

        assert_eq!(ids(&store, "redux"), vec!["a"]);
        assert_eq!(store.page("redux"), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn needs_fetch_false_after_empty_merge() {
        let mut store = ResultStore::new();
        assert!(store.needs_fetch("nothing"));

        store.merge("nothing", Vec::new(), 0);
        assert!(!store.needs_fetch("nothing"));
        assert!(store.hits("nothing").is_empty());
    }

    #[test]
    fn dismiss_removes_every_copy_and_keeps_page() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("a"), hit("b")], 0);
        store.merge("redux", vec![hit("a"), hit("c")], 1);

        store.dismiss("redux", "a");
        assert_eq!(ids(&store, "redux"), vec!["b", "c"]);
        assert_eq!(store.page("redux"), 1);

        store.dismiss("redux", "a");
        assert_eq!(ids(&store, "redux"), vec!["b", "c"]);
    }

    #[test]
    fn dismiss_unknown_key_or_id_is_noop() {
        let mut store = ResultStore::new();
        store.dismiss("missing", "a");
        assert!(store.needs_fetch("missing"));

        store.merge("redux", vec![hit("a")], 0);
        store.dismiss("redux", "zzz");
        assert_eq!(ids(&store, "redux"), vec!["a"]);
    }

    #[test]
    fn unseen_key_reads_as_empty_page_zero() {
        let store = ResultStore::new();
        assert!(store.is_empty());
        assert!(store.get("x").is_none());
        assert!(store.hits("x").is_empty());
        assert_eq!(store.page("x"), 0);
    }
}
