use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Unbounded response cache keyed by query document + variables.
/// Only successful responses go in; entries live as long as the process.
pub struct QueryCache {
    entries: RwLock<HashMap<String, Arc<Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// serde_json objects are ordered maps, so equal variables give equal keys.
    pub fn key(query: &str, variables: &Value) -> String {
        format!("{}\n{}", query, variables)
    }

    /// Returns an Arc clone (pointer only)
    pub fn get(&self, query: &str, variables: &Value) -> Option<Arc<Value>> {
        self.entries.read().get(&Self::key(query, variables)).cloned()
    }

    pub fn insert(&self, query: &str, variables: &Value, data: Value) -> Arc<Value> {
        let data = Arc::new(data);
        self.entries
            .write()
            .insert(Self::key(query, variables), data.clone());
        data
    }

    /// Drop every entry for one query document, whatever its variables.
    pub fn clear_query(&self, query: &str) -> usize {
        let prefix = format!("{}\n", query);
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Evicted {} cached responses", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyed_by_query_and_variables() {
        let cache = QueryCache::new();
        cache.insert("q", &json!({ "first": 5 }), json!({ "a": 1 }));

        assert_eq!(*cache.get("q", &json!({ "first": 5 })).unwrap(), json!({ "a": 1 }));
        assert!(cache.get("q", &json!({ "first": 6 })).is_none());
        assert!(cache.get("other", &json!({ "first": 5 })).is_none());
    }

    #[test]
    fn variable_order_does_not_matter() {
        let cache = QueryCache::new();
        cache.insert("q", &json!({ "first": 1, "skip": 2 }), json!(true));
        assert!(cache.get("q", &json!({ "skip": 2, "first": 1 })).is_some());
    }

    #[test]
    fn clear_query_keeps_other_documents() {
        let cache = QueryCache::new();
        cache.insert("q", &json!({ "skip": 0 }), json!(1));
        cache.insert("q", &json!({ "skip": 100 }), json!(2));
        cache.insert("p", &json!({ "skip": 0 }), json!(3));

        assert_eq!(cache.clear_query("q"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("p", &json!({ "skip": 0 })).is_some());
    }
}
