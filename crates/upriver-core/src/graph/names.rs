use std::collections::HashMap;

use crate::graph::provider::ExchangeStore;

/// Best-effort display-name cache for processes, flows and units.
///
/// Populated on first lookup and never invalidated within a run; names
/// are assumed immutable for the run's duration. A lookup failure
/// degrades to a synthetic placeholder which is also cached, so a
/// transient store failure is not retried. Safe to share across a whole
/// batch of traversal runs (append-only, single-threaded).
#[derive(Debug, Default)]
pub struct NameCache {
    processes: HashMap<String, String>,
    flows: HashMap<String, String>,
    units: HashMap<String, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a process name, falling back to `Process-<prefix>...`
    pub fn process_name(&mut self, store: &dyn ExchangeStore, id: &str) -> String {
        if let Some(name) = self.processes.get(id) {
            return name.clone();
        }
        let name = match store.process_name(id) {
            Ok(Some(name)) => name,
            Ok(None) => placeholder("Process", id),
            Err(e) => {
                tracing::debug!(id, error = %e, "process name lookup failed");
                placeholder("Process", id)
            }
        };
        self.processes.insert(id.to_string(), name.clone());
        name
    }

    /// Resolve a flow name, falling back to `Flow-<prefix>...`
    pub fn flow_name(&mut self, store: &dyn ExchangeStore, id: &str) -> String {
        if let Some(name) = self.flows.get(id) {
            return name.clone();
        }
        let name = match store.flow_name(id) {
            Ok(Some(name)) => name,
            Ok(None) => placeholder("Flow", id),
            Err(e) => {
                tracing::debug!(id, error = %e, "flow name lookup failed");
                placeholder("Flow", id)
            }
        };
        self.flows.insert(id.to_string(), name.clone());
        name
    }

    /// Resolve a unit name, falling back to `N/A`
    pub fn unit_name(&mut self, store: &dyn ExchangeStore, id: Option<&str>) -> String {
        let Some(id) = id else {
            return "N/A".to_string();
        };
        if let Some(name) = self.units.get(id) {
            return name.clone();
        }
        let name = match store.unit_name(id) {
            Ok(Some(name)) => name,
            Ok(None) => "N/A".to_string(),
            Err(e) => {
                tracing::debug!(id, error = %e, "unit name lookup failed");
                "N/A".to_string()
            }
        };
        self.units.insert(id.to_string(), name.clone());
        name
    }

    /// Number of cached entries across all entity kinds
    pub fn len(&self) -> usize {
        self.processes.len() + self.flows.len() + self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn placeholder(kind: &str, id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}-{}...", kind, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::MockStore;

    #[test]
    fn test_known_names_resolve() {
        let mut store = MockStore::new();
        store.name("p1", "Stainless wire rod");
        store.flow("f1", "Stainless steel");

        let mut cache = NameCache::new();
        assert_eq!(cache.process_name(&store, "p1"), "Stainless wire rod");
        assert_eq!(cache.flow_name(&store, "f1"), "Stainless steel");
    }

    #[test]
    fn test_unknown_names_degrade_to_placeholder() {
        let store = MockStore::new();
        let mut cache = NameCache::new();

        assert_eq!(
            cache.process_name(&store, "251da196-55f8-4c57"),
            "Process-251da196..."
        );
        assert_eq!(cache.flow_name(&store, "02eef75e"), "Flow-02eef75e...");
        assert_eq!(cache.unit_name(&store, None), "N/A");
        assert_eq!(cache.unit_name(&store, Some("u-missing")), "N/A");
    }

    #[test]
    fn test_lookup_failure_is_cached_and_not_retried() {
        let mut store = MockStore::new();
        store.fail_names();

        let mut cache = NameCache::new();
        let first = cache.process_name(&store, "p1");
        assert_eq!(first, "Process-p1...");

        // A later fix of the store must not change the cached answer
        // within the same run.
        store.unfail_names();
        store.name("p1", "Now resolvable");
        assert_eq!(cache.process_name(&store, "p1"), "Process-p1...");
        assert_eq!(cache.len(), 1);
    }
}
