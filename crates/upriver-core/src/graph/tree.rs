use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::graph::provider::ExchangeStore;
use crate::graph::types::{EdgePolicy, Exchange, TreeNode};

/// Exhaustive upstream tree traversal.
///
/// Depth-first recursive expansion from a root process: at each node,
/// every qualifying upstream edge is fetched and one child is created
/// per distinct provider. The visited set is shared by mutable
/// reference across all recursive calls of one run, so a provider
/// reached again anywhere in the tree becomes a cycle-terminal leaf
/// instead of being expanded a second time. Store failures abort the
/// run; no partial tree is salvaged.
pub struct TreeBuilder<'a, S: ExchangeStore + ?Sized> {
    store: &'a S,
    policy: EdgePolicy,
    visited: HashSet<String>,
    cycle_hits: Vec<String>,
}

impl<'a, S: ExchangeStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(store: &'a S, policy: EdgePolicy) -> Self {
        TreeBuilder {
            store,
            policy,
            visited: HashSet::new(),
            cycle_hits: Vec::new(),
        }
    }

    /// Build the upstream tree rooted at `root_id`.
    ///
    /// A root with no qualifying edges yields a single level-0 leaf.
    /// The builder can be reused; each call starts a fresh run with a
    /// cleared visited set.
    #[tracing::instrument(skip(self), fields(root_id = %root_id, policy = ?self.policy))]
    pub fn build(&mut self, root_id: &str) -> Result<TreeNode> {
        self.visited.clear();
        self.cycle_hits.clear();
        let root = self.expand(root_id, Vec::new(), 0)?;
        tracing::debug!(
            visited = self.visited.len(),
            cycle_hits = self.cycle_hits.len(),
            "tree traversal complete"
        );
        Ok(root)
    }

    fn expand(&mut self, process_id: &str, via: Vec<Exchange>, level: usize) -> Result<TreeNode> {
        let mut node = TreeNode::new(process_id, via, level);

        if !self.visited.insert(process_id.to_string()) {
            tracing::debug!(process_id, level, "cycle detected, truncating branch");
            self.cycle_hits.push(process_id.to_string());
            node.cycle = true;
            return Ok(node);
        }

        let exchanges = self.store.upstream_exchanges(process_id)?;
        tracing::trace!(process_id, level, upstream = exchanges.len(), "expanding");

        for (provider_id, edges) in group_by_provider(exchanges) {
            let via = match self.policy {
                EdgePolicy::Single => edges.into_iter().take(1).collect(),
                EdgePolicy::Full => edges,
            };
            let child = self.expand(&provider_id, via, level + 1)?;
            node.children.push(child);
        }

        Ok(node)
    }

    /// Distinct processes expanded during the last run
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Processes that terminated a branch as cycle leaves in the last
    /// run (diagnostic, in encounter order; may contain duplicates when
    /// the same process truncates several branches)
    pub fn cycle_hits(&self) -> &[String] {
        &self.cycle_hits
    }
}

/// Group edges by provider, preserving first-encounter order of both
/// providers and the edges within each group. Insertion order matters:
/// the first edge of a group is the representative under the single
/// policy.
fn group_by_provider(exchanges: Vec<Exchange>) -> Vec<(String, Vec<Exchange>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Exchange>> = HashMap::new();

    for exchange in exchanges {
        let Some(provider_id) = exchange.provider_id.clone() else {
            continue;
        };
        if !groups.contains_key(&provider_id) {
            order.push(provider_id.clone());
        }
        groups.entry(provider_id).or_default().push(exchange);
    }

    order
        .into_iter()
        .filter_map(|provider_id| {
            groups
                .remove(&provider_id)
                .map(|edges| (provider_id, edges))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::MockStore;

    #[test]
    fn test_root_without_edges_is_single_leaf() {
        let store = MockStore::new();
        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);

        let root = builder.build("lonely").unwrap();
        assert_eq!(root.process_id, "lonely");
        assert_eq!(root.level, 0);
        assert!(root.via.is_empty());
        assert!(root.children.is_empty());
        assert!(!root.cycle);
        assert_eq!(builder.visited_count(), 1);
    }

    #[test]
    fn test_linear_chain_expands_with_increasing_levels() {
        let mut store = MockStore::new();
        store.edge("a", "b", "f1", 1.0);
        store.edge("b", "c", "f2", 1.0);

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let root = builder.build("a").unwrap();

        assert_eq!(root.children.len(), 1);
        let b = &root.children[0];
        assert_eq!(b.process_id, "b");
        assert_eq!(b.level, 1);
        let c = &b.children[0];
        assert_eq!(c.process_id, "c");
        assert_eq!(c.level, 2);
        assert!(c.is_leaf());
    }

    #[test]
    fn test_two_cycle_yields_cycle_terminal_leaf() {
        // Scenario: root -> a -> root
        let mut store = MockStore::new();
        store.edge("root", "a", "f1", 1.0);
        store.edge("a", "root", "f2", 1.0);

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let tree = builder.build("root").unwrap();

        let a = &tree.children[0];
        assert_eq!(a.process_id, "a");
        let back = &a.children[0];
        assert_eq!(back.process_id, "root");
        assert_eq!(back.level, 2);
        assert!(back.cycle);
        assert!(back.children.is_empty());
        assert_eq!(builder.cycle_hits(), &["root".to_string()]);
    }

    #[test]
    fn test_single_policy_keeps_first_edge_per_provider() {
        // Two flows to the same provider: first one wins, provider is
        // expanded once.
        let mut store = MockStore::new();
        store.edge_full("root", "p", "flow-a", 5.0, "e1");
        store.edge_full("root", "p", "flow-b", 3.0, "e2");

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let tree = builder.build("root").unwrap();

        assert_eq!(tree.children.len(), 1);
        let p = &tree.children[0];
        assert_eq!(p.via.len(), 1);
        assert_eq!(p.via[0].flow_id, "flow-a");
    }

    #[test]
    fn test_full_policy_groups_all_edges_under_one_child() {
        let mut store = MockStore::new();
        store.edge_full("root", "p", "flow-a", 5.0, "e1");
        store.edge_full("root", "p", "flow-b", 3.0, "e2");

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Full);
        let tree = builder.build("root").unwrap();

        assert_eq!(tree.children.len(), 1);
        let p = &tree.children[0];
        assert_eq!(p.via.len(), 2);
        assert_eq!(p.representative_edge().unwrap().flow_id, "flow-a");
        assert_eq!(p.via[1].flow_id, "flow-b");
        let weights: Vec<f64> = p.via.iter().map(|e| e.value).collect();
        assert_eq!(weights, vec![5.0, 3.0]);
    }

    #[test]
    fn test_many_edges_to_visited_providers_terminate() {
        // A hub whose qualifying edges all point back at already-visited
        // providers: every one becomes a cycle leaf, no further
        // expansion, traversal terminates. The mid edges are seeded
        // first so every mid is expanded before the hub reaches them.
        let mut store = MockStore::new();
        for i in 0..100 {
            let mid = format!("mid{}", i);
            store.edge("root", &mid, &format!("fm{}", i), 1.0);
            store.edge("hub", &mid, &format!("fh{}", i), 1.0);
        }
        store.edge("root", "hub", "f0", 1.0);

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let tree = builder.build("root").unwrap();

        let hub = tree
            .children
            .iter()
            .find(|c| c.process_id == "hub")
            .unwrap();
        assert_eq!(hub.children.len(), 100);
        assert!(hub.children.iter().all(|c| c.cycle && c.is_leaf()));
        assert_eq!(builder.cycle_hits().len(), 100);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut store = MockStore::new();
        store.edge("a", "b", "f1", 1.0);
        store.edge("a", "c", "f2", 2.0);
        store.edge("b", "d", "f3", 1.0);
        store.edge("c", "d", "f4", 1.0);

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let first = builder.build("a").unwrap();
        let first_visited = builder.visited_count();
        let second = builder.build("a").unwrap();

        assert_eq!(builder.visited_count(), first_visited);
        assert_eq!(node_set(&first), node_set(&second));
        assert_eq!(depth(&first), depth(&second));
    }

    #[test]
    fn test_diamond_expands_shared_provider_once() {
        // a -> b -> d, a -> c -> d: d is expanded under b, and appears
        // as a cycle leaf under c.
        let mut store = MockStore::new();
        store.edge("a", "b", "f1", 1.0);
        store.edge("a", "c", "f2", 1.0);
        store.edge("b", "d", "f3", 1.0);
        store.edge("c", "d", "f4", 1.0);

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        let tree = builder.build("a").unwrap();

        let expanded: Vec<&TreeNode> = collect(&tree)
            .into_iter()
            .filter(|n| n.process_id == "d" && !n.cycle)
            .collect();
        assert_eq!(expanded.len(), 1);
        assert_eq!(builder.visited_count(), 4);
    }

    #[test]
    fn test_store_failure_aborts_run() {
        let mut store = MockStore::new();
        store.edge("a", "b", "f1", 1.0);
        store.fail_edges_for("b");

        let mut builder = TreeBuilder::new(&store, EdgePolicy::Single);
        assert!(builder.build("a").is_err());
    }

    fn collect(node: &TreeNode) -> Vec<&TreeNode> {
        let mut nodes = vec![node];
        for child in &node.children {
            nodes.extend(collect(child));
        }
        nodes
    }

    fn node_set(node: &TreeNode) -> std::collections::BTreeSet<String> {
        collect(node)
            .into_iter()
            .map(|n| n.process_id.clone())
            .collect()
    }

    fn depth(node: &TreeNode) -> usize {
        collect(node).into_iter().map(|n| n.level).max().unwrap_or(0)
    }
}
