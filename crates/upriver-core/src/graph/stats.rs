//! Read-only statistics over a built traversal tree
//!
//! None of these touch the store; they consume the owned tree produced
//! by the exhaustive traversal.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::types::TreeNode;

/// Aggregate metrics of an exhaustive traversal tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeStats {
    /// Total nodes in the tree, cycle-terminal leaves included
    pub total_nodes: usize,
    /// Node count per level (root = 0)
    pub level_distribution: BTreeMap<usize, usize>,
    /// Node count per number-of-children bucket
    pub fanout_distribution: BTreeMap<usize, usize>,
    /// Process ids of leaf nodes, in depth-first order
    pub leaves: Vec<String>,
    /// Tree edges (every node reached via at least one exchange)
    pub edge_count: usize,
    /// Total exchanges attached across all tree edges (full policy
    /// attaches several per edge)
    pub flow_count: usize,
}

impl TreeStats {
    /// Walk the tree once and collect every metric.
    pub fn analyze(root: &TreeNode) -> Self {
        let mut stats = TreeStats::default();
        stats.visit(root);
        stats
    }

    fn visit(&mut self, node: &TreeNode) {
        self.total_nodes += 1;
        *self.level_distribution.entry(node.level).or_insert(0) += 1;
        *self
            .fanout_distribution
            .entry(node.children.len())
            .or_insert(0) += 1;

        if !node.via.is_empty() {
            self.edge_count += 1;
            self.flow_count += node.via.len();
        }
        if node.is_leaf() {
            self.leaves.push(node.process_id.clone());
        }

        for child in &node.children {
            self.visit(child);
        }
    }

    /// Deepest level present in the tree
    pub fn max_depth(&self) -> usize {
        self.level_distribution
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
    }

    /// Average number of children over non-leaf nodes
    pub fn avg_fanout(&self) -> f64 {
        let non_leaf = self.total_nodes - self.leaves.len();
        if non_leaf == 0 {
            return 0.0;
        }
        let total_children: usize = self
            .fanout_distribution
            .iter()
            .filter(|(fanout, _)| **fanout > 0)
            .map(|(fanout, count)| fanout * count)
            .sum();
        total_children as f64 / non_leaf as f64
    }

    /// Average exchanges per tree edge (meaningful under the full
    /// policy; exactly 1.0 under the single policy)
    pub fn avg_flows_per_edge(&self) -> f64 {
        if self.edge_count == 0 {
            return 0.0;
        }
        self.flow_count as f64 / self.edge_count as f64
    }
}

/// The deepest root-to-leaf path, ties broken by first-encountered
/// child during the depth-first scan.
pub fn critical_path(root: &TreeNode) -> Vec<String> {
    let mut longest: Vec<String> = Vec::new();
    for child in &root.children {
        let candidate = critical_path(child);
        if candidate.len() > longest.len() {
            longest = candidate;
        }
    }

    let mut path = Vec::with_capacity(longest.len() + 1);
    path.push(root.process_id.clone());
    path.extend(longest);
    path
}
