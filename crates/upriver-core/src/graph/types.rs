use serde::Serialize;

/// A directed, weighted dependency edge between two processes.
///
/// Read as: `process_id` consumes the product of `provider_id` through
/// flow `flow_id` at quantity `value`. Traversal moves from a process to
/// its upstream providers.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    /// Row identity (used as the deterministic tie-break key)
    pub id: String,
    /// Consuming process
    pub process_id: String,
    /// Flow through which the dependency is realized
    pub flow_id: String,
    /// Upstream provider process (always present on qualifying edges,
    /// absent on output rows in summary dumps)
    pub provider_id: Option<String>,
    /// Exchange quantity (the edge weight)
    pub value: f64,
    /// Unit of the quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Global warming potential of this exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp: Option<f64>,
    /// Share of the total impact contributed by this exchange (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwp_contribution: Option<f64>,
    /// Whether this is an input (true) or output (false) exchange
    pub is_input: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// All exchanges of a single process, split by direction.
///
/// Produced by a non-recursive dump query for root-context reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExchangeSummary {
    pub inputs: Vec<Exchange>,
    pub outputs: Vec<Exchange>,
}

/// Edge-selection policy for exhaustive tree traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Keep only the first edge encountered per provider (skeleton tree)
    #[default]
    Single,
    /// Keep every edge per provider, grouped under one child (full tree)
    Full,
}

/// A node of the exhaustive traversal tree.
///
/// Owns its children exclusively; the tree is immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub process_id: String,
    /// Depth below the root (root = 0)
    pub level: usize,
    /// Edges by which this node was reached from its parent: empty for
    /// the root, one edge under the single policy, all co-incident edges
    /// under the full policy (first one is the representative)
    pub via: Vec<Exchange>,
    /// True when this node was already expanded elsewhere in the run and
    /// is therefore a cycle-terminal leaf
    pub cycle: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(process_id: impl Into<String>, via: Vec<Exchange>, level: usize) -> Self {
        TreeNode {
            process_id: process_id.into(),
            level,
            via,
            cycle: false,
            children: Vec::new(),
        }
    }

    /// The edge that first connected this node to its parent
    pub fn representative_edge(&self) -> Option<&Exchange> {
        self.via.first()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A link of the single-chain traversal (a singly linked list).
#[derive(Debug, Clone, Serialize)]
pub struct ChainNode {
    pub process_id: String,
    /// Depth below the root (root = 0)
    pub level: usize,
    /// The max-weight edge that justified stepping to this node
    /// (absent on the root)
    pub via: Option<Exchange>,
    /// True when the chain terminated here because this node was
    /// already visited in the run
    pub cycle: bool,
    pub next: Option<Box<ChainNode>>,
}

impl ChainNode {
    pub fn new(process_id: impl Into<String>, via: Option<Exchange>, level: usize) -> Self {
        ChainNode {
            process_id: process_id.into(),
            level,
            via,
            cycle: false,
            next: None,
        }
    }

    /// Iterate the chain from this node downstream-to-upstream
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            current: Some(self),
        }
    }

    /// Number of links from this node to the end of the chain
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Iterator over chain links
pub struct ChainIter<'a> {
    current: Option<&'a ChainNode>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a ChainNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node)
    }
}

/// Result of a single-chain traversal: the chain itself plus the full
/// exchange dump of the root process for contextual reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Chain {
    pub head: ChainNode,
    pub root_context: ExchangeSummary,
}
