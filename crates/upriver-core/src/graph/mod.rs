//! Graph traversal over the upstream exchange store
//!
//! Provides the two traversal engines of upriver:
//! - Exhaustive tree expansion of every qualifying upstream provider
//! - Single-chain pursuit of the heaviest edge at every step
//!
//! Both share the exchange-store trait for pluggable data sources, a
//! per-run visited set for cycle suppression, and a name cache.

pub mod chain;
pub mod names;
pub mod provider;
pub mod stats;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use chain::ChainBuilder;
pub use names::NameCache;
pub use provider::ExchangeStore;
pub use stats::{critical_path, TreeStats};
pub use tree::TreeBuilder;
pub use types::{Chain, ChainNode, EdgePolicy, Exchange, ExchangeSummary, TreeNode};
