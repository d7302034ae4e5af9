use std::collections::HashSet;

use crate::error::Result;
use crate::graph::provider::ExchangeStore;
use crate::graph::types::{Chain, ChainNode, Exchange};

/// Single-chain upstream traversal.
///
/// At every step the single heaviest qualifying edge is followed,
/// exactly once per process, until a process has no qualifying edge
/// (leaf) or an already-visited process is reached (appended as a
/// terminal link, not expanded). The result additionally carries the
/// root's full exchange dump, obtained by a separate non-recursive
/// query.
pub struct ChainBuilder<'a, S: ExchangeStore + ?Sized> {
    store: &'a S,
    visited: HashSet<String>,
}

impl<'a, S: ExchangeStore + ?Sized> ChainBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        ChainBuilder {
            store,
            visited: HashSet::new(),
        }
    }

    /// Build the heaviest upstream chain rooted at `root_id`.
    #[tracing::instrument(skip(self), fields(root_id = %root_id))]
    pub fn build(&mut self, root_id: &str) -> Result<Chain> {
        self.visited.clear();
        let head = self.extend(root_id, None, 0)?;
        let root_context = self.store.process_exchanges(root_id)?;
        tracing::debug!(
            length = head.len(),
            root_inputs = root_context.inputs.len(),
            root_outputs = root_context.outputs.len(),
            "chain traversal complete"
        );
        Ok(Chain { head, root_context })
    }

    fn extend(
        &mut self,
        process_id: &str,
        via: Option<Exchange>,
        level: usize,
    ) -> Result<ChainNode> {
        let mut node = ChainNode::new(process_id, via, level);

        if !self.visited.insert(process_id.to_string()) {
            tracing::debug!(process_id, level, "cycle detected, terminating chain");
            node.cycle = true;
            return Ok(node);
        }

        match self.store.max_weight_exchange(process_id)? {
            Some(edge) => {
                let Some(provider_id) = edge.provider_id.clone() else {
                    // Qualifying edges always carry a provider; a row
                    // without one is treated as a leaf.
                    return Ok(node);
                };
                tracing::trace!(
                    process_id,
                    provider_id = %provider_id,
                    value = edge.value,
                    flow_id = %edge.flow_id,
                    "following max-weight edge"
                );
                let next = self.extend(&provider_id, Some(edge), level + 1)?;
                node.next = Some(Box::new(next));
            }
            None => {
                tracing::trace!(process_id, level, "no qualifying edge, chain ends");
            }
        }

        Ok(node)
    }
}
