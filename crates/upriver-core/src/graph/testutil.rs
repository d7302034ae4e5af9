//! In-memory exchange store fixture for traversal tests

use std::collections::HashMap;

use crate::error::{Result, UpriverError};
use crate::graph::provider::ExchangeStore;
use crate::graph::types::{Exchange, ExchangeSummary};

/// In-memory `ExchangeStore` with scriptable failures.
#[derive(Debug, Default)]
pub struct MockStore {
    edges: HashMap<String, Vec<Exchange>>,
    outputs: HashMap<String, Vec<Exchange>>,
    process_names: HashMap<String, String>,
    flow_names: HashMap<String, String>,
    unit_names: HashMap<String, String>,
    fail_edges_for: Option<String>,
    fail_names: bool,
    next_id: u32,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qualifying upstream edge with an auto-generated id.
    pub fn edge(&mut self, from: &str, to: &str, flow: &str, value: f64) {
        self.next_id += 1;
        let id = format!("x{:04}", self.next_id);
        self.edge_full(from, to, flow, value, &id);
    }

    /// Add a qualifying upstream edge with an explicit id.
    pub fn edge_full(&mut self, from: &str, to: &str, flow: &str, value: f64, id: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .push(Exchange {
                id: id.to_string(),
                process_id: from.to_string(),
                flow_id: flow.to_string(),
                provider_id: Some(to.to_string()),
                value,
                unit_id: None,
                gwp: None,
                gwp_contribution: None,
                is_input: true,
                description: None,
            });
    }

    /// Add an output exchange (summary dumps only, never traversed).
    pub fn output(&mut self, process: &str, flow: &str, value: f64) {
        self.next_id += 1;
        self.outputs
            .entry(process.to_string())
            .or_default()
            .push(Exchange {
                id: format!("o{:04}", self.next_id),
                process_id: process.to_string(),
                flow_id: flow.to_string(),
                provider_id: None,
                value,
                unit_id: None,
                gwp: None,
                gwp_contribution: None,
                is_input: false,
                description: None,
            });
    }

    pub fn name(&mut self, id: &str, name: &str) {
        self.process_names.insert(id.to_string(), name.to_string());
    }

    pub fn flow(&mut self, id: &str, name: &str) {
        self.flow_names.insert(id.to_string(), name.to_string());
    }

    pub fn unit(&mut self, id: &str, name: &str) {
        self.unit_names.insert(id.to_string(), name.to_string());
    }

    /// Make edge queries for `process_id` fail with a store error.
    pub fn fail_edges_for(&mut self, process_id: &str) {
        self.fail_edges_for = Some(process_id.to_string());
    }

    pub fn fail_names(&mut self) {
        self.fail_names = true;
    }

    pub fn unfail_names(&mut self) {
        self.fail_names = false;
    }

    fn check_edge_failure(&self, process_id: &str) -> Result<()> {
        if self.fail_edges_for.as_deref() == Some(process_id) {
            return Err(UpriverError::db_operation(
                "query exchanges",
                format!("store unavailable for {}", process_id),
            ));
        }
        Ok(())
    }
}

impl ExchangeStore for MockStore {
    fn upstream_exchanges(&self, process_id: &str) -> Result<Vec<Exchange>> {
        self.check_edge_failure(process_id)?;
        Ok(self.edges.get(process_id).cloned().unwrap_or_default())
    }

    fn max_weight_exchange(&self, process_id: &str) -> Result<Option<Exchange>> {
        self.check_edge_failure(process_id)?;
        let mut best: Option<&Exchange> = None;
        for edge in self.edges.get(process_id).into_iter().flatten() {
            best = match best {
                None => Some(edge),
                Some(current) => {
                    // Weight descending, then id ascending, matching the
                    // store's ORDER BY value DESC, id ASC.
                    if edge.value > current.value
                        || (edge.value == current.value && edge.id < current.id)
                    {
                        Some(edge)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        Ok(best.cloned())
    }

    fn process_exchanges(&self, process_id: &str) -> Result<ExchangeSummary> {
        self.check_edge_failure(process_id)?;
        Ok(ExchangeSummary {
            inputs: self.edges.get(process_id).cloned().unwrap_or_default(),
            outputs: self.outputs.get(process_id).cloned().unwrap_or_default(),
        })
    }

    fn process_name(&self, id: &str) -> Result<Option<String>> {
        if self.fail_names {
            return Err(UpriverError::db_operation("query process name", "down"));
        }
        Ok(self.process_names.get(id).cloned())
    }

    fn flow_name(&self, id: &str) -> Result<Option<String>> {
        if self.fail_names {
            return Err(UpriverError::db_operation("query flow name", "down"));
        }
        Ok(self.flow_names.get(id).cloned())
    }

    fn unit_name(&self, id: &str) -> Result<Option<String>> {
        if self.fail_names {
            return Err(UpriverError::db_operation("query unit name", "down"));
        }
        Ok(self.unit_names.get(id).cloned())
    }
}
