use crate::error::Result;
use crate::graph::types::{Exchange, ExchangeSummary};

/// Trait for providing upstream edges and entity names.
///
/// The traversal engines only ever see this seam, so the backing store
/// can be the SQLite database, a category-filtered view over it, or an
/// in-memory fixture in tests.
pub trait ExchangeStore {
    /// All qualifying upstream edges of a process, in the store's
    /// stable return order.
    ///
    /// Qualifying means: input, provider present, not soft-deleted,
    /// matching the dataset version (and, for filtered stores, matching
    /// the material category).
    fn upstream_exchanges(&self, process_id: &str) -> Result<Vec<Exchange>>;

    /// The single heaviest qualifying upstream edge of a process, or
    /// `None` when the process has no qualifying edge. Exact weight ties
    /// break lexicographically by exchange id.
    fn max_weight_exchange(&self, process_id: &str) -> Result<Option<Exchange>>;

    /// Full input/output dump of a process for contextual reporting.
    fn process_exchanges(&self, process_id: &str) -> Result<ExchangeSummary>;

    /// Display name of a process, `None` when unknown.
    fn process_name(&self, id: &str) -> Result<Option<String>>;

    /// Display name of a flow, `None` when unknown.
    fn flow_name(&self, id: &str) -> Result<Option<String>>;

    /// Display name of a unit, `None` when unknown.
    fn unit_name(&self, id: &str) -> Result<Option<String>>;
}
