//! SQLite database module for upriver

mod exchanges;
mod names;
pub mod schema;


use std::path::Path;

use rusqlite::Connection;

use crate::error::{Result, UpriverError};
use crate::graph::provider::ExchangeStore;
use crate::graph::types::{Exchange, ExchangeSummary};

pub use schema::{create_filter_schema, create_schema};

/// SQLite exchange store, pinned to one dataset version.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    dataset_version: String,
}

impl Database {
    /// Open an existing store file.
    pub fn open(path: &Path, dataset_version: &str) -> Result<Self> {
        if !path.exists() {
            return Err(UpriverError::StoreNotFound {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open(path).map_err(|e| {
            UpriverError::db_operation(
                "open store",
                format!("{}: {}", path.display(), e),
            )
        })?;
        tracing::debug!(path = %path.display(), dataset_version, "opened exchange store");
        Ok(Database {
            conn,
            dataset_version: dataset_version.to_string(),
        })
    }

    /// Create a new store file with the schema in place.
    pub fn create(path: &Path, dataset_version: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            UpriverError::db_operation(
                "create store",
                format!("{}: {}", path.display(), e),
            )
        })?;
        schema::create_schema(&conn)
            .map_err(|e| UpriverError::db_operation("create store schema", e))?;
        Ok(Database {
            conn,
            dataset_version: dataset_version.to_string(),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory(dataset_version: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| UpriverError::db_operation("open in-memory store", e))?;
        schema::create_schema(&conn)
            .map_err(|e| UpriverError::db_operation("create store schema", e))?;
        Ok(Database {
            conn,
            dataset_version: dataset_version.to_string(),
        })
    }

    /// Dataset version all queries are pinned to
    pub fn dataset_version(&self) -> &str {
        &self.dataset_version
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl ExchangeStore for Database {
    fn upstream_exchanges(&self, process_id: &str) -> Result<Vec<Exchange>> {
        self.upstream_exchanges_in(process_id, None)
    }

    fn max_weight_exchange(&self, process_id: &str) -> Result<Option<Exchange>> {
        self.max_weight_exchange_in(process_id, None)
    }

    fn process_exchanges(&self, process_id: &str) -> Result<ExchangeSummary> {
        self.process_exchanges_in(process_id, None)
    }

    fn process_name(&self, id: &str) -> Result<Option<String>> {
        self.query_process_name(id)
    }

    fn flow_name(&self, id: &str) -> Result<Option<String>> {
        self.query_flow_name(id)
    }

    fn unit_name(&self, id: &str) -> Result<Option<String>> {
        self.query_unit_name(id)
    }
}

/// Independent filter partition restricting edges to a material
/// category, joined to the main store by exchange id.
#[derive(Debug)]
pub struct FilterDatabase {
    conn: Connection,
}

impl FilterDatabase {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(UpriverError::StoreNotFound {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open(path).map_err(|e| {
            UpriverError::db_operation(
                "open filter store",
                format!("{}: {}", path.display(), e),
            )
        })?;
        Ok(FilterDatabase { conn })
    }

    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            UpriverError::db_operation(
                "create filter store",
                format!("{}: {}", path.display(), e),
            )
        })?;
        schema::create_filter_schema(&conn)
            .map_err(|e| UpriverError::db_operation("create filter schema", e))?;
        Ok(FilterDatabase { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| UpriverError::db_operation("open in-memory filter store", e))?;
        schema::create_filter_schema(&conn)
            .map_err(|e| UpriverError::db_operation("create filter schema", e))?;
        Ok(FilterDatabase { conn })
    }

    /// Exchange ids of a process carrying the given material category.
    pub fn eligible_exchange_ids(
        &self,
        process_id: &str,
        category_id: &str,
    ) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id FROM process_data
                 WHERE process_id = ?1 AND category_id = ?2
                 ORDER BY id",
            )
            .map_err(|e| UpriverError::db_operation("prepare filter query", e))?;

        let mut rows = stmt
            .query(rusqlite::params![process_id, category_id])
            .map_err(|e| UpriverError::db_operation("execute filter query", e))?;

        let mut ids = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| UpriverError::db_operation("read filter row", e))?
        {
            let id: String = row
                .get(0)
                .map_err(|e| UpriverError::field_extraction("exchange id", e))?;
            ids.push(id);
        }
        Ok(ids)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Category-restricted view over the main store.
///
/// Every edge query is performed as two sequential lookups: the filter
/// partition yields the eligible exchange ids for the process, then the
/// main query is constrained to those ids. Zero eligible ids means the
/// process is a true leaf; there is no fallback to unrestricted edges.
#[derive(Debug)]
pub struct FilteredStore<'a> {
    db: &'a Database,
    filter: &'a FilterDatabase,
    category_id: String,
}

impl<'a> FilteredStore<'a> {
    pub fn new(db: &'a Database, filter: &'a FilterDatabase, category_id: &str) -> Self {
        FilteredStore {
            db,
            filter,
            category_id: category_id.to_string(),
        }
    }

    fn eligible_ids(&self, process_id: &str) -> Result<Vec<String>> {
        self.filter
            .eligible_exchange_ids(process_id, &self.category_id)
    }
}

impl ExchangeStore for FilteredStore<'_> {
    fn upstream_exchanges(&self, process_id: &str) -> Result<Vec<Exchange>> {
        let ids = self.eligible_ids(process_id)?;
        self.db.upstream_exchanges_in(process_id, Some(&ids))
    }

    fn max_weight_exchange(&self, process_id: &str) -> Result<Option<Exchange>> {
        let ids = self.eligible_ids(process_id)?;
        self.db.max_weight_exchange_in(process_id, Some(&ids))
    }

    fn process_exchanges(&self, process_id: &str) -> Result<ExchangeSummary> {
        // Inputs restricted to the category; outputs always complete.
        let ids = self.eligible_ids(process_id)?;
        self.db.process_exchanges_in(process_id, Some(&ids))
    }

    fn process_name(&self, id: &str) -> Result<Option<String>> {
        self.db.query_process_name(id)
    }

    fn flow_name(&self, id: &str) -> Result<Option<String>> {
        self.db.query_flow_name(id)
    }

    fn unit_name(&self, id: &str) -> Result<Option<String>> {
        self.db.query_unit_name(id)
    }
}
