use rusqlite::{params, OptionalExtension};

use crate::error::{Result, UpriverError};

impl super::Database {
    /// Process display name: exact dataset version first, then any
    /// version newest-first (suffixed with its version), then `None`.
    pub(crate) fn query_process_name(&self, id: &str) -> Result<Option<String>> {
        let exact: Option<String> = self
            .conn()
            .query_row(
                "SELECT name FROM processes WHERE id = ?1 AND version = ?2 LIMIT 1",
                params![id, self.dataset_version()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| UpriverError::db_operation("query process name", e))?;

        if exact.is_some() {
            return Ok(exact);
        }

        let fallback: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT name, version FROM processes WHERE id = ?1 ORDER BY version DESC LIMIT 1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| UpriverError::db_operation("query process name fallback", e))?;

        Ok(fallback.map(|(name, version)| format!("{} [v{}]", name, version)))
    }

    /// Flow display name with the same version ladder as processes,
    /// without the version suffix.
    pub(crate) fn query_flow_name(&self, id: &str) -> Result<Option<String>> {
        let exact: Option<String> = self
            .conn()
            .query_row(
                "SELECT name FROM flows WHERE id = ?1 AND version = ?2 LIMIT 1",
                params![id, self.dataset_version()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| UpriverError::db_operation("query flow name", e))?;

        if exact.is_some() {
            return Ok(exact);
        }

        self.conn()
            .query_row(
                "SELECT name FROM flows WHERE id = ?1 ORDER BY version DESC LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| UpriverError::db_operation("query flow name fallback", e))
    }

    /// Unit display name (units are unversioned).
    pub(crate) fn query_unit_name(&self, id: &str) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT name FROM units WHERE id = ?1 LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| UpriverError::db_operation("query unit name", e))
    }
}
