use rusqlite::types::ToSql;
use rusqlite::Row;

use crate::error::{Result, UpriverError};
use crate::graph::types::{Exchange, ExchangeSummary};

const EXCHANGE_COLUMNS: &str =
    "id, process_id, flow_id, provider_id, value, unit_id, gwp, gwp_contribution, is_input, description";

fn row_to_exchange(row: &Row<'_>) -> rusqlite::Result<Exchange> {
    Ok(Exchange {
        id: row.get(0)?,
        process_id: row.get(1)?,
        flow_id: row.get(2)?,
        provider_id: row.get(3)?,
        value: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        unit_id: row.get(5)?,
        gwp: row.get(6)?,
        gwp_contribution: row.get(7)?,
        is_input: row.get::<_, i64>(8)? != 0,
        description: row.get(9)?,
    })
}

/// Append `AND id IN (?, ?, ...)` for a constrained query.
fn push_id_constraint<'a>(
    sql: &mut String,
    params: &mut Vec<&'a dyn ToSql>,
    ids: &'a [String],
) {
    sql.push_str(" AND id IN (");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
        params.push(id);
    }
    sql.push(')');
}

impl super::Database {
    /// All qualifying upstream edges of a process: input, provider
    /// present, not soft-deleted, matching the dataset version. Ordered
    /// by flow id (then exchange id) for stable, reproducible output.
    ///
    /// With `ids`, the result is additionally constrained to those
    /// exchange ids; an empty slice short-circuits to no edges.
    pub(crate) fn upstream_exchanges_in(
        &self,
        process_id: &str,
        ids: Option<&[String]>,
    ) -> Result<Vec<Exchange>> {
        if matches!(ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT {} FROM exchanges
             WHERE process_id = ?
               AND is_input = 1
               AND provider_id IS NOT NULL
               AND is_deleted = 0
               AND version = ?",
            EXCHANGE_COLUMNS
        );
        let version = self.dataset_version().to_string();
        let mut params: Vec<&dyn ToSql> = vec![&process_id, &version];
        if let Some(ids) = ids {
            push_id_constraint(&mut sql, &mut params, ids);
        }
        sql.push_str(" ORDER BY flow_id, id");

        self.query_exchanges(process_id, &sql, &params)
    }

    /// The heaviest qualifying upstream edge, ties broken by exchange
    /// id ascending. SQLite sorts NULL weights last under DESC, so
    /// weightless rows never win over weighted ones.
    pub(crate) fn max_weight_exchange_in(
        &self,
        process_id: &str,
        ids: Option<&[String]>,
    ) -> Result<Option<Exchange>> {
        if matches!(ids, Some(ids) if ids.is_empty()) {
            return Ok(None);
        }

        let mut sql = format!(
            "SELECT {} FROM exchanges
             WHERE process_id = ?
               AND is_input = 1
               AND provider_id IS NOT NULL
               AND is_deleted = 0
               AND version = ?",
            EXCHANGE_COLUMNS
        );
        let version = self.dataset_version().to_string();
        let mut params: Vec<&dyn ToSql> = vec![&process_id, &version];
        if let Some(ids) = ids {
            push_id_constraint(&mut sql, &mut params, ids);
        }
        sql.push_str(" ORDER BY value DESC, id ASC LIMIT 1");

        let mut rows = self.query_exchanges(process_id, &sql, &params)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Full dump of a process's exchanges split into inputs and
    /// outputs, heaviest first. With `input_ids`, inputs are restricted
    /// to those exchange ids while outputs stay complete.
    pub(crate) fn process_exchanges_in(
        &self,
        process_id: &str,
        input_ids: Option<&[String]>,
    ) -> Result<ExchangeSummary> {
        let mut sql = format!(
            "SELECT {} FROM exchanges
             WHERE process_id = ?
               AND is_deleted = 0
               AND version = ?",
            EXCHANGE_COLUMNS
        );
        let version = self.dataset_version().to_string();
        let mut params: Vec<&dyn ToSql> = vec![&process_id, &version];
        if let Some(ids) = input_ids {
            sql.push_str(" AND (is_input = 0");
            if !ids.is_empty() {
                sql.push_str(" OR (is_input = 1");
                push_id_constraint(&mut sql, &mut params, ids);
                sql.push(')');
            }
            sql.push(')');
        }
        sql.push_str(" ORDER BY is_input DESC, value DESC, id");

        let rows = self.query_exchanges(process_id, &sql, &params)?;
        let mut summary = ExchangeSummary::default();
        for exchange in rows {
            if exchange.is_input {
                summary.inputs.push(exchange);
            } else {
                summary.outputs.push(exchange);
            }
        }
        Ok(summary)
    }

    // Failures name the process being expanded so a fatal traversal
    // error reports which node triggered it.
    fn query_exchanges(
        &self,
        process_id: &str,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<Exchange>> {
        let mut stmt = self.conn().prepare(sql).map_err(|e| {
            UpriverError::db_operation(&format!("prepare exchange query for {process_id}"), e)
        })?;

        let mut rows = stmt.query(params).map_err(|e| {
            UpriverError::db_operation(&format!("execute exchange query for {process_id}"), e)
        })?;

        let mut exchanges = Vec::new();
        while let Some(row) = rows.next().map_err(|e| {
            UpriverError::db_operation(&format!("read exchange row for {process_id}"), e)
        })? {
            exchanges.push(
                row_to_exchange(row)
                    .map_err(|e| UpriverError::field_extraction("exchange", e))?,
            );
        }
        Ok(exchanges)
    }
}
