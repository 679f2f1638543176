// ABOUTME: In-memory Warehouse backed by string-valued rows
// ABOUTME: Lets orchestrators and tests run the extraction protocol without a live engine

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::scan::{CmpOp, TableScan};
use crate::warehouse::Warehouse;

/// A single in-memory table: declared columns plus string-valued rows.
#[derive(Debug, Default, Clone)]
struct MemTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl MemTable {
    fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .with_context(|| format!("Column {} does not exist", column))
    }
}

/// In-memory Warehouse implementation.
///
/// Values are stored and compared as strings, matching the watermark
/// contract: ISO-8601 timestamps order correctly under lexicographic
/// comparison. Null values never satisfy a predicate, mirroring SQL
/// three-valued logic.
#[derive(Debug, Default)]
pub struct MemWarehouse {
    tables: Mutex<HashMap<String, MemTable>>,
}

impl MemWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with the given columns.
    ///
    /// Replaces any existing table of the same name.
    pub fn create_table(&self, name: &str, columns: &[&str]) {
        let table = MemTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        };
        self.tables
            .lock()
            .expect("table registry poisoned")
            .insert(name.to_string(), table);
    }

    /// Append a row; the value count must match the declared columns.
    pub fn insert_row(&self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        let mut tables = self.tables.lock().expect("table registry poisoned");
        let table = tables
            .get_mut(name)
            .with_context(|| format!("Table {} does not exist", name))?;
        if values.len() != table.columns.len() {
            bail!(
                "Row has {} values but table {} has {} columns",
                values.len(),
                name,
                table.columns.len()
            );
        }
        table.rows.push(values);
        Ok(())
    }

    /// Convenience for string-only rows.
    pub fn insert_str_row(&self, name: &str, values: &[&str]) -> Result<()> {
        self.insert_row(name, values.iter().map(|v| Some(v.to_string())).collect())
    }

    /// Snapshot of a table's rows, for assertions in tests.
    pub fn rows(&self, name: &str) -> Result<Vec<Vec<Option<String>>>> {
        let tables = self.tables.lock().expect("table registry poisoned");
        let table = tables
            .get(name)
            .with_context(|| format!("Table {} does not exist", name))?;
        Ok(table.rows.clone())
    }

    /// Materialize the rows a scan selects.
    fn select_rows(&self, scan: &TableScan) -> Result<Vec<Vec<Option<String>>>> {
        let tables = self.tables.lock().expect("table registry poisoned");
        let table = tables
            .get(scan.table())
            .with_context(|| format!("Table {} does not exist", scan.table()))?;

        // resolve predicate columns up front so a bad column fails even on
        // an empty table
        let mut predicates = Vec::with_capacity(scan.predicates().len());
        for predicate in scan.predicates() {
            predicates.push((table.column_index(&predicate.column)?, predicate));
        }

        let mut selected: Vec<Vec<Option<String>>> = Vec::new();
        'rows: for row in &table.rows {
            for (idx, predicate) in &predicates {
                let matches = match (&row[*idx], predicate.op) {
                    (Some(value), CmpOp::Eq) => *value == predicate.value,
                    (Some(value), CmpOp::Gt) => value.as_str() > predicate.value.as_str(),
                    // null compares as unknown, so the row is excluded
                    (None, _) => false,
                };
                if !matches {
                    continue 'rows;
                }
            }
            if scan.drops_all_null() && row.iter().all(|v| v.is_none()) {
                continue;
            }
            selected.push(row.clone());
        }
        Ok(selected)
    }
}

#[async_trait]
impl Warehouse for MemWarehouse {
    async fn count(&self, scan: &TableScan) -> Result<u64> {
        Ok(self.select_rows(scan)?.len() as u64)
    }

    async fn max_string(&self, scan: &TableScan, column: &str) -> Result<Option<String>> {
        let idx = {
            let tables = self.tables.lock().expect("table registry poisoned");
            let table = tables
                .get(scan.table())
                .with_context(|| format!("Table {} does not exist", scan.table()))?;
            table.column_index(column)?
        };
        let rows = self.select_rows(scan)?;
        Ok(rows.into_iter().filter_map(|row| row[idx].clone()).max())
    }

    async fn fetch_strings(&self, scan: &TableScan, column: &str) -> Result<Vec<Option<String>>> {
        let idx = {
            let tables = self.tables.lock().expect("table registry poisoned");
            let table = tables
                .get(scan.table())
                .with_context(|| format!("Table {} does not exist", scan.table()))?;
            table.column_index(column)?
        };
        let rows = self.select_rows(scan)?;
        Ok(rows.into_iter().map(|row| row[idx].clone()).collect())
    }

    async fn update_where_eq(
        &self,
        table: &str,
        set_column: &str,
        set_value: &str,
        key_column: &str,
        key_value: &str,
    ) -> Result<u64> {
        let mut tables = self.tables.lock().expect("table registry poisoned");
        let mem_table = tables
            .get_mut(table)
            .with_context(|| format!("Table {} does not exist", table))?;
        let set_idx = mem_table.column_index(set_column)?;
        let key_idx = mem_table.column_index(key_column)?;

        let mut affected = 0u64;
        for row in &mut mem_table.rows {
            if row[key_idx].as_deref() == Some(key_value) {
                row[set_idx] = Some(set_value.to_string());
                affected += 1;
            }
        }
        Ok(affected)
    }
}
