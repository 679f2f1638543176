// ABOUTME: Trait seam to the external tabular-query engine
// ABOUTME: Implementations materialize TableScans and run parameterized updates

use crate::scan::TableScan;
use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemWarehouse;
pub use postgres::PgWarehouse;

/// The tabular-query capability the extraction utilities run against.
///
/// Every method materializes work on the remote engine and blocks the caller
/// until it responds; nothing is cached or retried here. Errors are the
/// engine's own, wrapped into the crate taxonomy by the calling operation.
#[async_trait]
pub trait Warehouse {
    /// Number of rows the scan selects.
    async fn count(&self, scan: &TableScan) -> Result<u64>;

    /// Maximum of `column` over the scan, rendered as a string by the engine.
    ///
    /// Returns `None` when the scan selects no rows (SQL `max` over an empty
    /// set is null).
    async fn max_string(&self, scan: &TableScan, column: &str) -> Result<Option<String>>;

    /// Values of `column` for every row the scan selects, in engine order.
    async fn fetch_strings(&self, scan: &TableScan, column: &str) -> Result<Vec<Option<String>>>;

    /// Set `set_column = set_value` on every row of `table` where
    /// `key_column = key_value`, binding both values as statement parameters.
    ///
    /// Returns the number of rows affected.
    async fn update_where_eq(
        &self,
        table: &str,
        set_column: &str,
        set_value: &str,
        key_column: &str,
        key_value: &str,
    ) -> Result<u64>;
}
