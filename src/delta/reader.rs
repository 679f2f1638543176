// ABOUTME: DeltaReader - finds rows newer than a watermark and cleans them up
// ABOUTME: Provides delta fetch, latest-timestamp extraction, and null-row filtering

use crate::config::EtlConfig;
use crate::error::{DataError, EtlError};
use crate::scan::{Predicate, TableScan};
use crate::warehouse::Warehouse;

/// Queries source tables for rows newer than a watermark.
///
/// Every method returns lazy [`TableScan`]s; the only materialization
/// performed here is counting and the max aggregate. Callers own the
/// returned scans for the duration of one ETL cycle.
pub struct DeltaReader<'a, W: ?Sized> {
    warehouse: &'a W,
    config: &'a EtlConfig,
}

impl<'a, W: Warehouse + ?Sized> DeltaReader<'a, W> {
    pub fn new(warehouse: &'a W, config: &'a EtlConfig) -> Self {
        Self { warehouse, config }
    }

    /// Find new records since `last_update`.
    ///
    /// Returns the lazy scan and its eagerly computed row count. The
    /// comparison is strictly greater-than: rows stamped exactly at the
    /// watermark are excluded as already processed.
    pub async fn find_delta(
        &self,
        table_name: &str,
        last_update: &str,
    ) -> Result<(TableScan, u64), EtlError> {
        let scan = TableScan::new(table_name).filter(Predicate::gt(
            &self.config.timestamp_column,
            last_update,
        ));

        let delta_count = self
            .warehouse
            .count(&scan)
            .await
            .map_err(|cause| DataError::Delta {
                table: table_name.to_string(),
                cause,
            })?;

        tracing::debug!(
            "Found {} delta rows in {} newer than {}",
            delta_count,
            table_name,
            last_update
        );
        Ok((scan, delta_count))
    }

    /// Find the latest timestamp in the scan.
    ///
    /// The maximum of an empty result set is undefined and fails with
    /// [`DataError::EmptyResult`]; call this only on non-empty deltas.
    pub async fn latest_timestamp(&self, scan: &TableScan) -> Result<String, EtlError> {
        let latest = self
            .warehouse
            .max_string(scan, &self.config.timestamp_column)
            .await
            .map_err(|cause| DataError::LatestTimestamp { cause })?;

        latest.ok_or_else(|| DataError::EmptyResult.into())
    }

    /// Remove rows where all columns are null.
    ///
    /// Returns the cleaned scan and the count of removed rows. Rows with at
    /// least one non-null column always survive. Costs two materializing
    /// counts over the input, one before and one after the filter.
    pub async fn remove_null_rows(&self, scan: TableScan) -> Result<(TableScan, u64), EtlError> {
        let initial_count = self
            .warehouse
            .count(&scan)
            .await
            .map_err(|cause| DataError::NullRowFilter { cause })?;

        let cleaned = scan.drop_all_null();

        let final_count = self
            .warehouse
            .count(&cleaned)
            .await
            .map_err(|cause| DataError::NullRowFilter { cause })?;

        // a concurrent insert between the two counts can push the second one
        // higher; report zero removed rather than underflowing
        let null_count = initial_count.saturating_sub(final_count);
        if null_count > 0 {
            tracing::debug!("Removed {} fully-null rows", null_count);
        }
        Ok((cleaned, null_count))
    }
}
