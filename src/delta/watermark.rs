// ABOUTME: WatermarkStore - reads and advances per-table watermarks
// ABOUTME: Backed by the shared configuration table, one record per tracked table

use crate::config::EtlConfig;
use crate::error::{ConfigError, EtlError};
use crate::scan::{Predicate, TableScan};
use crate::warehouse::Warehouse;

/// Column of the configuration table that keys records by source table name.
const TABLE_NAME_COLUMN: &str = "table_name";

/// Column of the configuration table holding the watermark value.
const LAST_UPDATE_COLUMN: &str = "silver_last_update";

/// Reads and writes the per-table watermark kept in the configuration table.
///
/// The configuration table holds at most one record per tracked table;
/// records are provisioned out-of-band and never created or deleted here.
/// Concurrent writers against the same table name are last-writer-wins:
/// callers needing serialized runs must lock above this layer.
pub struct WatermarkStore<'a, W: ?Sized> {
    warehouse: &'a W,
    config: &'a EtlConfig,
}

impl<'a, W: Warehouse + ?Sized> WatermarkStore<'a, W> {
    pub fn new(warehouse: &'a W, config: &'a EtlConfig) -> Self {
        Self { warehouse, config }
    }

    /// Find the last update date recorded for `table_name`.
    ///
    /// Fails with [`ConfigError::NotFound`] when no record exists (or the
    /// record holds a null watermark, which means the table was provisioned
    /// but never processed out-of-band), and with [`ConfigError::Lookup`]
    /// when the lookup query itself fails.
    pub async fn last_update(&self, table_name: &str) -> Result<String, EtlError> {
        let scan = TableScan::new(&self.config.config_table)
            .filter(Predicate::eq(TABLE_NAME_COLUMN, table_name));

        let values = self
            .warehouse
            .fetch_strings(&scan, LAST_UPDATE_COLUMN)
            .await
            .map_err(|cause| ConfigError::Lookup {
                table: table_name.to_string(),
                cause,
            })?;

        match values.into_iter().next().flatten() {
            Some(last_update) => {
                tracing::debug!(
                    "Last update for {} is {}",
                    table_name,
                    last_update
                );
                Ok(last_update)
            }
            None => Err(ConfigError::NotFound {
                table: table_name.to_string(),
            }
            .into()),
        }
    }

    /// Advance the stored watermark for `table_name` to `latest_timestamp`.
    ///
    /// The update is parameterized end to end and idempotent: re-running with
    /// the same value leaves the record unchanged. A zero-row update means no
    /// configuration record matched and fails with [`ConfigError::NotFound`],
    /// symmetric with [`last_update`](Self::last_update).
    pub async fn advance(&self, table_name: &str, latest_timestamp: &str) -> Result<(), EtlError> {
        let affected = self
            .warehouse
            .update_where_eq(
                &self.config.config_table,
                LAST_UPDATE_COLUMN,
                latest_timestamp,
                TABLE_NAME_COLUMN,
                table_name,
            )
            .await
            .map_err(|cause| ConfigError::Update {
                table: table_name.to_string(),
                cause,
            })?;

        if affected == 0 {
            return Err(ConfigError::NotFound {
                table: table_name.to_string(),
            }
            .into());
        }

        tracing::info!(
            "Advanced watermark for {} to {}",
            table_name,
            latest_timestamp
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::MemWarehouse;

    fn config() -> EtlConfig {
        EtlConfig::new("CONFIG_TABLES", "current_timestamp")
    }

    fn provisioned_warehouse() -> MemWarehouse {
        let warehouse = MemWarehouse::new();
        warehouse.create_table("CONFIG_TABLES", &["table_name", "silver_last_update"]);
        warehouse
            .insert_str_row("CONFIG_TABLES", &["ORDERS", "2024-01-01T00:00:00"])
            .unwrap();
        warehouse
    }

    #[tokio::test]
    async fn test_last_update_returns_stored_watermark() {
        let warehouse = provisioned_warehouse();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        let watermark = store.last_update("ORDERS").await.unwrap();
        assert_eq!(watermark, "2024-01-01T00:00:00");
    }

    #[tokio::test]
    async fn test_last_update_unconfigured_table_is_config_error() {
        let warehouse = provisioned_warehouse();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        let err = store.last_update("CUSTOMERS").await.unwrap_err();
        assert!(matches!(
            err,
            EtlError::Config(ConfigError::NotFound { ref table }) if table.as_str() == "CUSTOMERS"
        ));
    }

    #[tokio::test]
    async fn test_last_update_null_watermark_is_not_found() {
        let warehouse = provisioned_warehouse();
        warehouse
            .insert_row(
                "CONFIG_TABLES",
                vec![Some("CUSTOMERS".to_string()), None],
            )
            .unwrap();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        let err = store.last_update("CUSTOMERS").await.unwrap_err();
        assert!(matches!(
            err,
            EtlError::Config(ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_last_update_failed_lookup_is_config_error() {
        // No config table provisioned at all, so the lookup query itself fails
        let warehouse = MemWarehouse::new();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        let err = store.last_update("ORDERS").await.unwrap_err();
        assert!(matches!(
            err,
            EtlError::Config(ConfigError::Lookup { .. })
        ));
    }

    #[tokio::test]
    async fn test_advance_updates_the_record() {
        let warehouse = provisioned_warehouse();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        store.advance("ORDERS", "2024-01-03T00:00:00").await.unwrap();
        assert_eq!(
            store.last_update("ORDERS").await.unwrap(),
            "2024-01-03T00:00:00"
        );
    }

    #[tokio::test]
    async fn test_advance_is_idempotent() {
        let warehouse = provisioned_warehouse();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        store.advance("ORDERS", "2024-01-03T00:00:00").await.unwrap();
        store.advance("ORDERS", "2024-01-03T00:00:00").await.unwrap();

        let rows = warehouse.rows("CONFIG_TABLES").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1].as_deref(), Some("2024-01-03T00:00:00"));
    }

    #[tokio::test]
    async fn test_advance_zero_rows_matched_is_not_found() {
        let warehouse = provisioned_warehouse();
        let config = config();
        let store = WatermarkStore::new(&warehouse, &config);

        let err = store
            .advance("CUSTOMERS", "2024-01-03T00:00:00")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EtlError::Config(ConfigError::NotFound { ref table }) if table.as_str() == "CUSTOMERS"
        ));
    }
}
