// ABOUTME: Runtime configuration for the delta extraction utilities
// ABOUTME: Replaces process-wide constants so pipelines can target different environments

use serde::{Deserialize, Serialize};

/// Conventional fully-qualified name of the watermark configuration table.
pub const DEFAULT_CONFIG_TABLE: &str = "UTILS.CONFIG.DEV_CONFIG_TABLES";

/// Conventional name of the timestamp column every source table exposes.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "current_timestamp";

/// Configuration shared by the watermark store and the delta reader.
///
/// Passed explicitly into each constructor rather than read from globals, so
/// tests and multi-environment deployments can run side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Fully-qualified name of the table holding per-table watermarks.
    pub config_table: String,
    /// Column compared against the watermark when fetching deltas.
    pub timestamp_column: String,
}

impl EtlConfig {
    pub fn new(config_table: impl Into<String>, timestamp_column: impl Into<String>) -> Self {
        Self {
            config_table: config_table.into(),
            timestamp_column: timestamp_column.into(),
        }
    }
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_TABLE, DEFAULT_TIMESTAMP_COLUMN)
    }
}
