// ABOUTME: Error taxonomy for delta extraction - ConfigError for watermark store issues
// ABOUTME: and DataError for source-table query, aggregation, and filter failures

use thiserror::Error;

/// Top-level error for every delta extraction operation.
///
/// Callers see this small taxonomy instead of raw engine failures; the
/// original engine error travels along as the wrapped cause.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Raised when the watermark configuration store cannot be read or updated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration record exists for the table.
    ///
    /// Also raised when a watermark update matches zero records, so a typo'd
    /// table name cannot silently no-op.
    #[error("no configuration found for table {table}")]
    NotFound { table: String },

    /// The watermark lookup query itself failed.
    #[error("failed to retrieve last update date for {table}: {cause:#}")]
    Lookup { table: String, cause: anyhow::Error },

    /// The watermark update statement failed to execute.
    #[error("failed to update configuration for {table}: {cause:#}")]
    Update { table: String, cause: anyhow::Error },
}

/// Raised when a source-table query, aggregation, or filter fails.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to find delta records for {table}: {cause:#}")]
    Delta { table: String, cause: anyhow::Error },

    #[error("failed to find latest timestamp: {cause:#}")]
    LatestTimestamp { cause: anyhow::Error },

    /// The maximum timestamp is undefined on an empty result set. Callers
    /// must only extract timestamps from non-empty, already-filtered deltas.
    #[error("cannot compute latest timestamp of an empty result set")]
    EmptyResult,

    #[error("failed to remove null rows: {cause:#}")]
    NullRowFilter { cause: anyhow::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_config_error_messages_carry_table_and_cause() {
        let err = ConfigError::Lookup {
            table: "ORDERS".to_string(),
            cause: anyhow!("connection refused"),
        };
        let msg = err.to_string();
        assert!(msg.contains("ORDERS"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_not_found_message() {
        let err = ConfigError::NotFound {
            table: "ORDERS".to_string(),
        };
        assert_eq!(err.to_string(), "no configuration found for table ORDERS");
    }

    #[test]
    fn test_etl_error_wraps_both_kinds() {
        let config: EtlError = ConfigError::NotFound {
            table: "T".to_string(),
        }
        .into();
        assert!(matches!(config, EtlError::Config(_)));

        let data: EtlError = DataError::EmptyResult.into();
        assert!(matches!(data, EtlError::Data(_)));
    }

    #[test]
    fn test_cause_chain_is_preserved_in_message() {
        let source = anyhow!("permission denied").context("executing count query");
        let err = DataError::Delta {
            table: "ORDERS".to_string(),
            cause: source,
        };
        let msg = err.to_string();
        assert!(msg.contains("executing count query"));
        assert!(msg.contains("permission denied"));
    }
}
