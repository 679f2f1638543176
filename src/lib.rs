// ABOUTME: Incremental delta extraction utilities for warehouse ETL pipelines
// ABOUTME: Tracks per-table watermarks and exposes lazy delta scans over a warehouse seam

pub mod config;
pub mod delta;
pub mod error;
pub mod scan;
pub mod types;
pub mod warehouse;

pub use config::EtlConfig;
pub use delta::{DeltaReader, WatermarkStore};
pub use error::{ConfigError, DataError, EtlError};
pub use scan::{CmpOp, Predicate, TableScan};
pub use types::{is_simple_type, DataType};
pub use warehouse::{MemWarehouse, PgWarehouse, Warehouse};
