// ABOUTME: The incremental-checkpoint operations for silver-layer extraction
// ABOUTME: Read watermark, fetch delta, filter null rows, extract latest timestamp, advance watermark

pub mod reader;
pub mod watermark;

pub use reader::DeltaReader;
pub use watermark::WatermarkStore;
