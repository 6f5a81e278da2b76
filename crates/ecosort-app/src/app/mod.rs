//! Application use cases

mod scan_service;

pub use scan_service::{ImageInput, ScanOptions, ScanOutcome, ScanService};
