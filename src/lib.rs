//! Symptom Flux - On-device engine for cycle-aware symptom tracking
//!
//! Flux turns daily self-reported symptom severities into canonical entries
//! tagged with their birth-control cycle phase, then derives running averages
//! and windowed chart series through a deterministic pipeline:
//! raw fields → normalization → append-only store → aggregation / series → report.
//!
//! ## Modules
//!
//! - **Cycle**: resolve a cycle-day label ("Day 9", "Break Day 2") to a phase
//! - **Normalizer / Store**: build immutable entries and keep them in insertion order
//! - **Aggregate / Series**: averages, severity bands, dashboard and chart points

pub mod aggregate;
pub mod config;
pub mod cycle;
pub mod encoder;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod series;
pub mod store;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregate::{average_of, averages};
pub use config::TrackerConfig;
pub use cycle::resolve_phase;
pub use error::TrackerError;
pub use normalizer::{EntryNormalizer, RawEntry};
pub use pipeline::{entries_to_dashboard, TrackerSession};
pub use series::build_series;
pub use store::EntryStore;
pub use types::{CyclePhase, SeverityBand, SymptomEntry, SymptomKey, SymptomSeverities};

/// Engine version embedded in every report
pub const TRACKER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "symptom-flux";
