//! Correlates two independently-arriving sensor streams, geolocation
//! fixes and WiFi scan results, into a single ordered, versioned,
//! append-only record log suitable for later analysis or bulk upload.
//!
//! The embedding layer supplies the platform glue (a [`ScanProvider`]
//! implementation plus location pushes) and talks to a single
//! [`Orchestrator`] facade; the crate owns the rescan cadence, SSID
//! filtering, record formatting and the append-only write discipline.

pub mod channel;
pub mod filter;
pub mod formatter;
pub mod location;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod scan;
pub mod session;
pub mod settings;
pub mod uploader;
pub mod writer;

pub use channel::{to_channel, OutOfRangeFrequency};
pub use filter::SsidFilter;
pub use location::{LocationFix, LocationTracker};
pub use models::record::{LogRecord, SpecialCode, SCHEMA_VERSION};
pub use models::scan::{ScanCycleResult, WifiObservation};
pub use orchestrator::{Orchestrator, PipelineStats};
pub use providers::{scan_result_channel, ScanProvider};
pub use session::SessionContext;
pub use settings::{SettingsStore, UserSettings};
pub use writer::LogWriter;

/// Initializes the process-wide logger from `RUST_LOG`, defaulting to
/// info. Call once from the embedding layer's startup path.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
