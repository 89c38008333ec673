//! LOS CLI - command line tools for radar line-of-sight coverage.
//!
//! Binaries:
//! - los-coverage: sample terrain around a receiver and write GeoJSON
//! - elevation-lookup: single-point elevation query

pub mod args;
pub mod config;
pub mod geojson;
pub mod logging;

pub use args::ReceiverArgs;
pub use config::Config;
pub use geojson::feature_collection;
pub use logging::init_tracing;
