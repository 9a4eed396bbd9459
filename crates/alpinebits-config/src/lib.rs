//! Settings of an AlpineBits dispatch deployment.
//!
//! [`ConfigLoader`] layers its sources in call order, each one replacing the
//! whole document or single keys of the previous: built-in defaults, one
//! TOML or JSON file, then `PREFIX__SECTION__KEY` environment variables.
//! Unknown keys in files are errors; unknown variables are ignored.
//!
//! ```toml
//! service_name = "pms-gateway"
//!
//! [dispatch]
//! enabled_versions = ["2022-10", "2024-10"]
//! capture_errors = true
//!
//! [logging]
//! level = "alpinebits_router=debug,info"
//! format = "pretty"
//!
//! [metrics]
//! duration_buckets = [0.001, 0.01, 0.1, 1.0]
//! ```
//!
//! The same settings as overrides, lists comma-separated:
//! `ALPINEBITS__DISPATCH__ENABLED_VERSIONS=2022-10,2024-10` and
//! `ALPINEBITS__LOGGING__FORMAT=pretty`.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AlpineBitsConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DispatchConfig, LogFormat, LoggingConfig, MetricsConfig};
