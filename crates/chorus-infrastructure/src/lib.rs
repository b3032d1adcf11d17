//! Adapters binding the Chorus ports to real infrastructure: TOML storage
//! for saved agents, tracing-backed call analytics, and telemetry setup.

pub mod analytics;
pub mod telemetry;
pub mod toml_repository;

pub use analytics::{CallRecord, TracingAnalytics, TransitionRecord};
pub use telemetry::init_tracing;
pub use toml_repository::TomlSpecRepository;
