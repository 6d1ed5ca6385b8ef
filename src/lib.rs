pub mod analyzer;
pub mod config;
pub mod enhancement;
pub mod models;
pub mod scoring;

pub use analyzer::BiomarkerAnalyzer;
pub use config::EnhancementConfig;
pub use enhancement::types::{EnhancedAnalysisResults, EnhancementStatus, ServiceHealth};
pub use models::{AnalysisResults, BiomarkerData};
pub use scoring::reference::RangeCatalog;
pub use scoring::{AnalysisError, ConfigError};

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` wins over the default
/// filter. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
