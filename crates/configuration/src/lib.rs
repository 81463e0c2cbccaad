use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use overrides::InputOverrides;
pub use settings::{AdviceThresholds, AnalysisConfig, InputFiles, Parsing, Statistics};

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "analysis.toml";

/// Loads the analysis configuration.
///
/// With an explicit `path` the file must exist. Without one, `analysis.toml` in the
/// working directory is read if present and the built-in defaults are used otherwise.
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let source = match path {
        Some(path) => config::File::from(path),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder().add_source(source).build()?;

    // Attempt to deserialize the entire configuration into our `AnalysisConfig` struct
    let config = builder.try_deserialize::<AnalysisConfig>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded analysis configuration");
    Ok(config)
}
