// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Tyria account data layer.
//!
//! TOML files merged with `TYRIA_*` environment overrides through Figment,
//! strict key checking, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use tyria_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API root: {}", config.api.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ApiConfig, BatchConfig, LoggingConfig, RetryConfig, StorageConfig, TyriaConfig};

use tracing::{debug, warn};

fn validated(config: TyriaConfig) -> Result<TyriaConfig, Vec<ConfigError>> {
    validation::validate_config(&config).map_err(rejected)?;
    debug!(
        base_url = %config.api.base_url,
        max_batch_size = config.batch.max_batch_size,
        "configuration loaded"
    );
    Ok(config)
}

fn rejected(errors: Vec<ConfigError>) -> Vec<ConfigError> {
    warn!(count = errors.len(), "configuration rejected");
    errors
}

/// Load configuration from the file hierarchy and validate it.
pub fn load_and_validate() -> Result<TyriaConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => validated(config),
        Err(err) => Err(rejected(diagnostic::figment_to_config_errors(
            err,
            &loader::collect_toml_sources(),
        ))),
    }
}

/// Load configuration from an explicit file and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<TyriaConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => validated(config),
        Err(err) => {
            let sources: Vec<(String, String)> = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(rejected(diagnostic::figment_to_config_errors(err, &sources)))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<TyriaConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validated(config),
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(rejected(diagnostic::figment_to_config_errors(err, &sources)))
        }
    }
}
