// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{API_MAX_BATCH_SIZE, TyriaConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &TyriaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        fail("api.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!("api.base_url `{base_url}` must start with http:// or https://"));
    }

    if config.api.timeout_secs == 0 {
        fail("api.timeout_secs must be at least 1".to_string());
    }

    if !(1..=API_MAX_BATCH_SIZE).contains(&config.batch.max_batch_size) {
        fail(format!(
            "batch.max_batch_size must be between 1 and {API_MAX_BATCH_SIZE}, got {}",
            config.batch.max_batch_size
        ));
    }

    if config.batch.max_concurrent_batches == 0 {
        fail("batch.max_concurrent_batches must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
