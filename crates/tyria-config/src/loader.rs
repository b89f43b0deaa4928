// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./tyria.toml` > `~/.config/tyria/tyria.toml` > `/etc/tyria/tyria.toml`,
//! with environment variable overrides via the `TYRIA_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::debug;

use crate::model::TyriaConfig;

const SYSTEM_CONFIG: &str = "/etc/tyria/tyria.toml";
const LOCAL_CONFIG: &str = "tyria.toml";

/// Sections recognised in `TYRIA_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["api", "retry", "batch", "storage", "logging"];

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tyria").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tyria/tyria.toml`
/// 3. `~/.config/tyria/tyria.toml`
/// 4. `./tyria.toml`
/// 5. `TYRIA_*` environment variables
pub fn load_config() -> Result<TyriaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TyriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TyriaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TyriaConfig, figment::Error> {
    debug!(path = %path.display(), "merging config file");
    Figment::new()
        .merge(Serialized::defaults(TyriaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let user = user_config_path().unwrap_or_default();
    for path in [Path::new(SYSTEM_CONFIG), user.as_path(), Path::new(LOCAL_CONFIG)] {
        if path.is_file() {
            debug!(path = %path.display(), "merging config file");
        }
    }
    Figment::new()
        .merge(Serialized::defaults(TyriaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(&user))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Maps `TYRIA_BATCH_MAX_BATCH_SIZE` to `batch.max_batch_size`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores keep them. Variables outside a known section
/// (e.g. `TYRIA_LOG`) are left alone.
fn env_provider() -> Env {
    Env::prefixed("TYRIA_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS
                .iter()
                .any(|section| key.starts_with(&format!("{section}_")))
        })
        .map(|key| {
            let key = key.as_str().to_ascii_lowercase();
            let mapped = ENV_SECTIONS
                .iter()
                .find_map(|section| {
                    key.strip_prefix(section)
                        .and_then(|rest| rest.strip_prefix('_'))
                        .map(|rest| format!("{section}.{rest}"))
                })
                .unwrap_or(key.clone());
            mapped.into()
        })
}

/// Config files that exist on disk, as `(path, content)` pairs for
/// diagnostic span lookup.
pub fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![PathBuf::from(SYSTEM_CONFIG)];
    candidates.extend(user_config_path());
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join(LOCAL_CONFIG))
            .unwrap_or_else(|_| PathBuf::from(LOCAL_CONFIG)),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TYRIA_BATCH_MAX_BATCH_SIZE", "50");
            jail.set_env("TYRIA_RETRY_RETRY_DELAY_MS", "10");
            jail.set_env("TYRIA_API_BASE_URL", "http://localhost:9999/v2");
            let config = load_config().expect("env overrides should load");
            assert_eq!(config.batch.max_batch_size, 50);
            assert_eq!(config.retry.retry_delay_ms, 10);
            assert_eq!(config.api.base_url, "http://localhost:9999/v2");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tyria.toml", "[logging]\nlevel = \"debug\"\n")?;
            let config = load_config().expect("local file should load");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.retry.max_retries, 3);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[batch]\nmax_concurrent_batches = 2\n")?;
            let config = load_config_from_path(Path::new("custom.toml")).expect("should load");
            assert_eq!(config.batch.max_concurrent_batches, 2);
            Ok(())
        });
    }
}
