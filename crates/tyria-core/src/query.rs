// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-parameter builder for API requests.
//!
//! Account-scoped requests carry `access_token`, full catalogs use `ids=all`,
//! and bulk lookups join IDs with commas.

use std::fmt;

const ACCESS_TOKEN: &str = "access_token";
const IDS: &str = "ids";

/// Ordered list of query parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ids=all`.
    pub fn all() -> Self {
        Self::new().with(IDS, "all")
    }

    /// `ids=<id1>,<id2>,...`.
    pub fn ids<I: fmt::Display>(ids: &[I]) -> Self {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::new().with(IDS, joined)
    }

    /// Appends a parameter, replacing any existing value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Appends `access_token=<token>`.
    pub fn with_token(self, token: &str) -> Self {
        self.with(ACCESS_TOKEN, token)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The query string with the access token masked, for logging.
    pub fn redacted(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        self.params
            .iter()
            .map(|(k, v)| {
                if redact && k == ACCESS_TOKEN {
                    format!("{k}={}", crate::types::mask_token(v))
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_comma_joined() {
        let q = Query::ids(&[1u32, 2, 3]);
        assert_eq!(q.to_string(), "ids=1,2,3");
    }

    #[test]
    fn string_ids_are_comma_joined() {
        let q = Query::ids(&["7-54".to_string(), "10-67".to_string()]);
        assert_eq!(q.get("ids"), Some("7-54,10-67"));
    }

    #[test]
    fn token_is_appended_and_redacted() {
        let q = Query::all().with_token("0123456789ABCDEF");
        assert_eq!(q.to_string(), "ids=all&access_token=0123456789ABCDEF");
        assert_eq!(q.redacted(), "ids=all&access_token=01234567…");
    }

    #[test]
    fn with_replaces_existing_key() {
        let q = Query::new().with("lang", "en").with("lang", "de");
        assert_eq!(q.pairs().len(), 1);
        assert_eq!(q.get("lang"), Some("de"));
    }
}
