// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Tyria workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Currency ID of the primary in-game currency (gold/silver/copper).
pub const COIN_CURRENCY_ID: u32 = 1;

/// A user-supplied API key identifying one game account.
///
/// Identity is the token string. `Debug` masks the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Display name, usually the account name the token belongs to.
    pub name: String,
    /// The API key.
    pub token: String,
    /// Optional free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Credential {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// First eight characters of the token followed by an ellipsis.
    pub fn masked_token(&self) -> String {
        mask_token(&self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("token", &self.masked_token())
            .field("description", &self.description)
            .finish()
    }
}

/// Masks an API token for logs and listings.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}…")
}

/// Item and skin rarity tiers, in ascending order.
///
/// `Unknown` absorbs values this build does not recognise and sorts below
/// every named tier.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(from = "String")]
pub enum Rarity {
    #[default]
    Unknown,
    Junk,
    Basic,
    Fine,
    Masterwork,
    Rare,
    Exotic,
    Ascended,
    Legendary,
}

impl From<String> for Rarity {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// The primary currency split into its three display denominations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins {
    pub gold: u64,
    pub silver: u8,
    pub copper: u8,
}

impl Coins {
    /// Decomposes a raw copper amount.
    pub fn from_copper(value: u64) -> Self {
        Self {
            gold: value / 10_000,
            silver: ((value / 100) % 100) as u8,
            copper: (value % 100) as u8,
        }
    }

    pub fn to_copper(self) -> u64 {
        self.gold * 10_000 + u64::from(self.silver) * 100 + u64::from(self.copper)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g {}s {}c", self.gold, self.silver, self.copper)
    }
}

/// Game modes that carry their own specialization build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Pve,
    Pvp,
    Wvw,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Pve, GameMode::Pvp, GameMode::Wvw];
}
