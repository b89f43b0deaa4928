// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schemas for account-scoped endpoints.

use serde::Deserialize;
use tyria_core::GameMode;

/// `account`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub world: u32,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub age: u64,
    #[serde(default)]
    pub access: Vec<String>,
    #[serde(default)]
    pub commander: bool,
}

/// One populated slot in a bag, the shared inventory or the bank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventorySlot {
    pub id: u32,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub bound_to: Option<String>,
}

fn one() -> u32 {
    1
}

/// A character bag. Empty slots are `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bag {
    pub id: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub inventory: Vec<Option<InventorySlot>>,
}

/// An equipped item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquipmentPiece {
    pub id: u32,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub bound_to: Option<String>,
}

/// A specialization chosen in one of a build's three lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecializationSelection {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub traits: Vec<Option<u32>>,
}

/// Specialization lines per game mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpecializationSet {
    #[serde(default)]
    pub pve: Vec<Option<SpecializationSelection>>,
    #[serde(default)]
    pub pvp: Vec<Option<SpecializationSelection>>,
    #[serde(default)]
    pub wvw: Vec<Option<SpecializationSelection>>,
}

impl SpecializationSet {
    pub fn mode(&self, mode: GameMode) -> &[Option<SpecializationSelection>] {
        match mode {
            GameMode::Pve => &self.pve,
            GameMode::Pvp => &self.pvp,
            GameMode::Wvw => &self.wvw,
        }
    }
}

/// `characters/<name>` or an entry of `characters?ids=all`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub age: u64,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub backstory: Vec<String>,
    #[serde(default)]
    pub bags: Vec<Option<Bag>>,
    #[serde(default)]
    pub equipment: Vec<EquipmentPiece>,
    #[serde(default)]
    pub specializations: SpecializationSet,
}

/// `account/materials`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialSlot {
    pub id: u32,
    #[serde(default)]
    pub category: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub binding: Option<String>,
}

/// `account/wallet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WalletEntry {
    pub id: u32,
    pub value: u64,
}

/// `account/masteries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MasteryProgress {
    pub id: u32,
    #[serde(default)]
    pub level: u32,
}

/// `account/home/cats`: bare IDs, or `{id, hint}` objects from older API
/// versions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HomeCatEntry {
    Id(u32),
    Detailed {
        id: u32,
        #[serde(default)]
        hint: Option<String>,
    },
}

impl HomeCatEntry {
    pub fn id(&self) -> u32 {
        match self {
            HomeCatEntry::Id(id) | HomeCatEntry::Detailed { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bags_keep_null_slots() {
        let bag: Bag = serde_json::from_value(json!({
            "id": 8932, "size": 3,
            "inventory": [null, {"id": 19697, "count": 250}, null]
        }))
        .unwrap();
        assert_eq!(bag.inventory.len(), 3);
        assert!(bag.inventory[0].is_none());
        assert_eq!(bag.inventory[1].as_ref().map(|s| s.count), Some(250));
    }

    #[test]
    fn slot_count_defaults_to_one() {
        let slot: InventorySlot = serde_json::from_value(json!({"id": 5})).unwrap();
        assert_eq!(slot.count, 1);
    }

    #[test]
    fn home_cats_accept_both_shapes() {
        let cats: Vec<HomeCatEntry> =
            serde_json::from_value(json!([1, {"id": 2, "hint": "chicken"}])).unwrap();
        assert_eq!(cats.iter().map(HomeCatEntry::id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn character_without_specializations_decodes() {
        let character: Character = serde_json::from_value(json!({"name": "Solo"})).unwrap();
        assert!(character.specializations.mode(GameMode::Pvp).is_empty());
        assert!(character.bags.is_empty());
    }
}
