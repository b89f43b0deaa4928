// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference entity schemas.
//!
//! One struct per catalog endpoint. Fields the API may omit default at the
//! boundary so downstream code never has to guess at a payload's shape.

use serde::Deserialize;
use tyria_core::{CatalogEntry, Rarity};

/// `items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub vendor_value: u64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub chat_link: Option<String>,
}

impl CatalogEntry for Item {
    type Id = u32;
    const ENDPOINT: &'static str = "items";
    const BULK: bool = false;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `materials`: a material storage category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialCategory {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<u32>,
    #[serde(default)]
    pub order: u32,
}

impl CatalogEntry for MaterialCategory {
    type Id = u32;
    const ENDPOINT: &'static str = "materials";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `currencies`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Currency {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: u32,
}

impl CatalogEntry for Currency {
    type Id = u32;
    const ENDPOINT: &'static str = "currencies";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `specializations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Specialization {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub elite: bool,
    #[serde(default)]
    pub minor_traits: Vec<u32>,
    #[serde(default)]
    pub major_traits: Vec<u32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

impl CatalogEntry for Specialization {
    type Id = u32;
    const ENDPOINT: &'static str = "specializations";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `traits`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trait {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specialization: Option<u32>,
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub slot: String,
}

impl CatalogEntry for Trait {
    type Id = u32;
    const ENDPOINT: &'static str = "traits";
    const BULK: bool = false;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `skins`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Skin {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl CatalogEntry for Skin {
    type Id = u32;
    const ENDPOINT: &'static str = "skins";
    const BULK: bool = false;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `outfits`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Outfit {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub unlock_items: Vec<u32>,
}

impl CatalogEntry for Outfit {
    type Id = u32;
    const ENDPOINT: &'static str = "outfits";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `titles`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Title {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub achievements: Vec<u32>,
    #[serde(default)]
    pub ap_required: Option<u32>,
}

impl CatalogEntry for Title {
    type Id = u32;
    const ENDPOINT: &'static str = "titles";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// One level of a mastery track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MasteryLevel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub point_cost: u32,
    #[serde(default)]
    pub exp_cost: u64,
}

/// `masteries`: a mastery track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mastery {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub levels: Vec<MasteryLevel>,
}

impl CatalogEntry for Mastery {
    type Id = u32;
    const ENDPOINT: &'static str = "masteries";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `mailcarriers`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MailCarrier {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub unlock_items: Vec<u32>,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl CatalogEntry for MailCarrier {
    type Id = u32;
    const ENDPOINT: &'static str = "mailcarriers";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `mounts/skins`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MountSkin {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub mount: String,
}

impl CatalogEntry for MountSkin {
    type Id = u32;
    const ENDPOINT: &'static str = "mounts/skins";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `gliders`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Glider {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub unlock_items: Vec<u32>,
}

impl CatalogEntry for Glider {
    type Id = u32;
    const ENDPOINT: &'static str = "gliders";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `home/nodes`: a gathering node for the home instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HomeNode {
    pub id: String,
}

impl CatalogEntry for HomeNode {
    type Id = String;
    const ENDPOINT: &'static str = "home/nodes";
    const BULK: bool = true;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// `home/cats`: a cat for the home instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HomeCat {
    pub id: u32,
    #[serde(default)]
    pub hint: Option<String>,
}

impl CatalogEntry for HomeCat {
    type Id = u32;
    const ENDPOINT: &'static str = "home/cats";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `worlds`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct World {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub population: String,
}

impl CatalogEntry for World {
    type Id = u32;
    const ENDPOINT: &'static str = "worlds";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `backstory/questions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackstoryQuestion {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub races: Option<Vec<String>>,
    #[serde(default)]
    pub professions: Option<Vec<String>>,
}

impl CatalogEntry for BackstoryQuestion {
    type Id = u32;
    const ENDPOINT: &'static str = "backstory/questions";
    const BULK: bool = true;

    fn id(&self) -> u32 {
        self.id
    }
}

/// `backstory/answers`. IDs look like `"<question>-<answer>"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackstoryAnswer {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub journal: String,
    pub question: u32,
    #[serde(default)]
    pub professions: Option<Vec<String>>,
    #[serde(default)]
    pub races: Option<Vec<String>>,
}

impl CatalogEntry for BackstoryAnswer {
    type Id = String;
    const ENDPOINT: &'static str = "backstory/answers";
    const BULK: bool = true;

    fn id(&self) -> String {
        self.id.clone()
    }
}
