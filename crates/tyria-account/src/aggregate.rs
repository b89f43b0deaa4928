// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account aggregate builder.
//!
//! Fetches every account-scoped item source concurrently, resolves all item
//! IDs they mention in one resolver call, and flattens the slots into rows
//! tagged with where the item sits. Each source is its own failure domain: a
//! failed bank request leaves the characters and wallet intact.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use strum::{Display, IntoStaticStr};
use tracing::{debug, info, warn};
use tyria_cache::entities::{Currency, Item, MaterialCategory};
use tyria_cache::{Lookup, ReferenceCache};
use tyria_core::{
    ApiError, COIN_CURRENCY_ID, Coins, Query, Rarity, ResourceFetcher, TyriaError, fetch_json,
};

use crate::owned::{Character, InventorySlot, MaterialSlot, WalletEntry};
use crate::scope::CredentialScope;

/// Where an item row lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A character's bags or equipment.
    Character(String),
    /// Bank slot, 1-based.
    Bank(usize),
    /// Material storage slot, 1-based.
    Vault(usize),
    SharedInventory,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Character(name) => f.write_str(name),
            Location::Bank(slot) => write!(f, "Bank|{slot}"),
            Location::Vault(slot) => write!(f, "Vault|{slot}"),
            Location::SharedInventory => f.write_str("Shared Inventory"),
        }
    }
}

/// One item stack or equipped piece.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub item_id: u32,
    pub count: u32,
    pub location: Location,
    /// Equipment slot name for worn items.
    pub equipment_slot: Option<String>,
    pub binding: Option<String>,
    pub item: Option<Arc<Item>>,
}

impl InventoryRow {
    /// Item name, or a placeholder naming the ID when the item is unknown.
    pub fn name(&self) -> String {
        match &self.item {
            Some(item) => item.name.clone(),
            None => format!("Unknown item #{}", self.item_id),
        }
    }

    pub fn rarity(&self) -> Rarity {
        self.item.as_ref().map(|i| i.rarity).unwrap_or_default()
    }
}

/// A character with its bag and equipment rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRows {
    pub name: String,
    pub profession: String,
    pub level: u32,
    pub rows: Vec<InventoryRow>,
}

/// A non-empty material storage slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRow {
    pub item_id: u32,
    pub count: u32,
    pub location: Location,
    pub category_id: u32,
    pub category_name: Option<String>,
    pub item: Option<Arc<Item>>,
}

/// A wallet balance.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRow {
    pub currency_id: u32,
    pub value: u64,
    pub currency: Option<Arc<Currency>>,
    /// Set for the primary currency only.
    pub coins: Option<Coins>,
}

/// An account-scoped source feeding the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Characters,
    SharedInventory,
    Bank,
    Materials,
    Wallet,
}

impl Source {
    pub fn endpoint(self) -> &'static str {
        match self {
            Source::Characters => "characters",
            Source::SharedInventory => "account/inventory",
            Source::Bank => "account/bank",
            Source::Materials => "account/materials",
            Source::Wallet => "account/wallet",
        }
    }
}

/// A source that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: Source,
    pub error: ApiError,
}

/// Everything the account holds, enriched with reference data.
#[derive(Debug, Clone)]
pub struct AccountAggregate {
    pub characters: Result<Vec<CharacterRows>, ApiError>,
    pub shared_inventory: Result<Vec<InventoryRow>, ApiError>,
    pub bank: Result<Vec<InventoryRow>, ApiError>,
    pub materials: Result<Vec<MaterialRow>, ApiError>,
    pub wallet: Result<Vec<WalletRow>, ApiError>,
    pub failures: Vec<SourceFailure>,
    /// Rows whose item could not be resolved.
    pub unresolved: usize,
}

impl AccountAggregate {
    /// Every item row from characters, shared inventory and bank.
    pub fn item_rows(&self) -> Vec<&InventoryRow> {
        let characters = self
            .characters
            .iter()
            .flatten()
            .flat_map(|c| c.rows.iter());
        characters
            .chain(self.shared_inventory.iter().flatten())
            .chain(self.bank.iter().flatten())
            .collect()
    }

    /// Total count of `item_id` across every item source and material storage.
    pub fn total_count(&self, item_id: u32) -> u64 {
        let rows: u64 = self
            .item_rows()
            .into_iter()
            .filter(|r| r.item_id == item_id)
            .map(|r| u64::from(r.count))
            .sum();
        let materials: u64 = self
            .materials
            .iter()
            .flatten()
            .filter(|r| r.item_id == item_id)
            .map(|r| u64::from(r.count))
            .sum();
        rows + materials
    }

    pub fn coins(&self) -> Option<Coins> {
        self.wallet
            .as_ref()
            .ok()?
            .iter()
            .find_map(|row| row.coins)
    }
}

/// Presentation order: rarity descending, then name.
pub fn sort_rows(rows: &mut [InventoryRow]) {
    rows.sort_by(compare_rows);
}

fn compare_rows(a: &InventoryRow, b: &InventoryRow) -> Ordering {
    b.rarity()
        .cmp(&a.rarity())
        .then_with(|| a.name().cmp(&b.name()))
}

/// Rows for occupied slots. Empty slots contribute nothing.
pub fn slot_rows<L, F>(slots: &[Option<InventorySlot>], location: F, items: &L) -> Vec<InventoryRow>
where
    L: Lookup<u32, Item> + ?Sized,
    F: Fn(usize) -> Location,
{
    slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            let slot = slot.as_ref()?;
            Some(InventoryRow {
                item_id: slot.id,
                count: slot.count,
                location: location(index),
                equipment_slot: None,
                binding: slot.binding.clone(),
                item: items.lookup(&slot.id),
            })
        })
        .collect()
}

/// Bag and equipment rows for one character.
pub fn character_rows<L>(character: &Character, items: &L) -> CharacterRows
where
    L: Lookup<u32, Item> + ?Sized,
{
    let location = || Location::Character(character.name.clone());
    let mut rows: Vec<InventoryRow> = character
        .bags
        .iter()
        .flatten()
        .flat_map(|bag| slot_rows(&bag.inventory, |_| location(), items))
        .collect();
    rows.extend(character.equipment.iter().map(|piece| InventoryRow {
        item_id: piece.id,
        count: 1,
        location: location(),
        equipment_slot: piece.slot.clone(),
        binding: piece.binding.clone(),
        item: items.lookup(&piece.id),
    }));
    CharacterRows {
        name: character.name.clone(),
        profession: character.profession.clone(),
        level: character.level,
        rows,
    }
}

/// Material storage rows, skipping empty stacks.
pub fn material_rows<L, C>(slots: &[MaterialSlot], items: &L, categories: &C) -> Vec<MaterialRow>
where
    L: Lookup<u32, Item> + ?Sized,
    C: Lookup<u32, MaterialCategory> + ?Sized,
{
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.count > 0)
        .map(|(index, slot)| MaterialRow {
            item_id: slot.id,
            count: slot.count,
            location: Location::Vault(index + 1),
            category_id: slot.category,
            category_name: categories.lookup(&slot.category).map(|c| c.name.clone()),
            item: items.lookup(&slot.id),
        })
        .collect()
}

/// Wallet rows with the primary currency split into coins.
pub fn wallet_rows<C>(entries: &[WalletEntry], currencies: &C) -> Vec<WalletRow>
where
    C: Lookup<u32, Currency> + ?Sized,
{
    entries
        .iter()
        .map(|entry| WalletRow {
            currency_id: entry.id,
            value: entry.value,
            currency: currencies.lookup(&entry.id),
            coins: (entry.id == COIN_CURRENCY_ID).then(|| Coins::from_copper(entry.value)),
        })
        .collect()
}

fn record<T>(source: Source, result: &Result<T, ApiError>, failures: &mut Vec<SourceFailure>) {
    if let Err(error) = result {
        warn!(source = %source, error = %error, "account source failed");
        failures.push(SourceFailure {
            source,
            error: error.clone(),
        });
    }
}

/// Builds the aggregate for the credential in `scope`.
pub async fn build_aggregate(
    fetcher: &dyn ResourceFetcher,
    cache: &ReferenceCache,
    scope: &CredentialScope,
) -> Result<AccountAggregate, TyriaError> {
    let token = scope
        .token()
        .ok_or_else(|| TyriaError::Credential("no active credential".into()))?;
    let authed = Query::new().with_token(token);
    let all_authed = Query::all().with_token(token);

    let (characters, shared, bank, materials, wallet, categories_loaded, currencies_loaded) =
        futures::join!(
            fetch_json::<Vec<Character>>(fetcher, Source::Characters.endpoint(), &all_authed),
            fetch_json::<Vec<Option<InventorySlot>>>(
                fetcher,
                Source::SharedInventory.endpoint(),
                &authed
            ),
            fetch_json::<Vec<Option<InventorySlot>>>(fetcher, Source::Bank.endpoint(), &authed),
            fetch_json::<Vec<MaterialSlot>>(fetcher, Source::Materials.endpoint(), &authed),
            fetch_json::<Vec<WalletEntry>>(fetcher, Source::Wallet.endpoint(), &authed),
            cache.materials.load_all(),
            cache.currencies.load_all(),
        );
    let catalogs = [
        ("materials", &categories_loaded),
        ("currencies", &currencies_loaded),
    ];
    for (name, loaded) in catalogs {
        if let Err(error) = loaded {
            warn!(
                catalog = name,
                error = %error,
                "reference catalog unavailable, names will be missing"
            );
        }
    }

    let mut failures = Vec::new();
    record(Source::Characters, &characters, &mut failures);
    record(Source::SharedInventory, &shared, &mut failures);
    record(Source::Bank, &bank, &mut failures);
    record(Source::Materials, &materials, &mut failures);
    record(Source::Wallet, &wallet, &mut failures);

    let mut item_ids: Vec<u32> = Vec::new();
    if let Ok(characters) = &characters {
        for character in characters {
            let bag_ids = character
                .bags
                .iter()
                .flatten()
                .flat_map(|bag| bag.inventory.iter().flatten().map(|s| s.id));
            item_ids.extend(bag_ids);
            item_ids.extend(character.equipment.iter().map(|piece| piece.id));
        }
    }
    for slots in [&shared, &bank].into_iter().flatten() {
        item_ids.extend(slots.iter().flatten().map(|s| s.id));
    }
    if let Ok(materials) = &materials {
        item_ids.extend(materials.iter().filter(|m| m.count > 0).map(|m| m.id));
    }

    let resolution = cache.items.load_by_ids(&item_ids).await;
    if !resolution.failures.is_empty() {
        warn!(
            failed_batches = resolution.failures.len(),
            "some items could not be resolved"
        );
    }
    debug!(
        requested = item_ids.len(),
        resolved = resolution.entries.len(),
        "item ids resolved"
    );
    let items = &cache.items;

    let characters = characters.map(|list| {
        list.iter()
            .map(|character| character_rows(character, items))
            .collect::<Vec<_>>()
    });
    let shared_inventory =
        shared.map(|slots| slot_rows(&slots, |_| Location::SharedInventory, items));
    let bank = bank.map(|slots| slot_rows(&slots, |index| Location::Bank(index + 1), items));
    let materials = materials.map(|slots| material_rows(&slots, items, &cache.materials));
    let wallet = wallet.map(|entries| wallet_rows(&entries, &cache.currencies));

    let mut aggregate = AccountAggregate {
        characters,
        shared_inventory,
        bank,
        materials,
        wallet,
        failures,
        unresolved: 0,
    };
    let unresolved_items = aggregate.item_rows().iter().filter(|r| r.item.is_none()).count();
    let unresolved_materials = aggregate
        .materials
        .iter()
        .flatten()
        .filter(|r| r.item.is_none())
        .count();
    aggregate.unresolved = unresolved_items + unresolved_materials;

    info!(
        generation = scope.generation(),
        failures = aggregate.failures.len(),
        unresolved = aggregate.unresolved,
        "account aggregate built"
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: u32, name: &str, rarity: Rarity) -> (u32, Arc<Item>) {
        (
            id,
            Arc::new(Item {
                id,
                name: name.into(),
                description: None,
                kind: "Trophy".into(),
                level: 0,
                rarity,
                vendor_value: 0,
                icon: None,
                flags: Vec::new(),
                chat_link: None,
            }),
        )
    }

    fn slot(id: u32, count: u32) -> Option<InventorySlot> {
        Some(InventorySlot {
            id,
            count,
            binding: None,
            bound_to: None,
        })
    }

    #[test]
    fn locations_render_as_tags() {
        assert_eq!(Location::Character("Rytlock".into()).to_string(), "Rytlock");
        assert_eq!(Location::Bank(3).to_string(), "Bank|3");
        assert_eq!(Location::Vault(1).to_string(), "Vault|1");
        assert_eq!(Location::SharedInventory.to_string(), "Shared Inventory");
    }

    #[test]
    fn empty_slots_contribute_nothing_and_indexes_are_one_based() {
        let items: HashMap<u32, Arc<Item>> = [item(1, "Ore", Rarity::Basic)].into_iter().collect();
        let slots = [None, slot(1, 5), None, slot(2, 1)];
        let rows = slot_rows(&slots, |i| Location::Bank(i + 1), &items);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, Location::Bank(2));
        assert_eq!(rows[1].location, Location::Bank(4));
        assert!(rows[0].item.is_some());
        assert!(rows[1].item.is_none(), "unknown item kept as a fallback row");
        assert_eq!(rows[1].name(), "Unknown item #2");
    }

    #[test]
    fn zero_count_materials_are_excluded() {
        let items: HashMap<u32, Arc<Item>> = HashMap::new();
        let categories: HashMap<u32, Arc<MaterialCategory>> = [(
            6,
            Arc::new(MaterialCategory {
                id: 6,
                name: "Basic Crafting Materials".into(),
                items: vec![],
                order: 0,
            }),
        )]
        .into_iter()
        .collect();
        let slots = vec![
            MaterialSlot {
                id: 10,
                category: 6,
                count: 0,
                binding: None,
            },
            MaterialSlot {
                id: 11,
                category: 6,
                count: 250,
                binding: None,
            },
            MaterialSlot {
                id: 12,
                category: 9,
                count: 0,
                binding: None,
            },
        ];

        let rows = material_rows(&slots, &items, &categories);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, 11);
        assert_eq!(rows[0].location, Location::Vault(2));
        assert_eq!(rows[0].category_name.as_deref(), Some("Basic Crafting Materials"));
    }

    #[test]
    fn coin_balance_is_decomposed() {
        let currencies: HashMap<u32, Arc<Currency>> = HashMap::new();
        let rows = wallet_rows(
            &[
                WalletEntry {
                    id: 1,
                    value: 123_456,
                },
                WalletEntry { id: 2, value: 900 },
            ],
            &currencies,
        );
        assert_eq!(
            rows[0].coins,
            Some(Coins {
                gold: 12,
                silver: 34,
                copper: 56
            })
        );
        assert_eq!(rows[0].coins.map(|c| c.to_string()).as_deref(), Some("12g 34s 56c"));
        assert_eq!(rows[1].coins, None);
    }

    #[test]
    fn sort_puts_higher_rarity_first_then_name() {
        let items: HashMap<u32, Arc<Item>> = [
            item(1, "Zinc", Rarity::Rare),
            item(2, "Amber", Rarity::Rare),
            item(3, "Dusk", Rarity::Legendary),
            item(4, "Trash", Rarity::Junk),
        ]
        .into_iter()
        .collect();
        let mut rows = slot_rows(
            &[slot(4, 1), slot(1, 1), slot(99, 1), slot(2, 1), slot(3, 1)],
            |_| Location::SharedInventory,
            &items,
        );
        sort_rows(&mut rows);
        let ids: Vec<u32> = rows.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4, 99]);
    }

    #[test]
    fn character_rows_tag_equipment_slots() {
        let character: Character = serde_json::from_value(serde_json::json!({
            "name": "Braham",
            "profession": "Warrior",
            "level": 80,
            "bags": [null, {"id": 9, "size": 2, "inventory": [{"id": 1, "count": 3}, null]}],
            "equipment": [{"id": 2, "slot": "Helm"}]
        }))
        .unwrap();
        let items: HashMap<u32, Arc<Item>> = [item(1, "Ore", Rarity::Basic)].into_iter().collect();

        let rows = character_rows(&character, &items);
        assert_eq!(rows.rows.len(), 2);
        assert!(rows.rows.iter().all(|r| r.location == Location::Character("Braham".into())));
        assert_eq!(rows.rows[1].equipment_slot.as_deref(), Some("Helm"));
        assert_eq!(rows.rows[1].count, 1);
    }
}
