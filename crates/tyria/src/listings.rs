// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory, wallet, material and character listings.

use tyria_account::{
    AccountAggregate, AccountSession, CharacterDetail, InventoryRow, MaterialRow, WalletRow,
    sort_rows,
};
use tyria_core::TyriaError;

/// Prints failed sources to stderr so partial output is not mistaken for
/// the whole account.
fn report_failures(aggregate: &AccountAggregate) {
    for failure in &aggregate.failures {
        let reason = failure
            .error
            .user_message()
            .map(str::to_string)
            .unwrap_or_else(|| failure.error.to_string());
        eprintln!("warning: {} unavailable: {reason}", failure.source);
    }
    if aggregate.unresolved > 0 {
        eprintln!("warning: {} entries reference unknown items", aggregate.unresolved);
    }
}

fn format_item_rows(rows: &[InventoryRow]) -> String {
    rows.iter()
        .map(|row| {
            let slot = row
                .equipment_slot
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            format!(
                "{:>6}  {:<40} {:<10} {}{slot}\n",
                row.count,
                row.name(),
                row.rarity(),
                row.location
            )
        })
        .collect()
}

fn format_wallet(rows: &[WalletRow]) -> String {
    rows.iter()
        .map(|row| {
            let name = row
                .currency
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Currency #{}", row.currency_id));
            match row.coins {
                Some(coins) => format!("{name:<32} {coins}\n"),
                None => format!("{name:<32} {}\n", row.value),
            }
        })
        .collect()
}

fn format_materials(rows: &[MaterialRow]) -> String {
    rows.iter()
        .map(|row| {
            let name = row
                .item
                .as_ref()
                .map(|i| i.name.clone())
                .unwrap_or_else(|| format!("Unknown item #{}", row.item_id));
            let category = row.category_name.as_deref().unwrap_or("Uncategorized");
            format!("{:>6}  {name:<40} {category}\n", row.count)
        })
        .collect()
}

fn format_detail(detail: &CharacterDetail) -> String {
    let mut out = format!(
        "{} - level {} {} {}\n",
        detail.name, detail.level, detail.race, detail.profession
    );
    if !detail.backstory.is_empty() {
        out.push_str("\nBackstory\n");
        for entry in &detail.backstory {
            out.push_str(&format!("  {}: {}\n", entry.question.title, entry.answer.title));
        }
    }
    for build in &detail.builds {
        out.push_str(&format!("\n{} build\n", build.mode.to_string().to_uppercase()));
        for line in &build.specializations {
            let Some(specialization) = &line.specialization else {
                out.push_str("  -\n");
                continue;
            };
            let traits: Vec<&str> = line
                .selected_traits
                .iter()
                .map(|t| t.as_ref().map(|t| t.name.as_str()).unwrap_or("-"))
                .collect();
            out.push_str(&format!("  {}: {}\n", specialization.name, traits.join(" / ")));
        }
    }
    out
}

pub async fn inventory(session: &AccountSession, search: Option<&str>) -> Result<(), TyriaError> {
    let aggregate = session.aggregate().await?;
    report_failures(&aggregate);

    let needle = search.map(str::to_lowercase);
    let mut rows: Vec<InventoryRow> = aggregate
        .item_rows()
        .into_iter()
        .filter(|row| match &needle {
            Some(needle) => row.name().to_lowercase().contains(needle),
            None => true,
        })
        .cloned()
        .collect();
    sort_rows(&mut rows);
    print!("{}", format_item_rows(&rows));
    Ok(())
}

pub async fn wallet(session: &AccountSession) -> Result<(), TyriaError> {
    let aggregate = session.aggregate().await?;
    report_failures(&aggregate);
    if let Ok(rows) = &aggregate.wallet {
        print!("{}", format_wallet(rows));
    }
    Ok(())
}

pub async fn materials(session: &AccountSession) -> Result<(), TyriaError> {
    let aggregate = session.aggregate().await?;
    report_failures(&aggregate);
    if let Ok(rows) = &aggregate.materials {
        print!("{}", format_materials(rows));
    }
    Ok(())
}

pub async fn characters(session: &AccountSession) -> Result<(), TyriaError> {
    let aggregate = session.aggregate().await?;
    report_failures(&aggregate);
    if let Ok(characters) = &aggregate.characters {
        for character in characters {
            println!(
                "{:<24} {:<12} {:>3}  {} items",
                character.name,
                character.profession,
                character.level,
                character.rows.len()
            );
        }
    }
    Ok(())
}

pub async fn character(session: &AccountSession, name: &str) -> Result<(), TyriaError> {
    let detail = session.character_detail(name).await?;
    print!("{}", format_detail(&detail));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tyria_account::Location;
    use tyria_cache::entities::{Currency, Item};
    use tyria_core::{Coins, Rarity};

    fn row(item: Option<Item>, location: Location) -> InventoryRow {
        InventoryRow {
            item_id: 30684,
            count: 1,
            location,
            equipment_slot: Some("WeaponA1".into()),
            binding: None,
            item: item.map(Arc::new),
        }
    }

    #[test]
    fn item_rows_show_location_and_slot() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": 30684, "name": "Frostfang", "rarity": "Legendary"
        }))
        .unwrap();
        let out = format_item_rows(&[row(Some(item), Location::Character("Aurene Sky".into()))]);
        assert!(out.contains("Frostfang"));
        assert!(out.contains("Legendary"));
        assert!(out.trim_end().ends_with("Aurene Sky (WeaponA1)"));
    }

    #[test]
    fn unknown_items_are_named_by_id() {
        let out = format_item_rows(&[row(None, Location::Bank(4))]);
        assert!(out.contains("Unknown item #30684"));
        assert!(out.contains(&Rarity::Unknown.to_string()));
        assert!(out.contains("Bank|4"));
    }

    #[test]
    fn wallet_shows_coins_split() {
        let coin: Currency =
            serde_json::from_value(serde_json::json!({"id": 1, "name": "Coin"})).unwrap();
        let rows = [
            WalletRow {
                currency_id: 1,
                value: 123456,
                currency: Some(Arc::new(coin)),
                coins: Some(Coins::from_copper(123456)),
            },
            WalletRow {
                currency_id: 77,
                value: 9,
                currency: None,
                coins: None,
            },
        ];
        let out = format_wallet(&rows);
        assert!(out.lines().next().unwrap().ends_with("12g 34s 56c"));
        assert!(out.contains("Currency #77"));
    }
}
