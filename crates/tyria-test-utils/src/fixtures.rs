// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON payloads shaped like live API responses.

use serde_json::{Value, json};

/// An `items` entry.
pub fn item(id: u32, name: &str, rarity: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "CraftingMaterial",
        "level": 0,
        "rarity": rarity,
        "vendor_value": 8,
        "icon": format!("https://render.guildwars2.com/file/{id}.png"),
        "flags": [],
        "chat_link": "[&AgEAAAA=]"
    })
}

/// An inventory or bank slot.
pub fn slot(id: u32, count: u32) -> Value {
    json!({ "id": id, "count": count })
}

/// A bag holding `slots` (use `Value::Null` for empty slots).
pub fn bag(id: u32, slots: Vec<Value>) -> Value {
    json!({ "id": id, "size": slots.len(), "inventory": slots })
}

/// A `characters` entry with bags and equipment.
pub fn character(name: &str, bags: Vec<Value>, equipment: Vec<Value>) -> Value {
    json!({
        "name": name,
        "race": "Norn",
        "gender": "Female",
        "profession": "Guardian",
        "level": 80,
        "age": 3600,
        "deaths": 2,
        "backstory": ["7-54", "10-67", "11-72"],
        "bags": bags,
        "equipment": equipment,
        "specializations": {
            "pve": [
                { "id": 42, "traits": [1950, 1942, 1945] },
                null,
                { "id": 27, "traits": [null, 1520, 1517] }
            ],
            "pvp": [null, null, null],
            "wvw": [{ "id": 42, "traits": [1950, 1942, 1945] }]
        }
    })
}

/// An equipment piece worn in `slot`.
pub fn equipment(id: u32, slot: &str) -> Value {
    json!({ "id": id, "slot": slot, "binding": "Character" })
}

/// A material storage slot.
pub fn material(id: u32, category: u32, count: u32) -> Value {
    json!({ "id": id, "category": category, "count": count })
}

pub fn material_categories() -> Vec<Value> {
    vec![
        json!({ "id": 5, "name": "Cooking Materials", "items": [12134], "order": 10 }),
        json!({ "id": 6, "name": "Basic Crafting Materials", "items": [19697, 19699], "order": 0 }),
    ]
}

pub fn currencies() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Coin", "description": "The primary currency.",
            "icon": "coin.png", "order": 101
        }),
        json!({
            "id": 2, "name": "Karma", "description": "Earned through events.",
            "icon": "karma.png", "order": 102
        }),
        json!({
            "id": 4, "name": "Gem", "description": "Purchased currency.",
            "icon": "gem.png", "order": 103
        }),
    ]
}

/// Backstory questions with orders `{7: 1, 10: 3, 11: 2}`.
pub fn backstory_questions() -> Vec<Value> {
    vec![
        json!({
            "id": 7, "title": "My Story", "description": "Who are you?",
            "answers": ["7-54"], "order": 1
        }),
        json!({
            "id": 10, "title": "Regret", "description": "What do you regret?",
            "answers": ["10-67"], "order": 3
        }),
        json!({
            "id": 11, "title": "Dream", "description": "What do you dream of?",
            "answers": ["11-72"], "order": 2
        }),
    ]
}

pub fn backstory_answers() -> Vec<Value> {
    vec![
        json!({
            "id": "7-54", "title": "Blood Legion", "description": "",
            "journal": "I joined the Blood Legion.", "question": 7
        }),
        json!({
            "id": "10-67", "title": "Left home", "description": "",
            "journal": "I left home young.", "question": 10
        }),
        json!({
            "id": "11-72", "title": "Greatness", "description": "",
            "journal": "I dream of greatness.", "question": 11
        }),
    ]
}

pub fn specializations() -> Vec<Value> {
    vec![
        json!({
            "id": 42, "name": "Zeal", "profession": "Guardian", "elite": false,
            "minor_traits": [], "major_traits": [1950, 1942, 1945], "icon": "zeal.png"
        }),
        json!({
            "id": 27, "name": "Dragonhunter", "profession": "Guardian", "elite": true,
            "minor_traits": [], "major_traits": [1520, 1517], "icon": "dh.png"
        }),
    ]
}

pub fn traits() -> Vec<Value> {
    let names = [
        (1950, "Fiery Wrath"),
        (1942, "Zealous Blade"),
        (1945, "Symbolic Avenger"),
        (1520, "Big Game Hunter"),
        (1517, "Pure of Sight"),
    ];
    names
        .into_iter()
        .map(|(id, name)| {
            json!({ "id": id, "name": name, "icon": "trait.png", "tier": 1, "slot": "Major" })
        })
        .collect()
}
