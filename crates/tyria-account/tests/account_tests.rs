// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end account flows against the mock fetcher.

use std::sync::Arc;

use serde_json::{Value, json};
use tyria_account::{AccountSession, IdentityStore, LoadState, Location, Source, sort_rows};
use tyria_cache::entities::{Outfit, Skin};
use tyria_cache::{BatchSettings, ReferenceCache};
use tyria_core::{ApiError, ApiErrorKind, KeyValueStore, Rarity};
use tyria_test_utils::{MemoryStore, MockFetcher, fixtures};

fn item_catalog() -> Vec<Value> {
    vec![
        fixtures::item(19697, "Copper Ore", "Basic"),
        fixtures::item(12134, "Carrot", "Basic"),
        fixtures::item(30684, "Frostfang", "Legendary"),
        fixtures::item(46774, "Zojja's Breastplate", "Ascended"),
        fixtures::item(24, "Sealed Package of Snowballs", "Junk"),
    ]
}

fn account_routes(mock: &MockFetcher) {
    let bags = vec![fixtures::bag(
        8932,
        vec![fixtures::slot(19697, 250), Value::Null, fixtures::slot(99999, 1)],
    )];
    let equipment = vec![
        fixtures::equipment(30684, "WeaponA1"),
        fixtures::equipment(46774, "Coat"),
    ];
    mock.on("account", json!({"name": "Main.1234", "world": 1001}))
        .on("characters", json!([fixtures::character("Aurene Sky", bags, equipment)]))
        .on("account/inventory", json!([null, fixtures::slot(24, 5)]))
        .on("account/bank", json!([null, null, fixtures::slot(19697, 30)]))
        .on(
            "account/materials",
            json!([
                fixtures::material(19697, 6, 1200),
                fixtures::material(19699, 6, 0),
                fixtures::material(12134, 5, 17)
            ]),
        )
        .on(
            "account/wallet",
            json!([{"id": 1, "value": 123456}, {"id": 2, "value": 40000}, {"id": 99, "value": 3}]),
        )
        .catalog("items", item_catalog())
        .catalog("materials", fixtures::material_categories())
        .catalog("currencies", fixtures::currencies());
}

async fn session(mock: Arc<MockFetcher>, store: Arc<dyn KeyValueStore>) -> AccountSession {
    let identity = Arc::new(IdentityStore::open(store).await.unwrap());
    let cache = Arc::new(ReferenceCache::new(mock.clone(), BatchSettings::default()));
    AccountSession::new(mock, cache, identity)
}

#[tokio::test]
async fn aggregate_enriches_every_source() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    let session = session(mock.clone(), Arc::new(MemoryStore::new())).await;
    session.add_credential("tok-main", None).await.unwrap();

    let aggregate = session.aggregate().await.unwrap();
    assert!(aggregate.failures.is_empty());

    let characters = aggregate.characters.as_ref().unwrap();
    let rows = &characters[0].rows;
    assert_eq!(rows.len(), 4, "two bag stacks and two equipped pieces");
    assert!(rows.iter().all(|r| r.location == Location::Character("Aurene Sky".into())));
    let coat = rows.iter().find(|r| r.item_id == 46774).unwrap();
    assert_eq!(coat.equipment_slot.as_deref(), Some("Coat"));

    let bank = aggregate.bank.as_ref().unwrap();
    assert_eq!(bank[0].location.to_string(), "Bank|3");
    let shared = aggregate.shared_inventory.as_ref().unwrap();
    assert_eq!(shared[0].location.to_string(), "Shared Inventory");

    let materials = aggregate.materials.as_ref().unwrap();
    assert_eq!(materials.len(), 2, "zero-count slot excluded");
    assert_eq!(materials[0].location.to_string(), "Vault|1");
    assert_eq!(materials[0].category_name.as_deref(), Some("Basic Crafting Materials"));
    assert_eq!(materials[1].category_name.as_deref(), Some("Cooking Materials"));

    let wallet = aggregate.wallet.as_ref().unwrap();
    assert_eq!(wallet.len(), 3);
    assert_eq!(aggregate.coins().unwrap().to_string(), "12g 34s 56c");
    assert!(wallet[2].currency.is_none(), "unknown currency keeps its balance");

    assert_eq!(aggregate.total_count(19697), 250 + 30 + 1200);
    assert_eq!(aggregate.unresolved, 1, "item 99999 is unknown");
    let unknown = rows.iter().find(|r| r.item_id == 99999).unwrap();
    assert_eq!(unknown.name(), "Unknown item #99999");
}

#[tokio::test]
async fn item_ids_are_resolved_in_one_deduplicated_call() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    let session = session(mock.clone(), Arc::new(MemoryStore::new())).await;
    session.add_credential("tok-main", None).await.unwrap();

    session.aggregate().await.unwrap();

    assert_eq!(mock.call_count("items"), 1);
    let mut requested = mock.requested_ids("items");
    requested.sort();
    assert_eq!(requested, vec!["12134", "19697", "24", "30684", "46774", "99999"]);
}

#[tokio::test]
async fn failed_source_does_not_sink_the_others() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    mock.on_error(
        "account/bank",
        ApiError::from_status(503, "Service Unavailable", "account/bank"),
    );
    let session = session(mock.clone(), Arc::new(MemoryStore::new())).await;
    session.add_credential("tok-main", None).await.unwrap();

    let aggregate = session.aggregate().await.unwrap();

    assert_eq!(aggregate.failures.len(), 1);
    assert_eq!(aggregate.failures[0].source, Source::Bank);
    assert_eq!(aggregate.failures[0].error.kind(), ApiErrorKind::Server);
    assert!(aggregate.bank.is_err());
    assert!(aggregate.characters.is_ok());
    assert!(aggregate.wallet.is_ok());
}

#[tokio::test]
async fn sorted_rows_put_legendary_first() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    let session = session(mock.clone(), Arc::new(MemoryStore::new())).await;
    session.add_credential("tok-main", None).await.unwrap();

    let aggregate = session.aggregate().await.unwrap();
    let mut rows: Vec<_> = aggregate.item_rows().into_iter().cloned().collect();
    sort_rows(&mut rows);

    assert_eq!(rows.first().map(|r| r.rarity()), Some(Rarity::Legendary));
    assert_eq!(rows.last().map(|r| r.item_id), Some(99999), "unknown rarity sorts last");
}

#[tokio::test]
async fn legacy_accounts_migrate_and_stay_usable() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    let store = Arc::new(MemoryStore::with_entries([(
        "accounts",
        r#"{"Main.1234": "tok-main", "Alt.5678": "tok-alt"}"#,
    )]));
    let session = session(mock.clone(), store.clone()).await;

    let names: Vec<String> = session
        .identity()
        .list()
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alt.5678", "Main.1234"]);
    assert!(!store.snapshot().await.contains_key("accounts"));

    session.select("tok-main").await.unwrap();
    let aggregate = session.aggregate().await.unwrap();
    assert!(aggregate.failures.is_empty());
}

#[tokio::test]
async fn switching_credential_mid_load_discards_the_late_result() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    mock.on_for_token("account/outfits", "tok-b", json!([]));
    let gate = mock.gated("account/outfits", Some("tok-a"), json!([1, 2]));
    mock.catalog("outfits", vec![json!({"id": 1, "name": "Arctic Explorer"})]);
    let session = Arc::new(session(mock.clone(), Arc::new(MemoryStore::new())).await);
    session.add_credential("tok-a", None).await.unwrap();
    session.add_credential("tok-b", None).await.unwrap();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.unlocks::<Outfit>().await }
    });
    while mock.call_count("account/outfits") == 0 {
        tokio::task::yield_now().await;
    }
    session.select("tok-b").await.unwrap();
    gate.open();
    let late = pending.await.unwrap();
    assert!(late.is_ready());

    assert_eq!(session.unlock_state::<Outfit>(), LoadState::Idle);
    let fresh = session.unlocks::<Outfit>().await;
    assert_eq!(fresh, LoadState::Ready(Vec::new()));
}

#[tokio::test]
async fn skins_without_reference_data_end_in_error() {
    let mock = Arc::new(MockFetcher::new());
    account_routes(&mock);
    mock.on("account/skins", json!([5, 6])).on_error(
        "skins",
        ApiError::from_status(500, "Internal Server Error", "skins"),
    );
    let session = session(mock.clone(), Arc::new(MemoryStore::new())).await;
    session.add_credential("tok-main", None).await.unwrap();

    match session.unlocks::<Skin>().await {
        LoadState::Error(report) => assert_eq!(report.kind, Some(ApiErrorKind::Server)),
        other => panic!("expected an error state, got {other:?}"),
    }
}
