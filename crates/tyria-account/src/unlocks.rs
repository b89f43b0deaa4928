// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unlock collections and their load states.
//!
//! An unlock view needs two things: the account's owned list and the
//! reference entries it points to. Loading walks `Idle`, `LoadingIds`,
//! `LoadingDetails` then `Ready`, or stops in `Error`, and every step is written
//! through a [`Scoped`] slot so a load that outlives a credential switch never
//! lands in the new credential's state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};
use tyria_cache::entities::{
    Glider, HomeCat, HomeNode, MailCarrier, Mastery, MountSkin, Outfit, Skin, Title,
};
use tyria_cache::{Catalog, ReferenceCache};
use tyria_core::{ApiErrorKind, CatalogEntry, Query, ResourceFetcher, TyriaError, fetch_json};

use crate::owned::{HomeCatEntry, MasteryProgress};
use crate::scope::{CredentialScope, ScopeTracker, Scoped};

/// Why a load stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub user_message: Option<String>,
    pub kind: Option<ApiErrorKind>,
}

impl From<&TyriaError> for ErrorReport {
    fn from(err: &TyriaError) -> Self {
        Self {
            message: err.to_string(),
            user_message: err.user_message(),
            kind: err.as_api().map(|e| e.kind()),
        }
    }
}

/// Progress of a "load then render" resource.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    LoadingIds,
    LoadingDetails,
    Ready(T),
    Error(ErrorReport),
}

impl<T> LoadState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::LoadingIds | LoadState::LoadingDetails)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// One owned unlock with its reference entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Unlock<E: CatalogEntry> {
    pub id: E::Id,
    pub entity: Option<Arc<E>>,
    /// Trained level, for mastery tracks.
    pub level: Option<u32>,
}

/// A reference kind the account can unlock.
pub trait UnlockSource: CatalogEntry + Clone + PartialEq {
    /// Account endpoint listing what is owned.
    const OWNED_ENDPOINT: &'static str;

    /// Element of the owned list.
    type Owned: DeserializeOwned + Send;

    fn owned_id(owned: &Self::Owned) -> Self::Id;

    fn owned_level(_owned: &Self::Owned) -> Option<u32> {
        None
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self>;

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>>;

    /// Display label for an entry.
    fn label(&self) -> String;
}

impl UnlockSource for Outfit {
    const OWNED_ENDPOINT: &'static str = "account/outfits";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.outfits
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.outfits
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for Skin {
    const OWNED_ENDPOINT: &'static str = "account/skins";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.skins
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.skins
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for Glider {
    const OWNED_ENDPOINT: &'static str = "account/gliders";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.gliders
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.gliders
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for MailCarrier {
    const OWNED_ENDPOINT: &'static str = "account/mailcarriers";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.mail_carriers
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.mail_carriers
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for MountSkin {
    const OWNED_ENDPOINT: &'static str = "account/mounts/skins";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.mount_skins
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.mount_skins
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for Title {
    const OWNED_ENDPOINT: &'static str = "account/titles";
    type Owned = u32;

    fn owned_id(owned: &u32) -> u32 {
        *owned
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.titles
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.titles
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl UnlockSource for Mastery {
    const OWNED_ENDPOINT: &'static str = "account/masteries";
    type Owned = MasteryProgress;

    fn owned_id(owned: &MasteryProgress) -> u32 {
        owned.id
    }

    fn owned_level(owned: &MasteryProgress) -> Option<u32> {
        Some(owned.level)
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.masteries
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.masteries
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.region)
    }
}

impl UnlockSource for HomeNode {
    const OWNED_ENDPOINT: &'static str = "account/home/nodes";
    type Owned = String;

    fn owned_id(owned: &String) -> String {
        owned.clone()
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.home_nodes
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.home_nodes
    }

    fn label(&self) -> String {
        self.id.replace('_', " ")
    }
}

impl UnlockSource for HomeCat {
    const OWNED_ENDPOINT: &'static str = "account/home/cats";
    type Owned = HomeCatEntry;

    fn owned_id(owned: &HomeCatEntry) -> u32 {
        owned.id()
    }

    fn catalog(cache: &ReferenceCache) -> &Catalog<Self> {
        &cache.home_cats
    }

    fn slot(states: &UnlockStates) -> &Scoped<LoadState<Vec<Unlock<Self>>>> {
        &states.home_cats
    }

    fn label(&self) -> String {
        self.hint
            .clone()
            .unwrap_or_else(|| format!("Cat #{}", self.id))
    }
}

/// Every unlock kind the CLI can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum UnlockKind {
    Outfits,
    Skins,
    Gliders,
    MailCarriers,
    MountSkins,
    Titles,
    Masteries,
    HomeNodes,
    HomeCats,
}

/// Credential-scoped load state for every unlock kind.
pub struct UnlockStates {
    pub outfits: Scoped<LoadState<Vec<Unlock<Outfit>>>>,
    pub skins: Scoped<LoadState<Vec<Unlock<Skin>>>>,
    pub gliders: Scoped<LoadState<Vec<Unlock<Glider>>>>,
    pub mail_carriers: Scoped<LoadState<Vec<Unlock<MailCarrier>>>>,
    pub mount_skins: Scoped<LoadState<Vec<Unlock<MountSkin>>>>,
    pub titles: Scoped<LoadState<Vec<Unlock<Title>>>>,
    pub masteries: Scoped<LoadState<Vec<Unlock<Mastery>>>>,
    pub home_nodes: Scoped<LoadState<Vec<Unlock<HomeNode>>>>,
    pub home_cats: Scoped<LoadState<Vec<Unlock<HomeCat>>>>,
}

impl UnlockStates {
    pub fn new(tracker: Arc<ScopeTracker>) -> Self {
        Self {
            outfits: Scoped::new(tracker.clone()),
            skins: Scoped::new(tracker.clone()),
            gliders: Scoped::new(tracker.clone()),
            mail_carriers: Scoped::new(tracker.clone()),
            mount_skins: Scoped::new(tracker.clone()),
            titles: Scoped::new(tracker.clone()),
            masteries: Scoped::new(tracker.clone()),
            home_nodes: Scoped::new(tracker.clone()),
            home_cats: Scoped::new(tracker),
        }
    }

    /// Current state for `E`, `Idle` if nothing was loaded under this scope.
    pub fn state<E: UnlockSource>(&self) -> LoadState<Vec<Unlock<E>>> {
        E::slot(self).get().unwrap_or(LoadState::Idle)
    }
}

/// Loads the owned list and reference entries for `E`.
///
/// Returns the final state. The state is also written to `slot`, unless the
/// credential changed in the meantime.
pub async fn load_unlocks<E: UnlockSource>(
    fetcher: &dyn ResourceFetcher,
    catalog: &Catalog<E>,
    scope: &CredentialScope,
    slot: &Scoped<LoadState<Vec<Unlock<E>>>>,
) -> LoadState<Vec<Unlock<E>>> {
    let fail = |err: TyriaError| {
        warn!(endpoint = E::OWNED_ENDPOINT, error = %err, "unlock load failed");
        let state = LoadState::Error(ErrorReport::from(&err));
        slot.apply(scope, state.clone());
        state
    };

    let Some(token) = scope.token() else {
        return fail(TyriaError::Credential("no active credential".into()));
    };

    slot.apply(scope, LoadState::LoadingIds);
    let owned: Vec<E::Owned> =
        match fetch_json(fetcher, E::OWNED_ENDPOINT, &Query::new().with_token(token)).await {
            Ok(owned) => owned,
            Err(err) => return fail(err.into()),
        };

    if owned.is_empty() {
        debug!(endpoint = E::OWNED_ENDPOINT, "nothing unlocked");
        let state = LoadState::Ready(Vec::new());
        slot.apply(scope, state.clone());
        return state;
    }

    slot.apply(scope, LoadState::LoadingDetails);
    let ids: Vec<E::Id> = owned.iter().map(E::owned_id).collect();
    if E::BULK {
        if let Err(err) = catalog.load_all().await {
            return fail(err);
        }
    } else {
        let resolution = catalog.load_by_ids(&ids).await;
        if let Some(err) = resolution.first_error() {
            return fail(err.clone().into());
        }
    }

    let rows: Vec<Unlock<E>> = owned
        .iter()
        .map(|entry| {
            let id = E::owned_id(entry);
            Unlock {
                entity: catalog.get(&id),
                level: E::owned_level(entry),
                id,
            }
        })
        .collect();
    debug!(endpoint = E::OWNED_ENDPOINT, count = rows.len(), "unlocks ready");
    let state = LoadState::Ready(rows);
    slot.apply(scope, state.clone());
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tyria_cache::BatchSettings;
    use tyria_test_utils::MockFetcher;

    struct Fixture {
        mock: Arc<MockFetcher>,
        cache: ReferenceCache,
        tracker: Arc<ScopeTracker>,
        states: UnlockStates,
    }

    fn fixture() -> Fixture {
        let mock = Arc::new(MockFetcher::new());
        let tracker = Arc::new(ScopeTracker::new(Some("tok-a".into())));
        Fixture {
            cache: ReferenceCache::new(mock.clone(), BatchSettings::default()),
            states: UnlockStates::new(tracker.clone()),
            mock,
            tracker,
        }
    }

    #[tokio::test]
    async fn empty_owned_list_is_ready_and_empty() {
        let f = fixture();
        f.mock.on("account/outfits", json!([]));
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.outfits, &scope, &f.states.outfits).await;

        assert_eq!(state, LoadState::Ready(Vec::new()));
        assert_eq!(f.states.state::<Outfit>(), LoadState::Ready(Vec::new()));
        assert_eq!(f.mock.call_count("outfits"), 0, "no reference request for nothing");
    }

    #[tokio::test]
    async fn masteries_carry_levels() {
        let f = fixture();
        f.mock
            .on("account/masteries", json!([{"id": 1, "level": 4}, {"id": 2, "level": 0}]))
            .catalog(
                "masteries",
                vec![
                    json!({"id": 1, "name": "Gliding", "region": "Maguuma"}),
                    json!({"id": 2, "name": "Itzel Lore", "region": "Maguuma"}),
                ],
            );
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.masteries, &scope, &f.states.masteries).await;
        let rows = state.ready().unwrap();
        assert_eq!(rows[0].level, Some(4));
        assert_eq!(rows[0].entity.as_ref().unwrap().label(), "Gliding (Maguuma)");
        assert_eq!(rows[1].level, Some(0));
    }

    #[tokio::test]
    async fn skins_resolve_by_id_and_keep_unknown_entries() {
        let f = fixture();
        f.mock
            .on("account/skins", json!([10, 11]))
            .catalog("skins", vec![json!({"id": 10, "name": "Zodiac", "rarity": "Exotic"})]);
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.skins, &scope, &f.states.skins).await;
        let rows = state.ready().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].entity.is_some());
        assert!(rows[1].entity.is_none());
        assert_eq!(f.mock.requested_ids("skins"), vec!["10", "11"]);
    }

    #[tokio::test]
    async fn legacy_home_cat_objects_load() {
        let f = fixture();
        f.mock
            .on("account/home/cats", json!([{"id": 3, "hint": "chicken"}, 4]))
            .catalog("home/cats", vec![json!({"id": 3, "hint": "chicken"}), json!({"id": 4})]);
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.home_cats, &scope, &f.states.home_cats).await;
        let labels: Vec<String> = state
            .ready()
            .unwrap()
            .iter()
            .filter_map(|u| u.entity.as_ref().map(|e| e.label()))
            .collect();
        assert_eq!(labels, vec!["chicken", "Cat #4"]);
    }

    #[tokio::test]
    async fn owned_list_failure_ends_in_error() {
        let f = fixture();
        f.mock.on_error(
            "account/gliders",
            tyria_core::ApiError::from_status(403, "Forbidden", "account/gliders"),
        );
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.gliders, &scope, &f.states.gliders).await;
        match state {
            LoadState::Error(report) => {
                assert_eq!(report.kind, Some(ApiErrorKind::Authentication));
                assert!(report.user_message.is_some());
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(matches!(f.states.state::<Glider>(), LoadState::Error(_)));
    }

    #[tokio::test]
    async fn reference_failure_is_not_ready() {
        let f = fixture();
        f.mock.on("account/titles", json!([1])).on_error(
            "titles",
            tyria_core::ApiError::from_status(500, "Internal Server Error", "titles"),
        );
        let scope = f.tracker.current();

        let state =
            load_unlocks(f.mock.as_ref(), &f.cache.titles, &scope, &f.states.titles).await;
        assert!(matches!(state, LoadState::Error(_)));
    }

    #[tokio::test]
    async fn load_for_previous_credential_never_lands() {
        let f = fixture();
        let gate = f.mock.gated("account/outfits", Some("tok-a"), json!([1]));
        f.mock.catalog("outfits", vec![json!({"id": 1, "name": "Arctic Explorer"})]);
        let scope_a = f.tracker.current();

        let states = Arc::new(f.states);
        let cache = Arc::new(f.cache);
        let task = tokio::spawn({
            let (mock, cache, states) = (f.mock.clone(), cache.clone(), states.clone());
            async move {
                load_unlocks(mock.as_ref(), &cache.outfits, &scope_a, &states.outfits).await
            }
        });
        while f.mock.call_count("account/outfits") == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(states.state::<Outfit>(), LoadState::LoadingIds);

        f.tracker.advance(Some("tok-b".into()));
        gate.open();
        let finished = task.await.unwrap();

        assert!(finished.is_ready(), "the load itself completes");
        assert_eq!(states.state::<Outfit>(), LoadState::Idle, "but never lands under B");
    }

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!("mail-carriers".parse::<UnlockKind>().unwrap(), UnlockKind::MailCarriers);
        assert_eq!(UnlockKind::HomeCats.to_string(), "home-cats");
    }
}
