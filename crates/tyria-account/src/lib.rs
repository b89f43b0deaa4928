// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account-scoped data for Tyria.
//!
//! Credentials and the active-credential scope, the inventory/wallet
//! aggregate, unlock collections with their load states, and the pure
//! enrichment helpers that join owned selections with reference data.

pub mod aggregate;
pub mod detail;
pub mod enrich;
pub mod identity;
pub mod owned;
pub mod scope;
pub mod session;
pub mod summary;
pub mod unlocks;

pub use aggregate::{
    AccountAggregate, CharacterRows, InventoryRow, Location, MaterialRow, Source, SourceFailure,
    WalletRow, build_aggregate, sort_rows,
};
pub use detail::{Build, CharacterDetail, character_detail};
pub use enrich::{
    EnrichedBackstory, EnrichedSpecialization, enrich_backstory, enrich_specialization,
    extract_specialization_ids, extract_trait_ids,
};
pub use identity::IdentityStore;
pub use scope::{CredentialScope, ScopeTracker, Scoped};
pub use session::AccountSession;
pub use summary::{AccountSummary, account_summary};
pub use unlocks::{
    ErrorReport, LoadState, Unlock, UnlockKind, UnlockSource, UnlockStates, load_unlocks,
};
