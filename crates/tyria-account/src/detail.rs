// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-character view: enriched backstory and builds.

use tracing::{debug, warn};
use tyria_cache::ReferenceCache;
use tyria_core::{GameMode, Query, ResourceFetcher, TyriaError, fetch_json};

use crate::enrich::{
    EnrichedBackstory, EnrichedSpecialization, enrich_backstory, enrich_specialization,
    extract_trait_ids,
};
use crate::owned::Character;
use crate::scope::CredentialScope;

/// The three specialization lines selected for one game mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub mode: GameMode,
    pub specializations: Vec<EnrichedSpecialization>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterDetail {
    pub name: String,
    pub profession: String,
    pub race: String,
    pub level: u32,
    pub backstory: Vec<EnrichedBackstory>,
    pub builds: Vec<Build>,
}

/// Fetches `characters/<name>` and enriches it against the reference cache.
///
/// Reference catalogs that fail to load are logged and leave the matching
/// entries as `None`; only the character request itself is fatal.
pub async fn character_detail(
    fetcher: &dyn ResourceFetcher,
    cache: &ReferenceCache,
    scope: &CredentialScope,
    name: &str,
) -> Result<CharacterDetail, TyriaError> {
    let token = scope
        .token()
        .ok_or_else(|| TyriaError::Credential("no active credential".into()))?;
    let endpoint = format!("characters/{name}");
    let query = Query::new().with_token(token);

    let (character, backstory_loaded, specializations_loaded) = futures::join!(
        fetch_json::<Character>(fetcher, &endpoint, &query),
        cache.load_backstory(),
        cache.specializations.load_all(),
    );
    let character = character?;
    if let Err(error) = backstory_loaded {
        warn!(error = %error, "backstory catalogs unavailable");
    }
    if let Err(error) = specializations_loaded {
        warn!(error = %error, "specializations unavailable");
    }

    let trait_ids: Vec<u32> = extract_trait_ids(&character.specializations).into_iter().collect();
    let resolution = cache.traits.load_by_ids(&trait_ids).await;
    if let Some(error) = resolution.first_error() {
        warn!(error = %error, "some traits could not be resolved");
    }
    debug!(
        character = %character.name,
        traits = trait_ids.len(),
        missing = resolution.missing.len(),
        "character references loaded"
    );

    let backstory = enrich_backstory(
        &character.backstory,
        &cache.backstory_questions,
        &cache.backstory_answers,
    );
    let builds = GameMode::ALL
        .into_iter()
        .map(|mode| {
            let lines = character.specializations.mode(mode);
            let specializations = (0..3)
                .map(|slot| {
                    let selection = lines.get(slot).and_then(Option::as_ref);
                    enrich_specialization(selection, &cache.specializations, &cache.traits)
                })
                .collect();
            Build {
                mode,
                specializations,
            }
        })
        .collect();

    Ok(CharacterDetail {
        name: character.name,
        profession: character.profession,
        race: character.race,
        level: character.level,
        backstory,
        builds,
    })
}

impl CharacterDetail {
    pub fn build(&self, mode: GameMode) -> Option<&Build> {
        self.builds.iter().find(|b| b.mode == mode)
    }
}
