// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session-wide static reference cache.

use std::sync::Arc;

use tyria_config::BatchConfig;
use tyria_core::{ResourceFetcher, TyriaError};

use crate::catalog::Catalog;
use crate::entities::{
    BackstoryAnswer, BackstoryQuestion, Currency, Glider, HomeCat, HomeNode, Item, MailCarrier,
    Mastery, MaterialCategory, MountSkin, Outfit, Skin, Specialization, Title, Trait, World,
};
use crate::resolver::BatchSettings;

/// Every reference catalog, sharing one fetcher.
///
/// Built once at startup and handed around as `Arc<ReferenceCache>`. Entries
/// live for the whole session; switching credentials does not touch them.
pub struct ReferenceCache {
    pub items: Catalog<Item>,
    pub materials: Catalog<MaterialCategory>,
    pub currencies: Catalog<Currency>,
    pub specializations: Catalog<Specialization>,
    pub traits: Catalog<Trait>,
    pub skins: Catalog<Skin>,
    pub outfits: Catalog<Outfit>,
    pub titles: Catalog<Title>,
    pub masteries: Catalog<Mastery>,
    pub mail_carriers: Catalog<MailCarrier>,
    pub mount_skins: Catalog<MountSkin>,
    pub gliders: Catalog<Glider>,
    pub home_nodes: Catalog<HomeNode>,
    pub home_cats: Catalog<HomeCat>,
    pub worlds: Catalog<World>,
    pub backstory_questions: Catalog<BackstoryQuestion>,
    pub backstory_answers: Catalog<BackstoryAnswer>,
}

impl ReferenceCache {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, settings: BatchSettings) -> Self {
        Self {
            items: Catalog::new(fetcher.clone(), settings),
            materials: Catalog::new(fetcher.clone(), settings),
            currencies: Catalog::new(fetcher.clone(), settings),
            specializations: Catalog::new(fetcher.clone(), settings),
            traits: Catalog::new(fetcher.clone(), settings),
            skins: Catalog::new(fetcher.clone(), settings),
            outfits: Catalog::new(fetcher.clone(), settings),
            titles: Catalog::new(fetcher.clone(), settings),
            masteries: Catalog::new(fetcher.clone(), settings),
            mail_carriers: Catalog::new(fetcher.clone(), settings),
            mount_skins: Catalog::new(fetcher.clone(), settings),
            gliders: Catalog::new(fetcher.clone(), settings),
            home_nodes: Catalog::new(fetcher.clone(), settings),
            home_cats: Catalog::new(fetcher.clone(), settings),
            worlds: Catalog::new(fetcher.clone(), settings),
            backstory_questions: Catalog::new(fetcher.clone(), settings),
            backstory_answers: Catalog::new(fetcher, settings),
        }
    }

    pub fn from_config(fetcher: Arc<dyn ResourceFetcher>, batch: &BatchConfig) -> Self {
        Self::new(fetcher, BatchSettings::from(batch))
    }

    /// Loads both backstory catalogs concurrently.
    pub async fn load_backstory(&self) -> Result<(), TyriaError> {
        let (questions, answers) = futures::join!(
            self.backstory_questions.load_all(),
            self.backstory_answers.load_all()
        );
        questions.and(answers)
    }

    /// Entry count per catalog endpoint.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.items.endpoint(), self.items.len()),
            (self.materials.endpoint(), self.materials.len()),
            (self.currencies.endpoint(), self.currencies.len()),
            (self.specializations.endpoint(), self.specializations.len()),
            (self.traits.endpoint(), self.traits.len()),
            (self.skins.endpoint(), self.skins.len()),
            (self.outfits.endpoint(), self.outfits.len()),
            (self.titles.endpoint(), self.titles.len()),
            (self.masteries.endpoint(), self.masteries.len()),
            (self.mail_carriers.endpoint(), self.mail_carriers.len()),
            (self.mount_skins.endpoint(), self.mount_skins.len()),
            (self.gliders.endpoint(), self.gliders.len()),
            (self.home_nodes.endpoint(), self.home_nodes.len()),
            (self.home_cats.endpoint(), self.home_cats.len()),
            (self.worlds.endpoint(), self.worlds.len()),
            (self.backstory_questions.endpoint(), self.backstory_questions.len()),
            (self.backstory_answers.endpoint(), self.backstory_answers.len()),
        ]
    }
}
