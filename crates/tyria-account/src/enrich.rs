// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure enrichment of owned selections with reference data.
//!
//! Nothing here performs I/O. Callers load the relevant catalogs first and
//! pass anything implementing [`Lookup`]; a lookup miss is skipped or left as
//! `None`, never an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use tyria_cache::Lookup;
use tyria_cache::entities::{BackstoryAnswer, BackstoryQuestion, Specialization, Trait};
use tyria_core::GameMode;

use crate::owned::{SpecializationSelection, SpecializationSet};

/// Lines per build and major traits per line.
const SPECIALIZATION_SLOTS: usize = 3;
const TRAIT_SLOTS: usize = 3;

/// A backstory answer joined with the question it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBackstory {
    pub question: Arc<BackstoryQuestion>,
    pub answer: Arc<BackstoryAnswer>,
}

/// A specialization line with its selected major traits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedSpecialization {
    pub specialization: Option<Arc<Specialization>>,
    pub selected_traits: [Option<Arc<Trait>>; TRAIT_SLOTS],
}

/// Joins each answer with its question, ordered by the question's `order`.
///
/// Answers or questions that cannot be found are skipped. The sort is stable,
/// so answers with equal order keep their input order.
pub fn enrich_backstory<Q, A>(
    answer_ids: &[String],
    questions: &Q,
    answers: &A,
) -> Vec<EnrichedBackstory>
where
    Q: Lookup<u32, BackstoryQuestion> + ?Sized,
    A: Lookup<String, BackstoryAnswer> + ?Sized,
{
    let mut enriched: Vec<EnrichedBackstory> = answer_ids
        .iter()
        .filter_map(|id| {
            let answer = answers.lookup(id)?;
            let question = questions.lookup(&answer.question)?;
            Some(EnrichedBackstory { question, answer })
        })
        .collect();
    enriched.sort_by_key(|e| e.question.order);
    enriched
}

/// Resolves one specialization line and its three trait choices.
///
/// A missing selection or a selection without an ID yields an empty result.
/// Each trait resolves independently of the others.
pub fn enrich_specialization<S, T>(
    selection: Option<&SpecializationSelection>,
    specializations: &S,
    traits: &T,
) -> EnrichedSpecialization
where
    S: Lookup<u32, Specialization> + ?Sized,
    T: Lookup<u32, Trait> + ?Sized,
{
    let Some(selection) = selection else {
        return EnrichedSpecialization::default();
    };
    let Some(id) = selection.id else {
        return EnrichedSpecialization::default();
    };

    let mut selected_traits: [Option<Arc<Trait>>; TRAIT_SLOTS] = Default::default();
    for (slot, choice) in selected_traits.iter_mut().zip(&selection.traits) {
        *slot = choice.and_then(|trait_id| traits.lookup(&trait_id));
    }

    EnrichedSpecialization {
        specialization: specializations.lookup(&id),
        selected_traits,
    }
}

fn selections(set: &SpecializationSet) -> impl Iterator<Item = &SpecializationSelection> {
    GameMode::ALL.into_iter().flat_map(move |mode| {
        set.mode(mode)
            .iter()
            .take(SPECIALIZATION_SLOTS)
            .filter_map(Option::as_ref)
    })
}

/// Every trait ID chosen in any mode.
pub fn extract_trait_ids(set: &SpecializationSet) -> BTreeSet<u32> {
    selections(set)
        .flat_map(|s| s.traits.iter().take(TRAIT_SLOTS).filter_map(|t| *t))
        .collect()
}

/// Every specialization ID chosen in any mode.
pub fn extract_specialization_ids(set: &SpecializationSet) -> BTreeSet<u32> {
    selections(set).filter_map(|s| s.id).collect()
}
