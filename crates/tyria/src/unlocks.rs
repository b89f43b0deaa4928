// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tyria unlocks <kind>`.

use tyria_account::{AccountSession, LoadState, Unlock, UnlockKind, UnlockSource};
use tyria_cache::entities::{
    Glider, HomeCat, HomeNode, MailCarrier, Mastery, MountSkin, Outfit, Skin, Title,
};
use tyria_core::TyriaError;

fn format_unlocks<E: UnlockSource>(rows: &[Unlock<E>]) -> String {
    let mut labels: Vec<String> = rows
        .iter()
        .map(|row| {
            let label = row
                .entity
                .as_ref()
                .map(|e| e.label())
                .unwrap_or_else(|| format!("#{}", row.id));
            match row.level {
                Some(level) => format!("{label} - level {level}"),
                None => label,
            }
        })
        .collect();
    labels.sort();
    labels.into_iter().map(|l| l + "\n").collect()
}

async fn show<E: UnlockSource>(session: &AccountSession) -> Result<(), TyriaError> {
    match session.unlocks::<E>().await {
        LoadState::Ready(rows) if rows.is_empty() => println!("Nothing unlocked."),
        LoadState::Ready(rows) => print!("{}", format_unlocks(&rows)),
        LoadState::Error(report) => {
            return Err(TyriaError::Internal(
                report.user_message.unwrap_or(report.message),
            ));
        }
        // `unlocks` only returns once the load settles.
        LoadState::Idle | LoadState::LoadingIds | LoadState::LoadingDetails => {}
    }
    Ok(())
}

pub async fn run(session: &AccountSession, kind: UnlockKind) -> Result<(), TyriaError> {
    match kind {
        UnlockKind::Outfits => show::<Outfit>(session).await,
        UnlockKind::Skins => show::<Skin>(session).await,
        UnlockKind::Gliders => show::<Glider>(session).await,
        UnlockKind::MailCarriers => show::<MailCarrier>(session).await,
        UnlockKind::MountSkins => show::<MountSkin>(session).await,
        UnlockKind::Titles => show::<Title>(session).await,
        UnlockKind::Masteries => show::<Mastery>(session).await,
        UnlockKind::HomeNodes => show::<HomeNode>(session).await,
        UnlockKind::HomeCats => show::<HomeCat>(session).await,
    }
}
