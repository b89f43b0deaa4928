// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tyria accounts` subcommands.

use tyria_account::AccountSession;
use tyria_core::{Credential, TyriaError};

/// One line per credential, the active one starred.
fn format_credentials(credentials: &[Credential], active: Option<&str>) -> String {
    let mut out = String::new();
    for credential in credentials {
        let marker = if Some(credential.token.as_str()) == active { '*' } else { ' ' };
        out.push_str(&format!("{marker} {:<24} {}", credential.name, credential.masked_token()));
        if let Some(description) = &credential.description {
            out.push_str(&format!("  ({description})"));
        }
        out.push('\n');
    }
    out
}

pub async fn list(session: &AccountSession) -> Result<(), TyriaError> {
    let credentials = session.identity().list().await;
    if credentials.is_empty() {
        println!("No API keys saved. Add one with `tyria accounts add <key>`.");
        return Ok(());
    }
    let scope = session.scope();
    print!("{}", format_credentials(&credentials, scope.token()));

    if scope.token().is_some() {
        match session.account_summary().await {
            Ok(summary) => println!(
                "\nActive: {} on {}",
                summary.info.name,
                summary.world_name()
            ),
            Err(err) => {
                let reason = err.user_message().unwrap_or_else(|| err.to_string());
                eprintln!("warning: active account unavailable: {reason}");
            }
        }
    }
    Ok(())
}

pub async fn add(
    session: &AccountSession,
    token: &str,
    description: Option<String>,
) -> Result<(), TyriaError> {
    let credential = session.add_credential(token, description).await?;
    println!("Saved {} ({}).", credential.name, credential.masked_token());
    Ok(())
}

pub async fn remove(session: &AccountSession, token: &str) -> Result<(), TyriaError> {
    if session.remove_credential(token).await? {
        println!("Removed.");
    } else {
        println!("No saved key matches.");
    }
    Ok(())
}

pub async fn select(session: &AccountSession, token: &str) -> Result<(), TyriaError> {
    session.select(token).await?;
    if let Some(active) = session.identity().active().await {
        println!("Now using {}.", active.name);
    }
    Ok(())
}
