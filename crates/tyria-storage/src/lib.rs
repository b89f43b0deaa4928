// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Tyria.
//!
//! A single `kv` table behind the [`tyria_core::KeyValueStore`] trait, written
//! through `tokio-rusqlite`'s background thread.

pub mod database;
pub mod kv;

pub use database::Database;
pub use kv::SqliteKvStore;
