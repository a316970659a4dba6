// src/lib.rs
//! Extraction of player and team statistics from the afltables.com HTML
//! tables into flat, normalized tables.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod process;
pub mod table;

pub use client::{AflTables, GAME_BY_GAME_YEARS, PLAYER_STATS_YEARS};
pub use config::{Config, RaggedPolicy};
pub use error::{Error, FetchError, Result};
pub use fetch::{Fetcher, HttpFetcher, Page};
