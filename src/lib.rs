//! # Dust Guild - persistent mini-RPG engine for chat bots
//!
//! Dust Guild is the game-state and progression core of a chat-driven RPG:
//! characters, dust (the currency), weapons with per-type enhancement
//! tracks, elemental skills, PvP duels, a floor-scaling dungeon crawl, and
//! daily attendance/exploration rewards. The chat dispatcher and rendering
//! live elsewhere; this crate owns the rules and the save record.
//!
//! ## Design
//!
//! - **One save record.** All state lives in a single JSON document,
//!   loaded once at startup and rewritten in full (atomically) after each
//!   mutating operation. See [`game::storage`].
//! - **Declines are values.** A refused action (insufficient dust, daily
//!   cap, missing catalyst) is an outcome variant the caller renders, never
//!   an `Err`. [`game::GameError`] is reserved for I/O and corrupt saves.
//! - **Injectable randomness.** Every probabilistic transition draws
//!   through [`game::Dice`], so tests script exact sequences while
//!   production uses a seedable RNG.
//! - **Lazy day boundaries.** Daily resets (heal, caps) happen on the
//!   first relevant touch of a new calendar day in the configured zone;
//!   there is no background scheduler.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dustguild::config::Config;
//! use dustguild::game::{self, GameStore, StdDice};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let mut store = GameStore::open_dir(&config.storage.data_dir);
//!     let mut dice = StdDice::from_entropy();
//!
//!     let today = game::daily::today(config.daily.utc_offset_hours);
//!     let outcome = game::rewards::attendance(
//!         &mut store, &config.rewards, &mut dice, "node-a1b2", today,
//!     );
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - the engine: storage, progression, economy, enhancement,
//!   battle, dungeon, rewards, shop, flavor
//! - [`config`] - TOML configuration for every tunable number

pub mod config;
pub mod game;
