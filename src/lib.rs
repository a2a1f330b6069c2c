//! Goldrush - game-economy production and arbitrage analysis.
//!
//! This crate ingests raw game entities (countries, currencies, regions,
//! market offers) and derives per-region production yields plus
//! cross-market arbitrage opportunities with attached risk scores.
//!
//! # Architecture
//!
//! - [`domain`] - Pure calculation core: bonus resolution, the production
//!   pipeline, market aggregation, arbitrage detection, risk scoring, and
//!   the rate/offer caches.
//! - [`api`] - Upstream game API access over a `{code, data}` envelope;
//!   failures degrade to "no data", never to hard errors.
//! - [`app`] - Orchestration: snapshot loading and the analysis cycle.
//! - [`config`] - TOML configuration with serde defaults.
//! - [`cli`] - Command definitions and report rendering.
//! - [`error`] - Error types for the crate.
//!
//! # Features
//!
//! - `testkit` - Shared fixtures and a scripted API stub for tests.
//!
//! # Example
//!
//! ```no_run
//! use goldrush::config::Config;
//! use goldrush::domain::{ProductionEngine, ProductionFactors};
//!
//! let config = Config::load("config.toml")?;
//! let engine = ProductionEngine::new(
//!     config.economy.country_bonus_divisor,
//!     config.economy.fallback_npc_wage,
//! );
//! let factors = ProductionFactors::default();
//! # Ok::<(), goldrush::error::Error>(())
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(feature = "testkit")]
pub mod testkit;
