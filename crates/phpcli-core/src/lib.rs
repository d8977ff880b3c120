//! Core configuration handling for the php-cli blueprint.
//!
//! This crate defines the `rancherize.json` store ([`Configuration`]), the
//! tiered fallback resolver ([`TieredConfig`]), the default
//! [`Initializer`] and the [`Validator`].

pub mod config;
pub mod error;
pub mod init;
pub mod resolve;
pub mod validate;

pub use config::{CONFIG_FILE, Configuration};
pub use error::{Error, Result};
pub use init::{InitEntry, InitOutcome, InitReport, Initializer, Target};
pub use resolve::{ConfigRead, ENVIRONMENT_TIER, PROJECT_TIER, Tier, TierView, TieredConfig};
pub use validate::{FieldFailure, Rule, ValidationFailure, Validator};
