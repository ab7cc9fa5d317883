//! gatecheck-config: typed check-configuration model and strict
//! deserialization.
//!
//! Check configurations arrive as already-parsed JSON (an upstream
//! collaborator handles file reading and format concerns). This crate
//! turns that dynamic value into a closed, validated algebra — every
//! condition is a tagged variant, unknown keys are rejected at the
//! boundary, and the evaluation engine never sees a raw dictionary.
//!
//! The main entry point is [`parse_config`], which takes a
//! `&serde_json::Value` and produces a [`CheckConfig`].

pub mod types;
pub mod validate;

pub use types::{RawCheck, RawConditions, RawConfig, RawQuantifier};
pub use validate::{
    parse_config, CheckConfig, CheckDefinition, ConditionKind, ConfigError, Quantifier, SearchMode,
    DEFAULT_CYCLE_IN_DAYS,
};
