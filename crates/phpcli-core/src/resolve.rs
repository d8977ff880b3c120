//! Tiered read-through resolution.
//!
//! A lookup walks an ordered list of named tiers and returns the first
//! value present. For an environment `<env>` the standard chain is:
//!
//! ```text
//! 1. environment ── project.environments.<env>.<key>
//! 2. project     ── project.default.<key>
//! 3. literal     ── default passed at the call site (get_str / get_bool / ...)
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::Configuration;

/// Name of the environment-specific tier.
pub const ENVIRONMENT_TIER: &str = "environment";
/// Name of the project-default tier.
pub const PROJECT_TIER: &str = "project";

/// Read access with typed accessors shared by every configuration view.
pub trait ConfigRead {
    /// Raw value for `key`. `null` counts as absent.
    fn get(&self, key: &str) -> Option<&Value>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value, numbers are stringified.
    fn get_str(&self, key: &str, default: &str) -> crate::Result<String> {
        match self.get(key) {
            None => Ok(default.to_owned()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(crate::Error::invalid(key, "a string", other)),
        }
    }

    /// Optional string value, `None` when absent.
    fn get_opt_str(&self, key: &str) -> crate::Result<Option<String>> {
        if self.has(key) {
            self.get_str(key, "").map(Some)
        } else {
            Ok(None)
        }
    }

    /// Boolean value. Accepts `"true"`/`"false"` and the numbers 0/1.
    fn get_bool(&self, key: &str, default: bool) -> crate::Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            Some(Value::Number(n)) if n.as_u64() == Some(1) => Ok(true),
            Some(Value::Number(n)) if n.as_u64() == Some(0) => Ok(false),
            Some(other) => Err(crate::Error::invalid(key, "a boolean", other)),
        }
    }

    /// Non-negative integer; numeric strings are accepted.
    fn get_u64(&self, key: &str, default: u64) -> crate::Result<u64> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            // arch-lint: allow(no-silent-result-drop) reason="the offending value is reported below instead of the parse error"
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| crate::Error::invalid(key, "a non-negative integer", value))
    }

    /// Object value; an absent key yields an empty map.
    fn get_map(&self, key: &str) -> crate::Result<Map<String, Value>> {
        match self.get(key) {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            // An empty JSON array is how an empty map usually ends up on disk.
            Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
            Some(other) => Err(crate::Error::invalid(key, "an object", other)),
        }
    }

    /// Object value whose entries are scalars, stringified.
    fn get_string_map(&self, key: &str) -> crate::Result<BTreeMap<String, String>> {
        self.get_map(key)?
            .into_iter()
            .map(|(name, value)| {
                let text = match &value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    other => {
                        return Err(crate::Error::invalid(
                            &format!("{key}.{name}"),
                            "a scalar",
                            other,
                        ));
                    }
                };
                Ok((name, text))
            })
            .collect()
    }
}

/// A named layer of the configuration tree, addressed by key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub prefix: String,
}

impl Tier {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// `project.environments.<env>.`
    pub fn environment(environment: &str) -> Self {
        Self::new(
            ENVIRONMENT_TIER,
            format!("project.environments.{environment}."),
        )
    }

    /// `project.default.`
    pub fn project() -> Self {
        Self::new(PROJECT_TIER, "project.default.")
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// The standard chain for an environment: environment, then project default.
    pub fn standard(environment: &str) -> Vec<Tier> {
        vec![Self::environment(environment), Self::project()]
    }
}

/// Fallback view over an ordered list of tiers.
#[derive(Debug, Clone)]
pub struct TieredConfig<'a> {
    config: &'a Configuration,
    tiers: Vec<Tier>,
}

impl<'a> TieredConfig<'a> {
    pub fn new(config: &'a Configuration, tiers: Vec<Tier>) -> Self {
        Self { config, tiers }
    }

    pub fn for_environment(config: &'a Configuration, environment: &str) -> Self {
        Self::new(config, Tier::standard(environment))
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Name of the first tier that holds `key`.
    pub fn resolved_tier(&self, key: &str) -> Option<&str> {
        self.tiers
            .iter()
            .find(|tier| self.config.has(&tier.key(key)))
            .map(|tier| tier.name.as_str())
    }

    /// Single-tier view, or `None` if no tier carries that name.
    pub fn tier(&self, name: &str) -> Option<TierView<'a>> {
        self.tiers
            .iter()
            .find(|tier| tier.name == name)
            .map(|tier| TierView {
                config: self.config,
                tier: tier.clone(),
            })
    }
}

impl ConfigRead for TieredConfig<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.tiers
            .iter()
            .find_map(|tier| self.config.get(&tier.key(key)))
    }
}

/// Read-only view of exactly one tier.
#[derive(Debug, Clone)]
pub struct TierView<'a> {
    config: &'a Configuration,
    tier: Tier,
}

impl<'a> TierView<'a> {
    pub fn new(config: &'a Configuration, tier: Tier) -> Self {
        Self { config, tier }
    }

    pub fn name(&self) -> &str {
        &self.tier.name
    }
}

impl ConfigRead for TierView<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(&self.tier.key(key))
    }
}
