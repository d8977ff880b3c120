use std::fmt;

use serde_json::Value;

use crate::config::Configuration;
use crate::resolve::{Tier, TieredConfig};

/// Tier an initializer default is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Environment,
    Project,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// The default was written to the given full key.
    Set { path: String, value: Value },
    /// A tier already answered for the key; nothing was written.
    Skipped { tier: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitEntry {
    pub key: String,
    pub outcome: InitOutcome,
}

/// Everything an init run touched, in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitReport {
    pub entries: Vec<InitEntry>,
}

impl InitReport {
    pub fn written(&self) -> impl Iterator<Item = &InitEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, InitOutcome::Set { .. }))
    }

    pub fn is_noop(&self) -> bool {
        self.written().next().is_none()
    }
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.outcome {
                InitOutcome::Set { path, value } => {
                    writeln!(f, "  set      {path} = {value}")?;
                }
                InitOutcome::Skipped { tier } => {
                    writeln!(f, "  exists   {} ({tier})", entry.key)?;
                }
            }
        }
        Ok(())
    }
}

/// Fills configuration gaps with defaults without ever overwriting.
///
/// Presence is checked through the full fallback chain, so a value in the
/// project defaults also counts for the environment and vice versa.
pub struct Initializer<'a> {
    config: &'a mut Configuration,
    environment: Tier,
    project: Tier,
    report: InitReport,
}

impl<'a> Initializer<'a> {
    pub fn new(config: &'a mut Configuration, environment: &str) -> Self {
        Self {
            config,
            environment: Tier::environment(environment),
            project: Tier::project(),
            report: InitReport::default(),
        }
    }

    /// Read view of the configuration as it stands.
    pub fn view(&self) -> TieredConfig<'_> {
        TieredConfig::new(
            &*self.config,
            vec![self.environment.clone(), self.project.clone()],
        )
    }

    pub fn init(&mut self, key: &str, default: impl Into<Value>, target: Target) {
        if let Some(tier) = self.view().resolved_tier(key).map(str::to_owned) {
            tracing::info!(key, tier = %tier, "config value exists, keeping it");
            self.report.entries.push(InitEntry {
                key: key.to_owned(),
                outcome: InitOutcome::Skipped { tier },
            });
            return;
        }

        let path = match target {
            Target::Environment => self.environment.key(key),
            Target::Project => self.project.key(key),
        };
        let value = default.into();
        tracing::info!(key, path = %path, value = %value, "setting default config value");
        self.config.set(&path, value.clone());
        self.report.entries.push(InitEntry {
            key: key.to_owned(),
            outcome: InitOutcome::Set { path, value },
        });
    }

    pub fn finish(self) -> InitReport {
        self.report
    }
}
