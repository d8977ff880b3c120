use std::fmt;

use serde_json::Value;

use crate::resolve::ConfigRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, and non-empty when it is a string.
    Required,
}

impl Rule {
    fn check(self, value: Option<&Value>) -> bool {
        match self {
            Rule::Required => match value {
                None => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub key: String,
    pub rule: Rule,
}

/// Every failed rule of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration validation failed: {}", format_failures(.failures))]
pub struct ValidationFailure {
    pub failures: Vec<FieldFailure>,
}

fn format_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("`{}` is {}", f.key, f.rule))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<(String, Rule)>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((key.into(), rule));
        self
    }

    pub fn validate(&self, config: &impl ConfigRead) -> Result<(), ValidationFailure> {
        let failures: Vec<FieldFailure> = self
            .rules
            .iter()
            .filter(|(key, rule)| !rule.check(config.get(key)))
            .map(|(key, rule)| FieldFailure {
                key: key.clone(),
                rule: *rule,
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { failures })
        }
    }
}
