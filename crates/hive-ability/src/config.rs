//! TOML policy documents.
//!
//! A `PolicyConfig` lists aliases and rules. Conditions cannot be written in
//! TOML, so a rule refers to one by name and the application supplies the
//! predicates through a `ConditionRegistry`.
//!
//! Example:
//! ```toml
//! [[aliases]]
//! alias = "modify"
//! actions = ["update", "delete"]
//!
//! [[rules]]
//! kind = "allow"
//! actions = ["modify"]
//! subjects = ["Doc"]
//! condition = "is-creator"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hive_contracts::error::{HiveError, HiveResult};

use crate::engine::RuleSetBuilder;
use crate::rule::{Condition, RuleOptions};

/// Named predicates a policy document may reference.
#[derive(Debug, Clone, Default)]
pub struct ConditionRegistry {
    conditions: HashMap<String, Condition>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, condition: Condition) -> &mut Self {
        self.conditions.insert(name.into(), condition);
        self
    }

    /// Builder-style `register`.
    pub fn with(mut self, name: impl Into<String>, condition: Condition) -> Self {
        self.register(name, condition);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    Allow,
    Forbid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasConfig {
    pub alias: String,
    pub actions: Vec<String>,
}

/// One `[[rules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub kind: RuleKind,
    pub actions: Vec<String>,
    pub subjects: Vec<String>,

    /// Empty means the rule is not field scoped.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Name of a condition in the `ConditionRegistry`.
    pub condition: Option<String>,

    /// Free text for operators; ignored by evaluation.
    pub description: Option<String>,
}

/// The top-level structure deserialized from a TOML policy file.
///
/// Aliases are applied first, then rules in declaration order, so a
/// `forbid` narrows any `allow` above it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl PolicyConfig {
    /// Parse `s` as a TOML policy document.
    pub fn from_toml_str(s: &str) -> HiveResult<Self> {
        toml::from_str(s).map_err(|e| HiveError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })
    }

    /// Load a policy document from a TOML file.
    ///
    /// # Errors
    ///
    /// `HiveError::ConfigError` when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> HiveResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HiveError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every rule before anything is applied, so a bad document never
    /// leaves a half-configured builder behind.
    fn validate(&self, conditions: &ConditionRegistry) -> HiveResult<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.actions.is_empty() || rule.subjects.is_empty() {
                return Err(HiveError::ConfigError {
                    reason: format!("rule #{} must list at least one action and one subject", index),
                });
            }
            if let Some(name) = &rule.condition {
                if conditions.get(name).is_none() {
                    return Err(HiveError::ConfigError {
                        reason: format!("rule #{} references unknown condition '{}'", index, name),
                    });
                }
            }
        }

        for alias in &self.aliases {
            if alias.actions.is_empty() {
                return Err(HiveError::ConfigError {
                    reason: format!("alias '{}' has no actions", alias.alias),
                });
            }
        }
        Ok(())
    }

    /// Apply the document to `builder`.
    pub fn apply(&self, builder: &mut RuleSetBuilder, conditions: &ConditionRegistry) -> HiveResult<()> {
        self.validate(conditions)?;

        for alias in &self.aliases {
            builder.add_action_alias(&alias.alias, &alias.actions);
        }

        for rule in &self.rules {
            let mut options = RuleOptions::new().fields(rule.fields.iter().cloned());
            if let Some(condition) = rule.condition.as_deref().and_then(|n| conditions.get(n)) {
                options = options.condition(condition.clone());
            }

            let subjects = rule.subjects.iter().map(String::as_str);
            match rule.kind {
                RuleKind::Allow => builder.allow(&rule.actions, subjects, options),
                RuleKind::Forbid => builder.forbid(&rule.actions, subjects, options),
            };
        }

        debug!(
            aliases = self.aliases.len(),
            rules = self.rules.len(),
            "policy document applied"
        );
        Ok(())
    }
}

impl RuleSetBuilder {
    /// Build a fresh builder from a TOML policy document.
    pub fn from_toml_str(s: &str, conditions: &ConditionRegistry) -> HiveResult<Self> {
        let mut builder = RuleSetBuilder::new();
        PolicyConfig::from_toml_str(s)?.apply(&mut builder, conditions)?;
        Ok(builder)
    }
}
