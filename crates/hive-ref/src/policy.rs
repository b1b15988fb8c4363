//! Bundled policy documents and the knowledge-base conditions.
//!
//! Capability conditions depend on who is acting, so a rule set is built per
//! org member: `abilities_for` registers the member-bound predicates and
//! applies the policy document on top of them.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use hive_ability::{Condition, ConditionRegistry, PolicyConfig, RuleSet, RuleSetBuilder};
use hive_contracts::{
    entity::{OrgMember, Post},
    error::{HiveError, HiveResult},
};
use hive_guard::{RouteRoleTable, RouteRoles};

/// Capability policy bundled with the reference runtime.
pub const KNOWLEDGE_BASE_POLICY: &str = include_str!("../policies/knowledge-base.toml");

/// Route roles bundled with the reference runtime.
pub const ROUTES: &str = include_str!("../policies/routes.toml");

/// Conditions the knowledge-base policy may reference, bound to `member`.
pub fn conditions_for(member: &OrgMember) -> ConditionRegistry {
    let id = member.id;
    ConditionRegistry::new()
        .with("is-creator", Condition::new(move |p: &Post| p.creator_id == Some(id)))
        .with(
            "is-author",
            Condition::new(move |p: &Post| p.creator_id == Some(id) || p.maintainer_id == Some(id)),
        )
        .with("is-team-post", Condition::new(|p: &Post| p.team_id.is_some()))
}

/// Build the rule set `member` acts under.
pub fn abilities_for(member: &OrgMember, policy: &str) -> HiveResult<RuleSet> {
    let builder = RuleSetBuilder::from_toml_str(policy, &conditions_for(member))?;
    Ok(builder.build())
}

/// The policy documents a runtime was started with.
#[derive(Debug, Clone)]
pub struct Policies {
    /// Capability policy source, applied per member by `abilities_for`.
    pub abilities: String,
    pub routes: Arc<RouteRoleTable>,
}

impl Policies {
    pub fn bundled() -> HiveResult<Self> {
        Ok(Self {
            abilities: KNOWLEDGE_BASE_POLICY.to_string(),
            routes: Arc::new(RouteRoleTable::from_toml_str(ROUTES)?),
        })
    }

    /// Load overrides from disk, falling back to the bundled documents.
    pub fn load(policy: Option<&Path>, routes: Option<&Path>) -> HiveResult<Self> {
        let abilities = match policy {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| HiveError::ConfigError {
                    reason: format!("failed to read policy file '{}': {}", path.display(), e),
                })?;
                PolicyConfig::from_toml_str(&source)?;
                info!(path = %path.display(), "capability policy loaded");
                source
            }
            None => KNOWLEDGE_BASE_POLICY.to_string(),
        };

        let routes = match routes {
            Some(path) => {
                let table = RouteRoleTable::from_file(path)?;
                info!(path = %path.display(), routes = table.len(), "route roles loaded");
                table
            }
            None => RouteRoleTable::from_toml_str(ROUTES)?,
        };

        Ok(Self {
            abilities,
            routes: Arc::new(routes),
        })
    }

    /// Readable form of the roles `handler` declares.
    pub fn describe_roles(&self, handler: &str) -> String {
        match self.routes.required_roles(handler) {
            None => "no roles declared".to_string(),
            Some(roles) if roles.is_empty() => "an empty role list".to_string(),
            Some(roles) => roles
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}
