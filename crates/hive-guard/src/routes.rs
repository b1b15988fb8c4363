//! Route metadata: which roles each handler declares.
//!
//! Loaded from TOML:
//! ```toml
//! [[routes]]
//! handler = "docs.update"
//! roles = ["org:moderator", "post-author"]
//! ```
//!
//! A handler without an entry declares no roles. A handler with an empty
//! `roles` list declares roles that nobody can meet.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hive_contracts::{
    error::{HiveError, HiveResult},
    role::RequiredRole,
};

use crate::traits::RouteRoles;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub handler: String,
    pub roles: Vec<RequiredRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// In-memory handler → required roles table.
#[derive(Debug, Clone, Default)]
pub struct RouteRoleTable {
    routes: HashMap<String, Vec<RequiredRole>>,
}

impl RouteRoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the roles `handler` accepts, replacing any earlier declaration.
    pub fn declare(&mut self, handler: impl Into<String>, roles: impl Into<Vec<RequiredRole>>) -> &mut Self {
        self.routes.insert(handler.into(), roles.into());
        self
    }

    /// Build a table from parsed configuration.
    ///
    /// # Errors
    ///
    /// `HiveError::ConfigError` when a handler is declared more than once.
    pub fn from_config(config: RoutesConfig) -> HiveResult<Self> {
        let mut table = Self::new();
        for route in config.routes {
            if table.routes.contains_key(&route.handler) {
                return Err(HiveError::ConfigError {
                    reason: format!("route '{}' is declared more than once", route.handler),
                });
            }
            table.declare(route.handler, route.roles);
        }
        Ok(table)
    }

    /// Parse a TOML routes document into a table.
    ///
    /// # Errors
    ///
    /// `HiveError::ConfigError` when `s` is not a valid routes document or
    /// declares a handler twice.
    pub fn from_toml_str(s: &str) -> HiveResult<Self> {
        let config: RoutesConfig = toml::from_str(s).map_err(|e| HiveError::ConfigError {
            reason: format!("failed to parse routes TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Load a table from a TOML routes file.
    ///
    /// # Errors
    ///
    /// `HiveError::ConfigError` when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> HiveResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HiveError::ConfigError {
            reason: format!("failed to read routes file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteRoles for RouteRoleTable {
    fn required_roles(&self, handler: &str) -> Option<Vec<RequiredRole>> {
        self.routes.get(handler).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use hive_contracts::{
        error::HiveError,
        role::{OrgRole, RequiredRole, RoleAlias, TeamRole},
    };

    use super::RouteRoleTable;
    use crate::traits::RouteRoles;

    #[test]
    fn parses_declared_routes() {
        let toml = r#"
            [[routes]]
            handler = "docs.update"
            roles = ["org:moderator", "team:owner", "post-author"]

            [[routes]]
            handler = "org.leave"
            roles = []
        "#;

        let table = RouteRoleTable::from_toml_str(toml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.required_roles("docs.update"),
            Some(vec![
                RequiredRole::Org(OrgRole::Moderator),
                RequiredRole::Team(TeamRole::Owner),
                RequiredRole::Alias(RoleAlias::PostAuthor),
            ])
        );
        assert_eq!(table.required_roles("org.leave"), Some(vec![]));
        assert_eq!(table.required_roles("docs.read"), None);
    }

    #[test]
    fn unknown_role_is_a_config_error() {
        let toml = r#"
            [[routes]]
            handler = "docs.update"
            roles = ["org:admin"]
        "#;

        match RouteRoleTable::from_toml_str(toml) {
            Err(HiveError::ConfigError { reason }) => {
                assert!(reason.contains("org:admin"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_route_is_a_config_error() {
        let toml = r#"
            [[routes]]
            handler = "docs.update"
            roles = ["org:owner"]

            [[routes]]
            handler = "docs.update"
            roles = ["org:member"]
        "#;

        assert!(matches!(
            RouteRoleTable::from_toml_str(toml),
            Err(HiveError::ConfigError { .. })
        ));
    }

    #[test]
    fn missing_routes_file_is_a_config_error() {
        match RouteRoleTable::from_file(Path::new("/nonexistent/hive/routes.toml")) {
            Err(HiveError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read routes file"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn declare_replaces_earlier_roles() {
        let mut table = RouteRoleTable::new();
        table
            .declare("teams.update", vec![RequiredRole::Org(OrgRole::Owner)])
            .declare("teams.update", vec![RequiredRole::Team(TeamRole::Moderator)]);

        assert_eq!(
            table.required_roles("teams.update"),
            Some(vec![RequiredRole::Team(TeamRole::Moderator)])
        );
    }
}
