//! # hive-contracts
//!
//! Shared types, roles, and error contracts for the Hive knowledge-base
//! authorization core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate beyond role ranking and parsing.

pub mod entity;
pub mod error;
pub mod request;
pub mod role;

#[cfg(test)]
mod tests {
    use super::*;
    use entity::{EntityId, Organization, Post, PostKind, User};
    use error::HiveError;
    use request::RouteParams;
    use role::{OrgRole, RequiredRole, RoleAlias, TeamRole};

    // ── Rank ordering ────────────────────────────────────────────────────────

    #[test]
    fn org_roles_rank_member_below_moderator_below_owner() {
        assert!(OrgRole::Member < OrgRole::Moderator);
        assert!(OrgRole::Moderator < OrgRole::Owner);
        assert_eq!(
            [OrgRole::Owner, OrgRole::Member, OrgRole::Moderator].iter().max(),
            Some(&OrgRole::Owner)
        );
    }

    #[test]
    fn team_roles_rank_member_below_moderator_below_owner() {
        assert!(TeamRole::Member < TeamRole::Moderator);
        assert!(TeamRole::Moderator < TeamRole::Owner);
    }

    #[test]
    fn org_member_has_no_team_substitute() {
        assert_eq!(OrgRole::Member.team_substitute(), None);
        assert_eq!(OrgRole::Moderator.team_substitute(), Some(TeamRole::Moderator));
        assert_eq!(OrgRole::Owner.team_substitute(), Some(TeamRole::Owner));
    }

    // ── RequiredRole parsing ─────────────────────────────────────────────────

    #[test]
    fn required_role_parses_scoped_ranks() {
        assert_eq!(
            "org:moderator".parse::<RequiredRole>().unwrap(),
            RequiredRole::Org(OrgRole::Moderator)
        );
        assert_eq!(
            "team:owner".parse::<RequiredRole>().unwrap(),
            RequiredRole::Team(TeamRole::Owner)
        );
        assert_eq!(
            "post-author".parse::<RequiredRole>().unwrap(),
            RequiredRole::Alias(RoleAlias::PostAuthor)
        );
    }

    #[test]
    fn required_role_rejects_unknown_values() {
        for bad in ["admin", "org:admin", "guild:owner", ""] {
            match bad.parse::<RequiredRole>() {
                Err(HiveError::ConfigError { reason }) => {
                    assert!(reason.contains("unknown required role"), "got: {reason}");
                }
                other => panic!("expected ConfigError for {bad:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn required_role_serializes_as_string() {
        let roles = vec![
            RequiredRole::Org(OrgRole::Owner),
            RequiredRole::Alias(RoleAlias::AnyMember),
        ];
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(json, r#"["org:owner","any-member"]"#);

        let decoded: Vec<RequiredRole> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, roles);
    }

    // ── RouteParams ──────────────────────────────────────────────────────────

    #[test]
    fn route_params_treat_empty_values_as_absent() {
        let params = RouteParams::new().with("org", "acme").with("team", "");
        assert_eq!(params.get("org"), Some("acme"));
        assert_eq!(params.get("team"), None);
        assert_eq!(params.get("doc"), None);
    }

    // ── Post relations ───────────────────────────────────────────────────────

    #[test]
    fn post_relations_are_empty_until_populated() {
        let org = Organization::new("acme", "Acme");
        let post = Post::new(PostKind::Doc, &org, "handbook", "Handbook");
        assert!(post.team().is_none());
        assert!(post.creator().is_none());
        assert!(post.maintainer().is_none());
    }

    // ── Ids and errors ───────────────────────────────────────────────────────

    #[test]
    fn entity_ids_are_unique() {
        let ids: std::collections::HashSet<EntityId> = (0..50).map(|_| EntityId::new()).collect();
        assert_eq!(ids.len(), 50);
        assert_ne!(User::new("a").id, User::new("a").id);
    }

    #[test]
    fn error_not_found_display() {
        let err = HiveError::not_found("organization", "acme");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "organization 'acme' not found");
    }

    #[test]
    fn error_internal_display() {
        let err = HiveError::Internal {
            reason: "failed to evaluate post roles".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("internal error"));
    }
}
