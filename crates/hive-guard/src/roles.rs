//! The default rank-comparison predicate.
//!
//! A route's required roles are a disjunction: the caller needs to meet any
//! one of them. An empty list is never met.
//!
//! Per role:
//!
//! - `Org(r)`   — caller's org role ≥ `r`, and a targeted org member must not
//!   outrank the caller.
//! - `Team(r)`  — caller's effective team role ≥ `r`, and a targeted team
//!   member must not outrank it. The effective team role is the higher of the
//!   caller's team membership and the stand-in of their org role
//!   (org owner → team owner, org moderator → team moderator).
//! - `any-member`  — caller belongs to the organization.
//! - `post-author` — caller created or maintains the post.
//!
//! When a post is under evaluation, its creator or maintainer meets any
//! required role.

use hive_contracts::role::{OrgRole, RequiredRole, RoleAlias, RoleContext, TeamRole};

use crate::traits::RoleSatisfaction;

/// Return true if `ctx` meets at least one of `required`.
pub fn role_satisfies(required: &[RequiredRole], ctx: &RoleContext) -> bool {
    required.iter().any(|role| satisfies_one(*role, ctx))
}

fn effective_team_role(ctx: &RoleContext) -> Option<TeamRole> {
    let membership = if ctx.has_team { ctx.team_role } else { None };
    let substitute = ctx.org_role.and_then(OrgRole::team_substitute);
    membership.max(substitute)
}

fn satisfies_one(role: RequiredRole, ctx: &RoleContext) -> bool {
    if ctx.is_post_author() {
        return true;
    }

    match role {
        RequiredRole::Org(min) => ctx.org_role.is_some_and(|caller| {
            caller >= min && ctx.subject_org_role.map_or(true, |subject| subject <= caller)
        }),
        RequiredRole::Team(min) => effective_team_role(ctx).is_some_and(|caller| {
            caller >= min && ctx.subject_team_role.map_or(true, |subject| subject <= caller)
        }),
        RequiredRole::Alias(RoleAlias::AnyMember) => ctx.org_role.is_some(),
        RequiredRole::Alias(RoleAlias::PostAuthor) => false,
    }
}

/// `RoleSatisfaction` backed by `role_satisfies`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedRoles;

impl RoleSatisfaction for RankedRoles {
    fn satisfies(&self, required: &[RequiredRole], ctx: &RoleContext) -> bool {
        role_satisfies(required, ctx)
    }
}
