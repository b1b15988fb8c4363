//! Collaborator traits consumed by the guard.
//!
//! The guard owns no data. It resolves entities through these traits, asks a
//! `RoleSatisfaction` whether the resolved ranks are enough, and reads the
//! route's required roles from a `RouteRoles` provider:
//!
//! - `OrganizationDirectory` — organizations and their members
//! - `TeamDirectory`         — teams and team memberships
//! - `PostDirectory`         — documents, Q&As, and their relations
//! - `RoleSatisfaction`      — the rank-comparison predicate
//! - `RouteRoles`            — route metadata
//!
//! Lookups that must find something return `HiveError::NotFound` when they
//! don't. `find_team_member_or_null` is the only lookup where absence is a
//! normal answer.

use async_trait::async_trait;

use hive_contracts::{
    entity::{OrgMember, Organization, Post, PostRelation, Team, TeamMember, User},
    error::HiveResult,
    role::{RequiredRole, RoleContext},
};

#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn find_organization_by_slug(&self, slug: &str) -> HiveResult<Organization>;

    /// The caller's membership in `organization`.
    async fn find_org_member(&self, user: &User, organization: &Organization) -> HiveResult<OrgMember>;

    async fn find_org_member_by_slug(
        &self,
        organization: &Organization,
        slug: &str,
    ) -> HiveResult<OrgMember>;
}

#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn find_team_by_slug(&self, organization: &Organization, slug: &str) -> HiveResult<Team>;

    /// `Ok(None)` when `org_member` does not belong to `team`. Errors are
    /// reserved for the directory itself failing.
    async fn find_team_member_or_null(
        &self,
        org_member: &OrgMember,
        team: &Team,
    ) -> HiveResult<Option<TeamMember>>;

    async fn find_team_member(&self, org_member: &OrgMember, team: &Team) -> HiveResult<TeamMember>;
}

#[async_trait]
pub trait PostDirectory: Send + Sync {
    async fn find_doc_by_slug(&self, slug: &str) -> HiveResult<Post>;

    async fn find_qna_by_slug(&self, slug: &str) -> HiveResult<Post>;

    /// Load `relations` into `post.relations`.
    async fn populate_relations(&self, post: &mut Post, relations: &[PostRelation]) -> HiveResult<()>;
}

/// Everything the guard needs to resolve a request.
pub trait Directory: OrganizationDirectory + TeamDirectory + PostDirectory {}

impl<T> Directory for T where T: OrganizationDirectory + TeamDirectory + PostDirectory {}

/// Decides whether resolved ranks meet a route's required roles.
///
/// Must be pure: the guard may call it more than once per request.
pub trait RoleSatisfaction: Send + Sync {
    fn satisfies(&self, required: &[RequiredRole], ctx: &RoleContext) -> bool;
}

/// Route metadata: the roles a handler declares.
pub trait RouteRoles: Send + Sync {
    /// `None` when the handler declares no roles at all.
    fn required_roles(&self, handler: &str) -> Option<Vec<RequiredRole>>;
}
