//! The hierarchical authorization guard.
//!
//! Per request the guard resolves the scope chain from route parameters,
//! shallow to deep, and then decides:
//!
//!   Roles → Organization → OrgMember → Subject member → Team → Post → Decide
//!
//! Each step depends on entities resolved by the steps before it, so lookups
//! run one after another. Resolved entities are written to
//! `GuardRequest::context` for the handlers behind the guard.
//!
//! Failures of required lookups propagate unchanged. The single exception is
//! post relation population, which is logged and normalized to
//! `HiveError::Internal`. A denied request is `Ok(false)`, never an error.

use std::sync::Arc;

use tracing::{debug, error, warn};

use hive_contracts::{
    entity::{EntityId, OrgMember, Post, PostRelation},
    error::{HiveError, HiveResult},
    request::{params, AuthorizationContext, GuardRequest},
    role::{RequiredRole, RoleContext},
};

use crate::roles::RankedRoles;
use crate::traits::{Directory, RoleSatisfaction, RouteRoles};

/// Relations a post needs before its roles can be checked.
const POST_RELATIONS: [PostRelation; 3] =
    [PostRelation::Team, PostRelation::Creator, PostRelation::Maintainer];

/// Ranks of the resolved context, without post authorship.
fn role_context(ctx: &AuthorizationContext) -> RoleContext {
    RoleContext {
        org_role: ctx.org_member.as_ref().map(|m| m.role),
        team_role: ctx.team_member.as_ref().map(|m| m.role),
        subject_org_role: ctx.subject_org_member.as_ref().map(|m| m.role),
        subject_team_role: ctx.subject_team_member.as_ref().map(|m| m.role),
        has_team: ctx.team.is_some(),
        is_post_creator: false,
        is_post_maintainer: false,
    }
}

/// A post reached through an organization's route must belong to it.
fn in_organization(post: Post, organization_id: EntityId, slug: &str) -> HiveResult<Post> {
    if post.organization_id != organization_id {
        warn!(post = %slug, kind = post.kind.as_str(), "post belongs to another organization");
        return Err(HiveError::not_found(post.kind.as_str(), slug));
    }
    Ok(post)
}

fn is_same_member(candidate: Option<&OrgMember>, member: &OrgMember) -> bool {
    candidate.is_some_and(|c| c.id == member.id)
}

/// Decides, per request, whether the caller may reach a route.
///
/// Construct one guard at start-up and share it; it holds no per-request
/// state.
pub struct HierarchyGuard<D> {
    directory: Arc<D>,
    routes: Arc<dyn RouteRoles>,
    role_check: Arc<dyn RoleSatisfaction>,
}

impl<D: Directory> HierarchyGuard<D> {
    /// Create a guard using the default `RankedRoles` predicate.
    pub fn new(directory: Arc<D>, routes: Arc<dyn RouteRoles>) -> Self {
        Self {
            directory,
            routes,
            role_check: Arc::new(RankedRoles),
        }
    }

    /// Replace the role-satisfaction predicate.
    pub fn with_role_check(mut self, role_check: Arc<dyn RoleSatisfaction>) -> Self {
        self.role_check = role_check;
        self
    }

    /// Resolve the request's authorization context and decide.
    ///
    /// # Pipeline
    ///
    /// 1. Read the handler's required roles
    /// 2. Resolve the organization from the `org` parameter; without one,
    ///    allow iff no roles are declared
    /// 3. Resolve the caller's org membership
    /// 4. Resolve the targeted org member (`member` parameter)
    /// 5. Resolve the team (`team` parameter), the caller's team membership
    ///    if any, and the targeted team member
    /// 6. Resolve the document / Q&A (`doc`, `qna` parameters), load their
    ///    team, creator, and maintainer, and check their post roles
    /// 7. Decide: no roles → allow; no post checked → role predicate;
    ///    otherwise → every post check must pass
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error when a required lookup fails,
    /// `HiveError::NotFound` when a post belongs to another organization, and
    /// `HiveError::Internal` when post relations cannot be loaded. Relations
    /// are loaded whether or not the route declares roles.
    pub async fn can_activate(&self, request: &mut GuardRequest) -> HiveResult<bool> {
        let handler = request.handler.clone();

        // ── Step 1: Required roles ───────────────────────────────────────────
        let required = self.routes.required_roles(&handler);
        debug!(handler = %handler, required = ?required, "guard evaluating request");

        let user = &request.user;
        let route = &request.params;
        let ctx = &mut request.context;

        // ── Step 2: Organization ─────────────────────────────────────────────
        let Some(org_slug) = route.get(params::ORG) else {
            let allowed = required.is_none();
            if !allowed {
                warn!(handler = %handler, "roles declared but no organization in route; denying");
            }
            return Ok(allowed);
        };

        let organization = self.directory.find_organization_by_slug(org_slug).await?;

        // ── Step 3: Caller's org membership ──────────────────────────────────
        let org_member = self.directory.find_org_member(user, &organization).await?;
        debug!(
            handler = %handler,
            organization = %organization.slug,
            org_role = org_member.role.as_str(),
            "caller resolved in organization"
        );

        // ── Step 4: Subject org member ───────────────────────────────────────
        if let Some(member_slug) = route.get(params::MEMBER) {
            let subject = self
                .directory
                .find_org_member_by_slug(&organization, member_slug)
                .await?;
            ctx.subject_org_member = Some(subject);
        }

        // ── Step 5: Team context ─────────────────────────────────────────────
        if let Some(team_slug) = route.get(params::TEAM) {
            let team = self.directory.find_team_by_slug(&organization, team_slug).await?;
            ctx.team_member = self.directory.find_team_member_or_null(&org_member, &team).await?;

            if let Some(subject) = &ctx.subject_org_member {
                let subject_team_member = self.directory.find_team_member(subject, &team).await?;
                ctx.subject_team_member = Some(subject_team_member);
            }

            debug!(
                handler = %handler,
                team = %team.slug,
                team_role = ?ctx.team_member.as_ref().map(|m| m.role),
                "team context resolved"
            );
            ctx.team = Some(team);
        }

        let organization_id = organization.id;
        ctx.organization = Some(organization);
        ctx.org_member = Some(org_member);

        // ── Step 6: Post context ─────────────────────────────────────────────
        let mut doc_passes = None;
        if let Some(doc_slug) = route.get(params::DOC) {
            let doc = self.directory.find_doc_by_slug(doc_slug).await?;
            let mut doc = in_organization(doc, organization_id, doc_slug)?;
            self.load_post_relations(&mut doc).await?;
            if let Some(required) = &required {
                doc_passes = Some(self.post_roles_pass(required, &doc, ctx).await?);
            }
            ctx.doc = Some(doc);
        }

        let mut qna_passes = None;
        if let Some(qna_slug) = route.get(params::QNA) {
            let qna = self.directory.find_qna_by_slug(qna_slug).await?;
            let mut qna = in_organization(qna, organization_id, qna_slug)?;
            self.load_post_relations(&mut qna).await?;
            if let Some(required) = &required {
                qna_passes = Some(self.post_roles_pass(required, &qna, ctx).await?);
            }
            ctx.qna = Some(qna);
        }

        // ── Step 7: Decide ───────────────────────────────────────────────────
        let Some(required) = required else {
            debug!(handler = %handler, "no roles declared; allowing");
            return Ok(true);
        };

        let allowed = match (doc_passes, qna_passes) {
            (None, None) => self.role_check.satisfies(&required, &role_context(ctx)),
            (doc, qna) => doc.unwrap_or(true) && qna.unwrap_or(true),
        };

        if allowed {
            debug!(handler = %handler, "request allowed");
        } else {
            warn!(
                handler = %handler,
                doc_passes = ?doc_passes,
                qna_passes = ?qna_passes,
                "request denied"
            );
        }
        Ok(allowed)
    }

    /// Check `required` against a post.
    ///
    /// Loads the post's team, creator, and maintainer, then evaluates the
    /// role predicate twice and requires both:
    ///
    /// - with the route's team context, and
    /// - with the post's own team and the caller's membership in it.
    ///
    /// Creator and maintainer are taken into account both times. The post's
    /// team of record can differ from the team in the route, and each must
    /// authorize the caller on its own.
    ///
    /// # Errors
    ///
    /// `HiveError::Internal` when relations cannot be loaded; the
    /// collaborator's error when the caller's membership in the post's team
    /// cannot be looked up.
    pub async fn check_post_roles(
        &self,
        required: &[RequiredRole],
        post: &mut Post,
        ctx: &AuthorizationContext,
    ) -> HiveResult<bool> {
        self.load_post_relations(post).await?;
        self.post_roles_pass(required, post, ctx).await
    }

    /// Populate team, creator, and maintainer. Any collaborator failure is
    /// logged and reported as `Internal`.
    async fn load_post_relations(&self, post: &mut Post) -> HiveResult<()> {
        if let Err(e) = self.directory.populate_relations(post, &POST_RELATIONS).await {
            error!(
                post = %post.slug,
                kind = post.kind.as_str(),
                error = %e,
                "failed to populate post relations"
            );
            return Err(HiveError::Internal {
                reason: "failed to evaluate post roles".to_string(),
            });
        }
        Ok(())
    }

    async fn post_roles_pass(
        &self,
        required: &[RequiredRole],
        post: &Post,
        ctx: &AuthorizationContext,
    ) -> HiveResult<bool> {
        let Some(org_member) = ctx.org_member.as_ref() else {
            return Ok(false);
        };

        let is_post_creator = is_same_member(post.creator(), org_member);
        let is_post_maintainer = is_same_member(post.maintainer(), org_member);

        let route_ctx = RoleContext {
            is_post_creator,
            is_post_maintainer,
            ..role_context(ctx)
        };
        let route_passes = self.role_check.satisfies(required, &route_ctx);

        let post_team = post.team();
        let post_team_member = match post_team {
            Some(team) if ctx.team.as_ref().is_some_and(|t| t.id == team.id) => ctx.team_member.clone(),
            Some(team) => self.directory.find_team_member_or_null(org_member, team).await?,
            None => None,
        };

        let own_ctx = RoleContext {
            org_role: Some(org_member.role),
            team_role: post_team_member.as_ref().map(|m| m.role),
            subject_org_role: route_ctx.subject_org_role,
            subject_team_role: None,
            has_team: post_team.is_some(),
            is_post_creator,
            is_post_maintainer,
        };
        let own_passes = self.role_check.satisfies(required, &own_ctx);

        debug!(
            post = %post.slug,
            kind = post.kind.as_str(),
            is_post_creator,
            is_post_maintainer,
            route_passes,
            own_passes,
            "post roles evaluated"
        );

        Ok(route_passes && own_passes)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
