//! In-memory directory for the reference runtime.
//!
//! `InMemoryDirectory` implements every collaborator trait the guard needs
//! over a single `RwLock`-guarded store, making it safe to share behind an
//! `Arc` while requests are evaluated concurrently.
//!
//! Documents and Q&As are addressed by slug alone. Relation population can be
//! made to fail for chosen slugs with `fail_relations_for`, which stands in
//! for a storage outage in scenarios and tests.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use hive_contracts::{
    entity::{EntityId, OrgMember, Organization, Post, PostKind, PostRelation, Team, TeamMember, User},
    error::{HiveError, HiveResult},
};
use hive_guard::{OrganizationDirectory, PostDirectory, TeamDirectory};

#[derive(Debug, Default)]
struct Store {
    organizations: HashMap<String, Organization>,
    org_members: HashMap<EntityId, OrgMember>,
    teams: HashMap<EntityId, Team>,
    /// Keyed by `(org member id, team id)`.
    team_members: HashMap<(EntityId, EntityId), TeamMember>,
    docs: HashMap<String, Post>,
    qnas: HashMap<String, Post>,
    failing_relations: HashSet<String>,
}

impl Store {
    fn posts(&self, kind: PostKind) -> &HashMap<String, Post> {
        match kind {
            PostKind::Doc => &self.docs,
            PostKind::Qna => &self.qnas,
        }
    }

    fn find_post(&self, kind: PostKind, slug: &str) -> HiveResult<Post> {
        self.posts(kind)
            .get(slug)
            .cloned()
            .ok_or_else(|| HiveError::not_found(kind.as_str(), slug))
    }

    fn member(&self, id: Option<EntityId>) -> Option<OrgMember> {
        id.and_then(|id| self.org_members.get(&id).cloned())
    }
}

/// Thread-safe in-memory implementation of the directory traits.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    store: RwLock<Store>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> HiveResult<RwLockReadGuard<'_, Store>> {
        self.store.read().map_err(|e| HiveError::Unavailable {
            reason: format!("directory lock poisoned: {}", e),
        })
    }

    fn write(&self) -> HiveResult<RwLockWriteGuard<'_, Store>> {
        self.store.write().map_err(|e| HiveError::Unavailable {
            reason: format!("directory lock poisoned: {}", e),
        })
    }

    pub fn insert_organization(&self, organization: Organization) -> HiveResult<()> {
        debug!(organization = %organization.slug, "organization stored");
        self.write()?
            .organizations
            .insert(organization.slug.clone(), organization);
        Ok(())
    }

    pub fn insert_org_member(&self, member: OrgMember) -> HiveResult<()> {
        debug!(member = %member.slug, role = member.role.as_str(), "org member stored");
        self.write()?.org_members.insert(member.id, member);
        Ok(())
    }

    pub fn insert_team(&self, team: Team) -> HiveResult<()> {
        debug!(team = %team.slug, "team stored");
        self.write()?.teams.insert(team.id, team);
        Ok(())
    }

    pub fn insert_team_member(&self, member: TeamMember) -> HiveResult<()> {
        self.write()?
            .team_members
            .insert((member.org_member_id, member.team_id), member);
        Ok(())
    }

    /// Store a document or Q&A, replacing any post of the same kind and slug.
    pub fn insert_post(&self, post: Post) -> HiveResult<()> {
        debug!(post = %post.slug, kind = post.kind.as_str(), "post stored");
        let mut store = self.write()?;
        let posts = match post.kind {
            PostKind::Doc => &mut store.docs,
            PostKind::Qna => &mut store.qnas,
        };
        posts.insert(post.slug.clone(), post);
        Ok(())
    }

    /// Make `populate_relations` fail for every post with this slug.
    pub fn fail_relations_for(&self, slug: impl Into<String>) -> HiveResult<()> {
        self.write()?.failing_relations.insert(slug.into());
        Ok(())
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryDirectory {
    async fn find_organization_by_slug(&self, slug: &str) -> HiveResult<Organization> {
        self.read()?
            .organizations
            .get(slug)
            .cloned()
            .ok_or_else(|| HiveError::not_found("organization", slug))
    }

    async fn find_org_member(&self, user: &User, organization: &Organization) -> HiveResult<OrgMember> {
        self.read()?
            .org_members
            .values()
            .find(|m| m.user_id == user.id && m.organization_id == organization.id)
            .cloned()
            .ok_or_else(|| HiveError::not_found("org member", user.username.as_str()))
    }

    async fn find_org_member_by_slug(
        &self,
        organization: &Organization,
        slug: &str,
    ) -> HiveResult<OrgMember> {
        self.read()?
            .org_members
            .values()
            .find(|m| m.slug == slug && m.organization_id == organization.id)
            .cloned()
            .ok_or_else(|| HiveError::not_found("org member", slug))
    }
}

#[async_trait]
impl TeamDirectory for InMemoryDirectory {
    async fn find_team_by_slug(&self, organization: &Organization, slug: &str) -> HiveResult<Team> {
        self.read()?
            .teams
            .values()
            .find(|t| t.slug == slug && t.organization_id == organization.id)
            .cloned()
            .ok_or_else(|| HiveError::not_found("team", slug))
    }

    async fn find_team_member_or_null(
        &self,
        org_member: &OrgMember,
        team: &Team,
    ) -> HiveResult<Option<TeamMember>> {
        Ok(self
            .read()?
            .team_members
            .get(&(org_member.id, team.id))
            .cloned())
    }

    async fn find_team_member(&self, org_member: &OrgMember, team: &Team) -> HiveResult<TeamMember> {
        self.find_team_member_or_null(org_member, team)
            .await?
            .ok_or_else(|| HiveError::not_found("team member", org_member.slug.as_str()))
    }
}

#[async_trait]
impl PostDirectory for InMemoryDirectory {
    async fn find_doc_by_slug(&self, slug: &str) -> HiveResult<Post> {
        self.read()?.find_post(PostKind::Doc, slug)
    }

    async fn find_qna_by_slug(&self, slug: &str) -> HiveResult<Post> {
        self.read()?.find_post(PostKind::Qna, slug)
    }

    async fn populate_relations(&self, post: &mut Post, relations: &[PostRelation]) -> HiveResult<()> {
        let store = self.read()?;
        if store.failing_relations.contains(&post.slug) {
            warn!(post = %post.slug, "simulated relation store failure");
            return Err(HiveError::Unavailable {
                reason: format!("relations for post '{}' are unavailable", post.slug),
            });
        }

        let mut loaded = post.relations.take().unwrap_or_default();
        for relation in relations {
            match relation {
                PostRelation::Team => {
                    loaded.team = post.team_id.and_then(|id| store.teams.get(&id).cloned());
                }
                PostRelation::Creator => loaded.creator = store.member(post.creator_id),
                PostRelation::Maintainer => loaded.maintainer = store.member(post.maintainer_id),
            }
        }
        post.relations = Some(loaded);
        Ok(())
    }
}
