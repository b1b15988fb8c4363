//! Knowledge-base entities as seen by the authorization core.
//!
//! These are read models. The persistence layer owns the full records;
//! the guard only needs identity, slugs, roles, and post authorship.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::{OrgRole, TeamRole};

/// Stable identifier shared by every entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new, unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: EntityId,
    pub slug: String,
    pub name: String,
}

impl Organization {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// A user's membership in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMember {
    pub id: EntityId,
    pub user_id: EntityId,
    pub organization_id: EntityId,
    /// Route-addressable handle, unique within the organization.
    pub slug: String,
    pub role: OrgRole,
}

impl OrgMember {
    pub fn new(user: &User, organization: &Organization, slug: impl Into<String>, role: OrgRole) -> Self {
        Self {
            id: EntityId::new(),
            user_id: user.id,
            organization_id: organization.id,
            slug: slug.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub organization_id: EntityId,
    pub slug: String,
    pub name: String,
}

impl Team {
    pub fn new(organization: &Organization, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            organization_id: organization.id,
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// An organization member's membership in one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: EntityId,
    pub org_member_id: EntityId,
    pub team_id: EntityId,
    pub role: TeamRole,
}

impl TeamMember {
    pub fn new(org_member: &OrgMember, team: &Team, role: TeamRole) -> Self {
        Self {
            id: EntityId::new(),
            org_member_id: org_member.id,
            team_id: team.id,
            role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostKind {
    Doc,
    Qna,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Doc => "doc",
            PostKind::Qna => "qna",
        }
    }
}

/// A relation of a post that can be loaded on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostRelation {
    Team,
    Creator,
    Maintainer,
}

/// Relations loaded on demand by `populate_relations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRelations {
    pub team: Option<Team>,
    pub creator: Option<OrgMember>,
    pub maintainer: Option<OrgMember>,
}

/// A document or Q&A entry.
///
/// The foreign keys are always present on the record; `relations` stays
/// `None` until a collaborator populates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub kind: PostKind,
    pub slug: String,
    pub title: String,
    pub organization_id: EntityId,
    pub team_id: Option<EntityId>,
    pub creator_id: Option<EntityId>,
    pub maintainer_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub relations: Option<PostRelations>,
}

impl Post {
    pub fn new(
        kind: PostKind,
        organization: &Organization,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            slug: slug.into(),
            title: title.into(),
            organization_id: organization.id,
            team_id: None,
            creator_id: None,
            maintainer_id: None,
            created_at: Utc::now(),
            relations: None,
        }
    }

    pub fn with_team(mut self, team: &Team) -> Self {
        self.team_id = Some(team.id);
        self
    }

    pub fn with_creator(mut self, creator: &OrgMember) -> Self {
        self.creator_id = Some(creator.id);
        self
    }

    pub fn with_maintainer(mut self, maintainer: &OrgMember) -> Self {
        self.maintainer_id = Some(maintainer.id);
        self
    }

    /// The post's own team, once relations are populated.
    pub fn team(&self) -> Option<&Team> {
        self.relations.as_ref().and_then(|r| r.team.as_ref())
    }

    pub fn creator(&self) -> Option<&OrgMember> {
        self.relations.as_ref().and_then(|r| r.creator.as_ref())
    }

    pub fn maintainer(&self) -> Option<&OrgMember> {
        self.relations.as_ref().and_then(|r| r.maintainer.as_ref())
    }
}
