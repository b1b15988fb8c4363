//! Ranked membership roles and the roles a route can require.
//!
//! Organization and team roles share the same ladder
//! (`Member < Moderator < Owner`) but are distinct types so that an org role
//! can never be compared against a team role by accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HiveError;

/// A member's rank inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgRole {
    Member,
    Moderator,
    Owner,
}

/// A member's rank inside a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamRole {
    Member,
    Moderator,
    Owner,
}

impl OrgRole {
    /// The team rank an org role stands in for when the caller has no team
    /// membership. Plain members get nothing.
    pub fn team_substitute(self) -> Option<TeamRole> {
        match self {
            OrgRole::Owner => Some(TeamRole::Owner),
            OrgRole::Moderator => Some(TeamRole::Moderator),
            OrgRole::Member => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrgRole::Member => "member",
            OrgRole::Moderator => "moderator",
            OrgRole::Owner => "owner",
        }
    }
}

impl TeamRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamRole::Member => "member",
            TeamRole::Moderator => "moderator",
            TeamRole::Owner => "owner",
        }
    }
}

/// Requirements that are not a single rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleAlias {
    /// Any member of the organization, whatever their rank.
    AnyMember,
    /// The creator or maintainer of the post being acted upon.
    PostAuthor,
}

/// One acceptable role on a route. A route declares a list of these and the
/// caller needs to satisfy any one of them.
///
/// In TOML and JSON a required role is written as a string:
/// `"org:moderator"`, `"team:owner"`, `"any-member"`, `"post-author"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequiredRole {
    Org(OrgRole),
    Team(TeamRole),
    Alias(RoleAlias),
}

fn parse_rank(rank: &str) -> Option<OrgRole> {
    match rank {
        "member" => Some(OrgRole::Member),
        "moderator" => Some(OrgRole::Moderator),
        "owner" => Some(OrgRole::Owner),
        _ => None,
    }
}

fn to_team(role: OrgRole) -> TeamRole {
    match role {
        OrgRole::Member => TeamRole::Member,
        OrgRole::Moderator => TeamRole::Moderator,
        OrgRole::Owner => TeamRole::Owner,
    }
}

impl FromStr for RequiredRole {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HiveError::ConfigError {
            reason: format!("unknown required role '{}'", s),
        };

        match s {
            "any-member" => return Ok(RequiredRole::Alias(RoleAlias::AnyMember)),
            "post-author" => return Ok(RequiredRole::Alias(RoleAlias::PostAuthor)),
            _ => {}
        }

        let (scope, rank) = s.split_once(':').ok_or_else(invalid)?;
        let rank = parse_rank(rank).ok_or_else(invalid)?;
        match scope {
            "org" => Ok(RequiredRole::Org(rank)),
            "team" => Ok(RequiredRole::Team(to_team(rank))),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for RequiredRole {
    type Error = HiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequiredRole> for String {
    fn from(role: RequiredRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredRole::Org(r) => write!(f, "org:{}", r.as_str()),
            RequiredRole::Team(r) => write!(f, "team:{}", r.as_str()),
            RequiredRole::Alias(RoleAlias::AnyMember) => f.write_str("any-member"),
            RequiredRole::Alias(RoleAlias::PostAuthor) => f.write_str("post-author"),
        }
    }
}

/// The rank facts the role-satisfaction predicate looks at.
///
/// Built by the guard from the resolved `AuthorizationContext`. Everything
/// here is a plain value so the predicate stays a pure function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleContext {
    /// The caller's rank in the organization.
    pub org_role: Option<OrgRole>,
    /// The caller's rank in the team under evaluation, if a member.
    pub team_role: Option<TeamRole>,
    /// Rank of the organization member the action targets.
    pub subject_org_role: Option<OrgRole>,
    /// Rank of the team member the action targets.
    pub subject_team_role: Option<TeamRole>,
    /// Whether a team is part of the evaluation at all.
    pub has_team: bool,
    /// Caller created the post under evaluation.
    pub is_post_creator: bool,
    /// Caller maintains the post under evaluation.
    pub is_post_maintainer: bool,
}

impl RoleContext {
    pub fn is_post_author(&self) -> bool {
        self.is_post_creator || self.is_post_maintainer
    }
}
