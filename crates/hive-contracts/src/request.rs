//! Per-request types: route parameters, the inbound guard request, and the
//! authorization context the guard resolves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::{OrgMember, Organization, Post, Team, TeamMember, User};

/// Route parameter names the guard understands.
pub mod params {
    /// Organization slug.
    pub const ORG: &str = "org";
    /// Slug of the organization member the action targets.
    pub const MEMBER: &str = "member";
    /// Team slug.
    pub const TEAM: &str = "team";
    /// Document slug.
    pub const DOC: &str = "doc";
    /// Q&A slug.
    pub const QNA: &str = "qna";
}

/// Path parameters extracted by the router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a parameter. Empty values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Entities the guard resolved for one request.
///
/// Every field stays `None` unless its route parameter was present and the
/// lookup succeeded. Handlers downstream of the guard read these instead of
/// fetching again. The context lives and dies with its request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub organization: Option<Organization>,
    pub org_member: Option<OrgMember>,
    pub subject_org_member: Option<OrgMember>,
    pub team: Option<Team>,
    pub team_member: Option<TeamMember>,
    pub subject_team_member: Option<TeamMember>,
    pub doc: Option<Post>,
    pub qna: Option<Post>,
}

/// An inbound request as the guard sees it.
#[derive(Debug, Clone)]
pub struct GuardRequest {
    /// The authenticated caller.
    pub user: User,
    /// Name of the matched route handler, used to look up required roles.
    pub handler: String,
    pub params: RouteParams,
    /// Filled in by the guard.
    pub context: AuthorizationContext,
}

impl GuardRequest {
    pub fn new(user: User, handler: impl Into<String>, params: RouteParams) -> Self {
        Self {
            user,
            handler: handler.into(),
            params,
            context: AuthorizationContext::default(),
        }
    }
}
