//! The Acme knowledge base used by every reference scenario.
//!
//! All data is fictional.
//!
//! ```text
//! acme
//! ├── olivia   org owner
//! ├── mo       org moderator
//! ├── mia      org member, no team
//! └── tess     org member
//!     ├── platform   team owner
//!     └── infra      (not a member)
//!
//! docs
//! ├── onboarding       no team,  created by mia
//! ├── deploy-runbook   infra,    created by olivia
//! └── platform-guide   platform, created by olivia, maintained by tess
//!
//! qna
//! └── vpn-access       platform, created by mia
//! ```

use std::sync::Arc;

use hive_contracts::{
    entity::{OrgMember, Organization, Post, PostKind, Team, TeamMember, User},
    error::HiveResult,
    role::{OrgRole, TeamRole},
};

use crate::memory::InMemoryDirectory;

/// A user together with their Acme membership.
#[derive(Debug, Clone)]
pub struct Seat {
    pub user: User,
    pub member: OrgMember,
}

pub struct Acme {
    pub directory: Arc<InMemoryDirectory>,
    pub organization: Organization,
    pub platform: Team,
    pub infra: Team,
    pub owner: Seat,
    pub moderator: Seat,
    pub member: Seat,
    pub team_lead: Seat,
}

fn seat(directory: &InMemoryDirectory, org: &Organization, name: &str, role: OrgRole) -> HiveResult<Seat> {
    let user = User::new(name);
    let member = OrgMember::new(&user, org, name, role);
    directory.insert_org_member(member.clone())?;
    Ok(Seat { user, member })
}

/// Build and store the Acme knowledge base.
pub fn seed() -> HiveResult<Acme> {
    let directory = InMemoryDirectory::new();

    let organization = Organization::new("acme", "Acme Corp");
    directory.insert_organization(organization.clone())?;

    let owner = seat(&directory, &organization, "olivia", OrgRole::Owner)?;
    let moderator = seat(&directory, &organization, "mo", OrgRole::Moderator)?;
    let member = seat(&directory, &organization, "mia", OrgRole::Member)?;
    let team_lead = seat(&directory, &organization, "tess", OrgRole::Member)?;

    let platform = Team::new(&organization, "platform", "Platform");
    let infra = Team::new(&organization, "infra", "Infrastructure");
    directory.insert_team(platform.clone())?;
    directory.insert_team(infra.clone())?;
    directory.insert_team_member(TeamMember::new(&team_lead.member, &platform, TeamRole::Owner))?;

    directory.insert_post(
        Post::new(PostKind::Doc, &organization, "onboarding", "Onboarding checklist")
            .with_creator(&member.member),
    )?;
    directory.insert_post(
        Post::new(PostKind::Doc, &organization, "deploy-runbook", "Deploy runbook")
            .with_team(&infra)
            .with_creator(&owner.member),
    )?;
    directory.insert_post(
        Post::new(PostKind::Doc, &organization, "platform-guide", "Platform guide")
            .with_team(&platform)
            .with_creator(&owner.member)
            .with_maintainer(&team_lead.member),
    )?;
    directory.insert_post(
        Post::new(PostKind::Qna, &organization, "vpn-access", "How do I get VPN access?")
            .with_team(&platform)
            .with_creator(&member.member),
    )?;

    Ok(Acme {
        directory: Arc::new(directory),
        organization,
        platform,
        infra,
        owner,
        moderator,
        member,
        team_lead,
    })
}
