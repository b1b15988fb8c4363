//! Scenario 3: Post team mismatch
//!
//! tess is a plain org member who owns the `platform` team. A post route is
//! checked twice: once against the team in the route, once against the
//! post's own team. Both must pass.
//!
//! Sub-case A — tess, route team `platform`, doc in `infra`      → Deny
//! Sub-case B — tess, route team `platform`, Q&A in `platform`   → Allow
//! Sub-case C — mo (org moderator), same route as sub-case A     → Allow

use hive_contracts::{
    entity::User,
    error::HiveResult,
    request::{params, RouteParams},
};

use crate::fixtures::{self, Acme};
use crate::policy::Policies;
use crate::scenarios::{authorize, describe, guard_for};

fn platform_route(kind: &str, slug: &str) -> RouteParams {
    RouteParams::new()
        .with(params::ORG, "acme")
        .with(params::TEAM, "platform")
        .with(kind, slug)
}

async fn run(
    policies: &Policies,
    caller: impl Fn(&Acme) -> &User,
    handler: &str,
    params: RouteParams,
) -> HiveResult<bool> {
    let acme = fixtures::seed()?;
    let guard = guard_for(&acme, policies);
    authorize(&guard, caller(&acme), handler, params).await
}

pub async fn team_owner_on_other_teams_doc(policies: &Policies) -> HiveResult<bool> {
    let params = platform_route(params::DOC, "deploy-runbook");
    run(policies, |acme| &acme.team_lead.user, "docs.update", params).await
}

pub async fn team_owner_on_own_teams_qna(policies: &Policies) -> HiveResult<bool> {
    let params = platform_route(params::QNA, "vpn-access");
    run(policies, |acme| &acme.team_lead.user, "qna.update", params).await
}

pub async fn org_moderator_on_other_teams_doc(policies: &Policies) -> HiveResult<bool> {
    let params = platform_route(params::DOC, "deploy-runbook");
    run(policies, |acme| &acme.moderator.user, "docs.update", params).await
}

/// Run Scenario 3.
pub async fn run_scenario(policies: &Policies) -> HiveResult<()> {
    println!("=== Scenario 3: Post Team Mismatch ===");
    println!();

    let a = team_owner_on_other_teams_doc(policies).await;
    println!("  Sub-case A: tess → docs.update /acme/teams/platform/docs/deploy-runbook");
    println!("    Requires:      {}", policies.describe_roles("docs.update"));
    println!("    Route team:    platform (tess is owner)");
    println!("    Post team:     infra (tess is not a member)");
    println!("    Decision:      {:<10} expected Deny", describe(&a));
    println!();

    let b = team_owner_on_own_teams_qna(policies).await;
    println!("  Sub-case B: tess → qna.update /acme/teams/platform/qna/vpn-access");
    println!("    Requires:      {}", policies.describe_roles("qna.update"));
    println!("    Route team:    platform (tess is owner)");
    println!("    Post team:     platform");
    println!("    Decision:      {:<10} expected Allow", describe(&b));
    println!();

    let c = org_moderator_on_other_teams_doc(policies).await;
    println!("  Sub-case C: mo → docs.update /acme/teams/platform/docs/deploy-runbook");
    println!("    Org role:      moderator (meets org:moderator in both checks)");
    println!("    Decision:      {:<10} expected Allow", describe(&c));
    println!();

    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}
