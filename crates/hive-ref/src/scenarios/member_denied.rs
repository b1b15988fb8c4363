//! Scenario 1: Member denied
//!
//! mia is a plain org member with no team. `teams.create` requires an org
//! moderator and there is no post in the route, so the role predicate alone
//! decides: denied. mo, an org moderator, makes the same request and is
//! allowed.

use hive_contracts::{
    error::HiveResult,
    request::{params, RouteParams},
};

use crate::fixtures;
use crate::policy::Policies;
use crate::scenarios::{authorize, describe, guard_for};

const HANDLER: &str = "teams.create";

fn route() -> RouteParams {
    RouteParams::new().with(params::ORG, "acme")
}

/// mia asks to create a team.
pub async fn member_creates_team(policies: &Policies) -> HiveResult<bool> {
    let acme = fixtures::seed()?;
    let guard = guard_for(&acme, policies);
    authorize(&guard, &acme.member.user, HANDLER, route()).await
}

/// mo asks to create a team.
pub async fn moderator_creates_team(policies: &Policies) -> HiveResult<bool> {
    let acme = fixtures::seed()?;
    let guard = guard_for(&acme, policies);
    authorize(&guard, &acme.moderator.user, HANDLER, route()).await
}

/// Run Scenario 1.
pub async fn run_scenario(policies: &Policies) -> HiveResult<()> {
    println!("=== Scenario 1: Member Denied ===");
    println!();
    println!("  Route:    {} (org = acme)", HANDLER);
    println!("  Requires: {}", policies.describe_roles(HANDLER));
    println!();

    let member = member_creates_team(policies).await;
    println!("  mia (org member, no team)  → {:<8} expected Deny", describe(&member));

    let moderator = moderator_creates_team(policies).await;
    println!("  mo  (org moderator)        → {:<8} expected Allow", describe(&moderator));

    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}
