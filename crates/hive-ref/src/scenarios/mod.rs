//! Reference scenarios.
//!
//! Each scenario seeds the Acme knowledge base, wires a real
//! `HierarchyGuard` or capability rule set to it, and prints the decisions
//! it reaches alongside the expected ones.

pub mod ability_rules;
pub mod creator_override;
pub mod member_denied;
pub mod post_team_mismatch;

use hive_contracts::{
    entity::User,
    error::HiveResult,
    request::{GuardRequest, RouteParams},
};
use hive_guard::HierarchyGuard;

use crate::fixtures::Acme;
use crate::memory::InMemoryDirectory;
use crate::policy::Policies;

pub(crate) fn guard_for(acme: &Acme, policies: &Policies) -> HierarchyGuard<InMemoryDirectory> {
    HierarchyGuard::new(acme.directory.clone(), policies.routes.clone())
}

/// Run one request through `guard`.
pub(crate) async fn authorize(
    guard: &HierarchyGuard<InMemoryDirectory>,
    user: &User,
    handler: &str,
    params: RouteParams,
) -> HiveResult<bool> {
    let mut request = GuardRequest::new(user.clone(), handler, params);
    guard.can_activate(&mut request).await
}

pub(crate) fn describe(decision: &HiveResult<bool>) -> String {
    match decision {
        Ok(true) => "Allow".to_string(),
        Ok(false) => "Deny".to_string(),
        Err(e) => format!("Error ({})", e),
    }
}
