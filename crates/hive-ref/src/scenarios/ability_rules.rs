//! Scenario 4: Ability rules
//!
//! Builds per-member capability rule sets from the knowledge-base policy and
//! queries them against the seeded posts. Shows:
//!
//! - alias expansion (`update` reached through `modify`)
//! - a direct rule beating an alias (`delete` for creators only)
//! - field-scoped rules (`update` on a document's `title`)
//! - an inverted condition (`publish` forbidden for team documents)
//! - fail-closed conditional rules when only a type is given

use hive_ability::{entities::DOC, RuleSet, SubjectRef};
use hive_contracts::{entity::Post, error::HiveResult};
use hive_guard::PostDirectory;

use crate::fixtures::{self, Acme};
use crate::policy::{abilities_for, Policies};

/// One capability query and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub who: &'static str,
    pub action: &'static str,
    pub target: String,
    pub field: Option<&'static str>,
    pub allowed: bool,
    pub expected: bool,
}

fn check(
    rules: &RuleSet,
    who: &'static str,
    action: &'static str,
    post: &Post,
    field: Option<&'static str>,
    expected: bool,
) -> Check {
    Check {
        who,
        action,
        target: post.slug.clone(),
        field,
        allowed: rules.can(action, SubjectRef::instance(post), field),
        expected,
    }
}

fn rule_sets(acme: &Acme, policies: &Policies) -> HiveResult<(RuleSet, RuleSet)> {
    let mia = abilities_for(&acme.member.member, &policies.abilities)?;
    let tess = abilities_for(&acme.team_lead.member, &policies.abilities)?;
    Ok((mia, tess))
}

/// Evaluate every query of the scenario.
pub async fn evaluate(policies: &Policies) -> HiveResult<Vec<Check>> {
    let acme = fixtures::seed()?;
    let (mia, tess) = rule_sets(&acme, policies)?;

    let onboarding = acme.directory.find_doc_by_slug("onboarding").await?;
    let runbook = acme.directory.find_doc_by_slug("deploy-runbook").await?;
    let guide = acme.directory.find_doc_by_slug("platform-guide").await?;
    let vpn = acme.directory.find_qna_by_slug("vpn-access").await?;

    let mut checks = vec![
        check(&mia, "mia", "read", &runbook, None, true),
        check(&mia, "mia", "comment", &vpn, None, true),
        check(&mia, "mia", "update", &onboarding, None, true),
        check(&mia, "mia", "delete", &onboarding, None, true),
        check(&mia, "mia", "update", &runbook, None, false),
        check(&mia, "mia", "publish", &onboarding, None, true),
        check(&tess, "tess", "update", &guide, None, true),
        check(&tess, "tess", "delete", &guide, None, false),
        check(&tess, "tess", "update", &guide, Some("title"), true),
        check(&tess, "tess", "update", &runbook, Some("title"), false),
        check(&tess, "tess", "publish", &guide, None, false),
    ];

    checks.push(Check {
        who: "mia",
        action: "update",
        target: format!("any {}", DOC),
        field: None,
        allowed: mia.can("update", SubjectRef::named(DOC), None),
        expected: false,
    });

    Ok(checks)
}

/// Run Scenario 4.
pub async fn run_scenario(policies: &Policies) -> HiveResult<()> {
    println!("=== Scenario 4: Ability Rules ===");
    println!();

    let checks = evaluate(policies).await?;
    for c in &checks {
        let target = match c.field {
            Some(field) => format!("{}.{}", c.target, field),
            None => c.target.clone(),
        };
        println!(
            "  {:<5} {:<8} {:<22} → {:<6} (expected {})",
            c.who,
            c.action,
            target,
            if c.allowed { "Allow" } else { "Deny" },
            if c.expected { "Allow" } else { "Deny" },
        );
    }

    let mismatches = checks.iter().filter(|c| c.allowed != c.expected).count();
    println!();
    println!("  {} check(s), {} unexpected", checks.len(), mismatches);
    println!("  Scenario 4 complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_policy_meets_expectations() {
        let policies = Policies::bundled().unwrap();
        let checks = evaluate(&policies).await.unwrap();
        assert_eq!(checks.len(), 12);
        for c in &checks {
            assert_eq!(
                c.allowed, c.expected,
                "{} {} {} {:?}",
                c.who, c.action, c.target, c.field
            );
        }
    }
}
