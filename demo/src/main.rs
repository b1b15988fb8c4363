//! Hive Knowledge-Base Authorization — Demo CLI
//!
//! Runs one or all of the reference scenarios against the seeded Acme
//! knowledge base. The bundled capability policy and route roles can be
//! replaced from disk.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- member-denied
//!   cargo run -p demo -- creator-override
//!   cargo run -p demo -- post-team-mismatch
//!   cargo run -p demo -- --policy my-policy.toml ability

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hive_contracts::error::HiveResult;
use hive_ref::{
    scenarios::{ability_rules, creator_override, member_denied, post_team_mismatch},
    Policies,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Hive — hierarchical authorization for a multi-tenant knowledge base.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Hive knowledge-base authorization demo",
    long_about = "Runs Hive demo scenarios showing rank checks, post authorship overrides,\n\
                  post team checks, and capability rules over the Acme knowledge base."
)]
struct Cli {
    /// Capability policy TOML to use instead of the bundled one.
    #[arg(long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Route roles TOML to use instead of the bundled one.
    #[arg(long, global = true, value_name = "FILE")]
    routes: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: plain member on a moderator route.
    MemberDenied,
    /// Scenario 2: a document's creator passes regardless of rank.
    CreatorOverride,
    /// Scenario 3: route team and post team must both authorize.
    PostTeamMismatch,
    /// Scenario 4: capability rules with aliases, fields, and conditions.
    Ability,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // RUST_LOG=debug shows every guard step.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match Policies::load(cli.policy.as_deref(), cli.routes.as_deref()) {
        Ok(policies) => {
            info!(routes = policies.routes.len(), "policies ready");
            run(cli.command, &policies).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run(command: Command, policies: &Policies) -> HiveResult<()> {
    match command {
        Command::RunAll => {
            member_denied::run_scenario(policies).await?;
            creator_override::run_scenario(policies).await?;
            post_team_mismatch::run_scenario(policies).await?;
            ability_rules::run_scenario(policies).await
        }
        Command::MemberDenied => member_denied::run_scenario(policies).await,
        Command::CreatorOverride => creator_override::run_scenario(policies).await,
        Command::PostTeamMismatch => post_team_mismatch::run_scenario(policies).await,
        Command::Ability => ability_rules::run_scenario(policies).await,
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Hive — Knowledge-Base Authorization");
    println!("Acme Reference Demo");
    println!("===================================");
    println!();
    println!("Guard pipeline per request:");
    println!("  [1] Read the roles the route handler declares");
    println!("  [2] Resolve organization and the caller's membership");
    println!("  [3] Resolve targeted member, team, and team memberships");
    println!("  [4] Resolve document / Q&A and load team, creator, maintainer");
    println!("  [5] Decide: route context, or route team AND post team for posts");
    println!();
}
