//! # hive-ref
//!
//! Reference runtime for the Hive authorization core.
//!
//! Wires the guard and the capability rule store to an in-memory directory
//! seeded with the fictional Acme knowledge base:
//!
//! 1. **Member denied**: a plain member is refused a moderator route.
//! 2. **Creator override**: the creator of a document passes its routes
//!    regardless of rank.
//! 3. **Post team mismatch**: a post route must satisfy both the route's
//!    team and the post's own team.
//! 4. **Ability rules**: per-member capability rule sets built from the
//!    bundled TOML policy.

pub mod fixtures;
pub mod memory;
pub mod policy;
pub mod scenarios;

pub use memory::InMemoryDirectory;
pub use policy::Policies;
