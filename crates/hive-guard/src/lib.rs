//! # hive-guard
//!
//! Hierarchical authorization for knowledge-base routes.
//!
//! A route names an organization and optionally a member, a team, a
//! document, or a Q&A entry. The guard resolves that chain through the
//! directory traits, records what it found on the request, and decides
//! whether the caller's ranks meet the roles the route declares.
//!
//! ```text
//! RouteRoles ──► HierarchyGuard::can_activate ──► RoleSatisfaction
//!                       │
//!                       ▼
//!         Organization/Team/PostDirectory
//! ```

pub mod guard;
pub mod roles;
pub mod routes;
pub mod traits;

pub use guard::HierarchyGuard;
pub use roles::{role_satisfies, RankedRoles};
pub use routes::{RouteConfig, RouteRoleTable, RoutesConfig};
pub use traits::{
    Directory, OrganizationDirectory, PostDirectory, RoleSatisfaction, RouteRoles, TeamDirectory,
};
