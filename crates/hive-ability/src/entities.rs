//! Subject names for the knowledge-base entities.
//!
//! Posts are stored as one type but ruled on as two subjects: an instance
//! resolves to `"Doc"` or `"Qna"` from its kind.

use hive_contracts::entity::{OrgMember, Organization, Post, PostKind, Team, TeamMember};

use crate::subject::Subject;

pub const DOC: &str = "Doc";
pub const QNA: &str = "Qna";

impl Subject for Organization {
    const NAME: &'static str = "Organization";
}

impl Subject for OrgMember {
    const NAME: &'static str = "OrgMember";
}

impl Subject for Team {
    const NAME: &'static str = "Team";
}

impl Subject for TeamMember {
    const NAME: &'static str = "TeamMember";
}

impl Subject for Post {
    const NAME: &'static str = "Post";

    fn subject_name(&self) -> &str {
        match self.kind {
            PostKind::Doc => DOC,
            PostKind::Qna => QNA,
        }
    }
}
