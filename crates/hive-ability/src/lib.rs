//! # hive-ability
//!
//! A deny-by-default capability rule store.
//!
//! ## Overview
//!
//! Rules say which actions are permitted on which subjects. A rule may be
//! scoped to fields, gated by a condition over the subject instance, and
//! reached through action aliases. Anything not explicitly allowed is denied,
//! and no query ever returns an error.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hive_ability::{RuleOptions, RuleSetBuilder, SubjectRef};
//!
//! let mut builder = RuleSetBuilder::new();
//! builder
//!     .add_action_alias("modify", ["update", "delete"])
//!     .allow(["create", "modify"], ["Doc"], RuleOptions::default());
//! let rules = builder.build();
//!
//! assert!(rules.can("update", SubjectRef::named("Doc"), None));
//! ```
//!
//! ## Rule storage
//!
//! There is exactly one entry per `(action, subject, field)` triple and the
//! latest call wins. `forbid` only narrows an existing `allow`: without a
//! condition it removes the entry, with one it inverts it.

pub mod alias;
pub mod config;
pub mod engine;
pub mod entities;
pub mod rule;
pub mod subject;

pub use config::{ConditionRegistry, PolicyConfig};
pub use engine::{RuleSet, RuleSetBuilder};
pub use rule::{Condition, RuleOptions};
pub use subject::{obj_to_subject, subject_key, Subject, SubjectKey, SubjectRef, TaggedObject};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use hive_contracts::entity::{OrgMember, Organization, Post, PostKind, User};
    use hive_contracts::role::OrgRole;

    use crate::{obj_to_subject, RuleOptions, RuleSetBuilder, Subject, SubjectRef};

    // ── Helpers ───────────────────────────────────────────────────────────────

    struct Article {
        author: String,
        locked: bool,
    }

    impl Subject for Article {
        const NAME: &'static str = "Article";
    }

    fn article(author: &str) -> Article {
        Article {
            author: author.to_string(),
            locked: false,
        }
    }

    fn none() -> RuleOptions {
        RuleOptions::default()
    }

    // ── 1. deny-by-default ────────────────────────────────────────────────────

    /// With no rules registered, every query is denied.
    #[test]
    fn test_deny_by_default() {
        let rules = RuleSetBuilder::new().build();

        assert!(!rules.can("read", SubjectRef::named("Doc"), None));
        assert!(!rules.can("read", SubjectRef::type_of::<Article>(), None));
        assert!(!rules.can("read", SubjectRef::instance(&article("ada")), Some("title")));
        assert!(rules.cannot("read", SubjectRef::named("Doc"), None));
    }

    // ── 2. allow / forbid override ────────────────────────────────────────────

    /// allow → forbid → deny; allow again → permitted.
    #[test]
    fn test_forbid_removes_allow_and_allow_restores_it() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["update"], ["Doc"], none());
        builder.forbid(["update"], ["Doc"], none());
        let rules = builder.build();
        assert!(!rules.can("update", SubjectRef::named("Doc"), None));

        let mut builder = rules.into_builder();
        builder.allow(["update"], ["Doc"], none());
        let rules = builder.build();
        assert!(rules.can("update", SubjectRef::named("Doc"), None));
    }

    /// forbid on a triple that was never allowed stays a deny and does not
    /// create an entry.
    #[test]
    fn test_forbid_without_allow_is_noop() {
        let mut builder = RuleSetBuilder::new();
        builder.forbid(["delete"], ["Doc"], RuleOptions::new().when(|_: &Article| false));
        assert_eq!(builder.rule_count(), 0);
        assert!(!builder.build().can("delete", SubjectRef::named("Doc"), None));
    }

    /// The latest call on a triple replaces the previous entry.
    #[test]
    fn test_latest_allow_replaces_conditional_entry() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["update"], [Article::NAME], RuleOptions::new().when(|a: &Article| a.author == "ada"));
        builder.allow(["update"], [Article::NAME], none());
        let rules = builder.build();

        assert_eq!(rules.rule_count(), 1);
        assert!(rules.can("update", SubjectRef::instance(&article("bob")), None));
    }

    // ── 3. field scoping ──────────────────────────────────────────────────────

    #[test]
    fn test_field_rule_does_not_answer_unscoped_query() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["update"], ["Doc"], RuleOptions::new().field("title"));
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::named("Doc"), Some("title")));
        assert!(!rules.can("update", SubjectRef::named("Doc"), None));
        assert!(!rules.can("update", SubjectRef::named("Doc"), Some("body")));
    }

    #[test]
    fn test_unscoped_rule_does_not_answer_field_query() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["update"], ["Doc"], none());
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::named("Doc"), None));
        assert!(!rules.can("update", SubjectRef::named("Doc"), Some("title")));
    }

    #[test]
    fn test_coarse_and_fine_grants_coexist() {
        let mut builder = RuleSetBuilder::new();
        builder
            .allow(["update"], ["Doc"], none())
            .allow(["update"], ["Doc"], RuleOptions::new().fields(["title", "tags"]))
            .forbid(["update"], ["Doc"], RuleOptions::new().field("tags"));
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::named("Doc"), None));
        assert!(rules.can("update", SubjectRef::named("Doc"), Some("title")));
        assert!(!rules.can("update", SubjectRef::named("Doc"), Some("tags")));
    }

    // ── 4. aliases ────────────────────────────────────────────────────────────

    /// Allowing an alias permits each action it stands for; deleting the
    /// alias withdraws them while the alias action itself stays allowed.
    #[test]
    fn test_alias_expansion_and_deletion() {
        let mut builder = RuleSetBuilder::new();
        builder
            .add_action_alias("modify", ["update", "delete"])
            .allow(["modify"], ["Doc"], none());
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::named("Doc"), None));
        assert!(rules.can("delete", SubjectRef::named("Doc"), None));
        assert!(!rules.can("create", SubjectRef::named("Doc"), None));

        let mut builder = rules.into_builder();
        builder.delete_action_alias("modify", None);
        let rules = builder.build();

        assert!(!rules.can("update", SubjectRef::named("Doc"), None));
        assert!(!rules.can("delete", SubjectRef::named("Doc"), None));
        assert!(rules.can("modify", SubjectRef::named("Doc"), None));
    }

    /// Adding to an existing alias extends it without duplicates, and
    /// `rule_count` counts one key per action and subject.
    #[test]
    fn test_repeated_alias_additions_extend() {
        let mut builder = RuleSetBuilder::new();
        builder
            .add_action_alias("modify", ["update"])
            .add_action_alias("modify", ["update", "delete"])
            .allow(["modify", "read"], ["Doc"], none());
        assert_eq!(builder.rule_count(), 2);
        let rules = builder.build();

        assert_eq!(rules.actions_for_alias("modify"), ["update", "delete"]);
        assert!(rules.can("delete", SubjectRef::named("Doc"), None));
    }

    /// A direct rule on the action is found before any alias.
    #[test]
    fn test_direct_rule_wins_over_alias() {
        let mut builder = RuleSetBuilder::new();
        builder
            .add_action_alias("modify", ["update"])
            .allow(["modify"], [Article::NAME], none())
            .allow(["update"], [Article::NAME], RuleOptions::new().when(|a: &Article| !a.locked));
        let rules = builder.build();

        let mut locked = article("ada");
        locked.locked = true;
        assert!(!rules.can("update", SubjectRef::instance(&locked), None));
        assert!(rules.can("update", SubjectRef::instance(&article("ada")), None));
    }

    /// Aliases are tried in insertion order and the first matching entry
    /// decides, even when it denies.
    #[test]
    fn test_first_matching_alias_decides() {
        let mut builder = RuleSetBuilder::new();
        builder
            .add_action_alias("edit", ["update"])
            .add_action_alias("modify", ["update"])
            .allow(["edit"], [Article::NAME], RuleOptions::new().when(|a: &Article| a.author == "ada"))
            .allow(["modify"], [Article::NAME], none());
        let rules = builder.build();

        assert_eq!(rules.aliases_of("update"), ["edit", "modify"]);
        assert!(rules.can("update", SubjectRef::instance(&article("ada")), None));
        assert!(!rules.can("update", SubjectRef::instance(&article("bob")), None));
    }

    #[test]
    fn test_partial_alias_deletion_and_clear() {
        let mut builder = RuleSetBuilder::new();
        builder
            .add_action_alias("modify", ["update", "delete"])
            .allow(["modify"], ["Doc"], none())
            .delete_action_alias("modify", Some(&["delete"][..]));
        let rules = builder.build();

        assert_eq!(rules.actions_for_alias("modify"), ["update"]);
        assert!(rules.can("update", SubjectRef::named("Doc"), None));
        assert!(!rules.can("delete", SubjectRef::named("Doc"), None));

        let mut builder = rules.into_builder();
        builder.clear_action_aliases();
        assert!(!builder.build().can("update", SubjectRef::named("Doc"), None));
    }

    // ── 5. build / into_builder ───────────────────────────────────────────────

    /// A built rule set cannot be changed behind a reader's back; reopening
    /// it takes ownership and leaves the original rules in place.
    #[test]
    fn test_reopened_rule_set_keeps_rules_until_cleared() {
        let mut builder = RuleSetBuilder::new();
        builder.add_action_alias("modify", ["update"]).allow(["read"], ["Doc"], none());
        let rules = builder.build();
        let shared = std::sync::Arc::new(rules.clone());

        let mut reopened = rules.into_builder();
        assert_eq!(reopened.rule_count(), 1);
        reopened.clear_rules();
        let cleared = reopened.build();

        assert!(shared.can("read", SubjectRef::named("Doc"), None));
        assert!(!cleared.can("read", SubjectRef::named("Doc"), None));
        assert_eq!(cleared.actions_for_alias("modify"), ["update"]);
    }

    #[test]
    fn test_rule_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::RuleSet>();
    }

    // ── 6. conditions ─────────────────────────────────────────────────────────

    #[test]
    fn test_conditional_allow_on_instances() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(
            ["update"],
            [Article::NAME],
            RuleOptions::new().when(|a: &Article| a.author == "ada"),
        );
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::instance(&article("ada")), None));
        assert!(!rules.can("update", SubjectRef::instance(&article("bob")), None));
    }

    /// forbid with a condition inverts the entry: permitted only when the
    /// condition is false.
    #[test]
    fn test_conditional_forbid_inverts_allow() {
        let mut builder = RuleSetBuilder::new();
        builder
            .allow(["update"], [Article::NAME], none())
            .forbid(["update"], [Article::NAME], RuleOptions::new().when(|a: &Article| a.locked));
        let rules = builder.build();

        let mut locked = article("ada");
        locked.locked = true;
        assert!(rules.can("update", SubjectRef::instance(&article("ada")), None));
        assert!(!rules.can("update", SubjectRef::instance(&locked), None));
    }

    /// Without an instance there is nothing to test a condition against, so
    /// conditional entries deny for bare types and tags in both directions.
    #[test]
    fn test_conditional_entries_deny_bare_types() {
        let mut builder = RuleSetBuilder::new();
        builder
            .allow(["read"], [Article::NAME], RuleOptions::new().when(|_: &Article| true))
            .allow(["update"], [Article::NAME], none())
            .forbid(["update"], [Article::NAME], RuleOptions::new().when(|_: &Article| false));
        let rules = builder.build();

        assert!(!rules.can("read", SubjectRef::type_of::<Article>(), None));
        assert!(!rules.can("read", SubjectRef::named("Article"), None));
        assert!(!rules.can("update", SubjectRef::type_of::<Article>(), None));
        assert!(rules.can("update", SubjectRef::instance(&article("ada")), None));
    }

    /// A condition written for one type never matches an instance of another
    /// type that happens to share the subject key.
    #[test]
    fn test_condition_type_mismatch_denies() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["read"], ["Article"], RuleOptions::new().when(|_: &Article| true));
        let rules = builder.build();

        let lookalike = obj_to_subject(json!({ "author": "ada" }), "Article");
        assert!(!rules.can("read", SubjectRef::tagged(&lookalike), None));
    }

    // ── 7. subject keys ───────────────────────────────────────────────────────

    /// Tagged JSON objects are ruled on like named subjects; untagged ones
    /// fall back to the generic key.
    #[test]
    fn test_tagged_objects_match_named_rules() {
        let mut builder = RuleSetBuilder::new();
        builder.allow(["read"], ["Doc"], none());
        let rules = builder.build();

        let data = json!({ "title": "Runbook" });
        let tagged = obj_to_subject(data.clone(), "Doc");
        assert!(rules.can("read", SubjectRef::tagged(&tagged), None));
        assert!(!rules.can("read", SubjectRef::untagged(&data), None));
    }

    /// Posts resolve to "Doc" or "Qna" by kind, and conditions see the post.
    #[test]
    fn test_post_instances_use_kind_as_subject() {
        let org = Organization::new("acme", "Acme");
        let author = OrgMember::new(&User::new("ada"), &org, "ada", OrgRole::Member);
        let doc = Post::new(PostKind::Doc, &org, "handbook", "Handbook").with_creator(&author);
        let qna = Post::new(PostKind::Qna, &org, "vpn", "VPN?");

        let author_id = author.id;
        let mut builder = RuleSetBuilder::new();
        builder.allow(
            ["update"],
            [crate::entities::DOC],
            RuleOptions::new().when(move |p: &Post| p.creator_id == Some(author_id)),
        );
        let rules = builder.build();

        assert!(rules.can("update", SubjectRef::instance(&doc), None));
        assert!(!rules.can("update", SubjectRef::instance(&qna), None));
        assert!(!rules.can("update", SubjectRef::type_of::<Post>(), None));
    }
}
