//! Rule set construction and evaluation.
//!
//! Policy is built in two phases:
//!
//! 1. A mutable `RuleSetBuilder` is filled at start-up with `allow`,
//!    `forbid`, and alias calls.
//! 2. `build()` consumes the builder and returns an immutable `RuleSet`.
//!    The rule set has no mutation API, so it can be shared across threads
//!    and queried concurrently. `into_builder()` reopens it, but only for the
//!    sole owner.
//!
//! Evaluation algorithm for `can(action, subject, field)`:
//!
//! 1. Resolve the subject to its key.
//! 2. Try `action`, then every alias containing `action` in insertion order.
//! 3. The first `(candidate, subject key, field)` triple with an entry
//!    decides. A conditional entry is tested against the subject instance.
//! 4. If no candidate has an entry → deny.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::alias::AliasIndex;
use crate::rule::{RuleEntry, RuleKey, RuleOptions};
use crate::subject::{subject_key, SubjectKey, SubjectRef};

/// Mutable rule store used while the application configures its policy.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    rules: HashMap<RuleKey, RuleEntry>,
    aliases: AliasIndex,
}

fn expand<A, S>(actions: A, subjects: S, options: &RuleOptions) -> Vec<RuleKey>
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: Into<SubjectKey>,
{
    let actions: Vec<String> = actions.into_iter().map(|a| a.as_ref().to_string()).collect();
    let subjects: Vec<SubjectKey> = subjects.into_iter().map(Into::into).collect();

    let mut keys = Vec::with_capacity(actions.len() * subjects.len());
    for action in &actions {
        for subject in &subjects {
            for field in options.field_keys() {
                keys.push(RuleKey::new(action, subject, field));
            }
        }
    }
    keys
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit `actions` on `subjects`.
    ///
    /// Without a condition the entry is an unconditional allow. With one, the
    /// action is permitted only for instances satisfying it. Replaces whatever
    /// entry each triple held before.
    pub fn allow<A, S>(&mut self, actions: A, subjects: S, options: RuleOptions) -> &mut Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: Into<SubjectKey>,
    {
        let entry = match &options.condition {
            None => RuleEntry::Allow,
            Some(condition) => RuleEntry::Conditional {
                condition: condition.clone(),
                inverted: false,
            },
        };

        for key in expand(actions, subjects, &options) {
            debug!(
                action = %key.action,
                subject = %key.subject,
                field = ?key.field,
                conditional = options.condition.is_some(),
                "allow rule recorded"
            );
            self.rules.insert(key, entry.clone());
        }
        self
    }

    /// Narrow an existing allow.
    ///
    /// Triples without an entry are left alone; the default is already deny.
    /// Without a condition the entry is removed. With one, the entry is
    /// replaced by its inversion: permitted only when the condition is false.
    pub fn forbid<A, S>(&mut self, actions: A, subjects: S, options: RuleOptions) -> &mut Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: Into<SubjectKey>,
    {
        for key in expand(actions, subjects, &options) {
            if !self.rules.contains_key(&key) {
                trace!(action = %key.action, subject = %key.subject, "forbid without allow ignored");
                continue;
            }

            match &options.condition {
                None => {
                    debug!(action = %key.action, subject = %key.subject, field = ?key.field, "allow rule removed");
                    self.rules.remove(&key);
                }
                Some(condition) => {
                    debug!(action = %key.action, subject = %key.subject, field = ?key.field, "allow rule inverted");
                    self.rules.insert(
                        key,
                        RuleEntry::Conditional {
                            condition: condition.clone(),
                            inverted: true,
                        },
                    );
                }
            }
        }
        self
    }

    /// Make `alias` stand for each of `actions`. Repeated calls extend the
    /// alias; an action already listed is not added twice.
    pub fn add_action_alias<I>(&mut self, alias: &str, actions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.aliases.add(alias, actions);
        self
    }

    /// Remove some actions from `alias`, or the alias itself when `actions`
    /// is `None`.
    pub fn delete_action_alias(&mut self, alias: &str, actions: Option<&[&str]>) -> &mut Self {
        self.aliases.delete(alias, actions);
        self
    }

    /// Drop every alias. Rules are kept.
    pub fn clear_action_aliases(&mut self) -> &mut Self {
        self.aliases.clear();
        self
    }

    /// Drop every rule. Aliases are kept.
    pub fn clear_rules(&mut self) -> &mut Self {
        self.rules.clear();
        self
    }

    /// Number of distinct `(action, subject, field)` keys with a rule.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Freeze the builder into a read-only rule set.
    pub fn build(self) -> RuleSet {
        debug!(rules = self.rules.len(), "rule set built");
        RuleSet {
            rules: self.rules,
            aliases: self.aliases,
        }
    }
}

/// Immutable, shareable rule set.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<RuleKey, RuleEntry>,
    aliases: AliasIndex,
}

impl RuleSet {
    /// Return true if `action` is permitted on `subject`, optionally
    /// restricted to `field`.
    ///
    /// Field matching is exact: an unscoped rule does not answer a field
    /// query and a field rule does not answer an unscoped one.
    pub fn can(&self, action: &str, subject: SubjectRef<'_>, field: Option<&str>) -> bool {
        let key = subject_key(&subject);

        let candidates = std::iter::once(action)
            .chain(self.aliases.aliases_of(action).iter().map(String::as_str));

        for candidate in candidates {
            let Some(entry) = self.rules.get(&RuleKey::new(candidate, &key, field)) else {
                continue;
            };

            let allowed = entry.evaluate(&subject);
            trace!(
                action = %action,
                matched = %candidate,
                subject = %key,
                field = ?field,
                allowed,
                "rule matched"
            );
            return allowed;
        }

        trace!(action = %action, subject = %key, field = ?field, "no rule matched; denying");
        false
    }

    pub fn cannot(&self, action: &str, subject: SubjectRef<'_>, field: Option<&str>) -> bool {
        !self.can(action, subject, field)
    }

    pub fn aliases_of(&self, action: &str) -> &[String] {
        self.aliases.aliases_of(action)
    }

    pub fn actions_for_alias(&self, alias: &str) -> &[String] {
        self.aliases.actions_of(alias)
    }

    /// Number of distinct `(action, subject, field)` keys with a rule.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Reopen the rule set for changes.
    pub fn into_builder(self) -> RuleSetBuilder {
        RuleSetBuilder {
            rules: self.rules,
            aliases: self.aliases,
        }
    }
}
