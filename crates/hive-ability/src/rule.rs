//! Rule storage types.
//!
//! A rule set holds at most one `RuleEntry` per `(action, subject, field)`
//! triple. A missing entry is an implicit deny.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::subject::{SubjectKey, SubjectRef};

/// Composite key of a rule. `field: None` means "not field scoped".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub action: String,
    pub subject: SubjectKey,
    pub field: Option<String>,
}

impl RuleKey {
    pub fn new(action: &str, subject: &SubjectKey, field: Option<&str>) -> Self {
        Self {
            action: action.to_string(),
            subject: subject.clone(),
            field: field.map(str::to_string),
        }
    }
}

/// A predicate over a subject instance.
///
/// Stored type-erased; an instance of any type other than the one the
/// condition was written for never satisfies it.
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>);

impl Condition {
    pub fn new<S, F>(predicate: F) -> Self
    where
        S: Any,
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |value: &dyn Any| {
            value.downcast_ref::<S>().is_some_and(|s| predicate(s))
        }))
    }

    pub fn test(&self, value: &dyn Any) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// What is stored for a triple.
#[derive(Debug, Clone)]
pub enum RuleEntry {
    /// Permitted whenever this entry is the first match.
    Allow,
    /// Permitted only if the condition holds, or, when `inverted`, only if it
    /// does not hold.
    Conditional { condition: Condition, inverted: bool },
}

impl RuleEntry {
    /// Decide this entry for `subject`.
    ///
    /// A conditional entry queried without an instance (a bare tag or type)
    /// denies in both directions: nothing is available to test.
    pub fn evaluate(&self, subject: &SubjectRef<'_>) -> bool {
        match self {
            RuleEntry::Allow => true,
            RuleEntry::Conditional { condition, inverted } => match subject.instance_value() {
                Some(value) => condition.test(value) != *inverted,
                None => false,
            },
        }
    }
}

/// Optional scoping for `allow` and `forbid`.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    /// Fields the rule is scoped to. Empty means unscoped.
    pub fields: Vec<String>,
    pub condition: Option<Condition>,
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Gate the rule on a typed predicate.
    pub fn when<S, F>(self, predicate: F) -> Self
    where
        S: Any,
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.condition(Condition::new(predicate))
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The field keys this rule writes to: one per field, or the single
    /// unscoped key.
    pub(crate) fn field_keys(&self) -> Vec<Option<&str>> {
        if self.fields.is_empty() {
            vec![None]
        } else {
            self.fields.iter().map(|f| Some(f.as_str())).collect()
        }
    }
}
