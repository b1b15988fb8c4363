//! Subject identity: how a rule or a query names the thing it is about.
//!
//! Rules are keyed by a `SubjectKey`. Queries pass a `SubjectRef`, which is
//! resolved to a key once at the call boundary:
//!
//! - `Named("Doc")`       → `"Doc"` (literal tag, no instance)
//! - `TypeOf(Team::NAME)` → `"Team"` (a type, no instance)
//! - `Instance { .. }`    → the instance's tag or its type's name
//!
//! Only `Instance` carries data a condition can be tested against.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key used for plain JSON data that was never tagged.
pub const FALLBACK_SUBJECT_KEY: &str = "Object";

/// The lookup key of a subject type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectKey(pub String);

impl SubjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key of a `Subject` type.
    pub fn of<S: Subject>() -> Self {
        Self(S::NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubjectKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SubjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Rust type that rules can be written against.
pub trait Subject: Any {
    /// Key of the type itself.
    const NAME: &'static str;

    /// Key of one instance. Types whose instances fall into several subject
    /// kinds override this.
    fn subject_name(&self) -> &str {
        Self::NAME
    }
}

/// Plain JSON data stamped with an explicit subject tag.
///
/// Without the tag, structurally similar objects would all resolve to
/// `FALLBACK_SUBJECT_KEY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedObject {
    pub tag: String,
    pub data: Value,
}

/// Stamp `data` with `tag` so that queries treat it like an instance of the
/// named subject type.
pub fn obj_to_subject(data: Value, tag: impl Into<String>) -> TaggedObject {
    TaggedObject {
        tag: tag.into(),
        data,
    }
}

/// What a `can` query is asked about.
#[derive(Debug, Clone, Copy)]
pub enum SubjectRef<'a> {
    /// A literal subject tag.
    Named(&'a str),
    /// A subject type, by its `Subject::NAME`.
    TypeOf(&'static str),
    /// A concrete value. `value` is what conditions are tested against.
    Instance { key: &'a str, value: &'a dyn Any },
}

impl<'a> SubjectRef<'a> {
    pub fn named(tag: &'a str) -> Self {
        SubjectRef::Named(tag)
    }

    pub fn type_of<S: Subject>() -> Self {
        SubjectRef::TypeOf(S::NAME)
    }

    pub fn instance<S: Subject>(value: &'a S) -> Self {
        SubjectRef::Instance {
            key: value.subject_name(),
            value,
        }
    }

    /// A tagged JSON object. Conditions see the inner `serde_json::Value`.
    pub fn tagged(object: &'a TaggedObject) -> Self {
        SubjectRef::Instance {
            key: &object.tag,
            value: &object.data,
        }
    }

    /// Untagged JSON data; resolves to `FALLBACK_SUBJECT_KEY`.
    pub fn untagged(data: &'a Value) -> Self {
        SubjectRef::Instance {
            key: FALLBACK_SUBJECT_KEY,
            value: data,
        }
    }

    /// The lookup key without allocating.
    pub fn key(&self) -> &str {
        match self {
            SubjectRef::Named(tag) => tag,
            SubjectRef::TypeOf(name) => name,
            SubjectRef::Instance { key, .. } => key,
        }
    }

    /// The instance data, if this reference carries any.
    pub fn instance_value(&self) -> Option<&'a dyn Any> {
        match self {
            SubjectRef::Instance { value, .. } => Some(*value),
            SubjectRef::Named(_) | SubjectRef::TypeOf(_) => None,
        }
    }
}

/// Resolve a subject reference to its rule lookup key.
pub fn subject_key(subject: &SubjectRef<'_>) -> SubjectKey {
    SubjectKey::new(subject.key())
}
