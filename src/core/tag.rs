//! Queue tags: the identity keys that select a [`TaskQueue`](super::TaskQueue).

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::QueueError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TagRepr {
    /// The implicit queue of an engine instance.
    Default,
    Name(Arc<str>),
    Token(Uuid),
}

/// Identity key of a task queue.
///
/// Named tags compare by value. Tokens created with [`QueueTag::token`] are
/// unique to the process and only equal to their own clones, so two
/// independently created tokens never share a queue.
///
/// ```
/// use prometheus_tag_queue::QueueTag;
///
/// assert_eq!(QueueTag::from("db"), QueueTag::name("db"));
///
/// let token = QueueTag::token();
/// assert_eq!(token, token.clone());
/// assert_ne!(token, QueueTag::token());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueTag(TagRepr);

impl QueueTag {
    /// Create a tag compared by its string value.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Self(TagRepr::Name(name.into()))
    }

    /// Create a new opaque tag, distinct from every other tag in the process.
    #[must_use]
    pub fn token() -> Self {
        Self(TagRepr::Token(Uuid::new_v4()))
    }

    /// Tag of the queue used when a call does not name one.
    pub(crate) const fn default_tag() -> Self {
        Self(TagRepr::Default)
    }

    /// Whether this is an engine's implicit default tag.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self.0, TagRepr::Default)
    }

    /// The string value of a named tag.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.0 {
            TagRepr::Name(name) => Some(&**name),
            _ => None,
        }
    }

    /// Reject names that cannot identify a queue.
    pub(crate) fn validate(&self) -> Result<(), QueueError> {
        match &self.0 {
            TagRepr::Name(name) if name.trim().is_empty() => Err(QueueError::InvalidTag(
                "queue tag can not be an empty string".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for QueueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            TagRepr::Default => f.write_str("<default>"),
            TagRepr::Name(name) => f.write_str(name),
            TagRepr::Token(id) => write!(f, "token:{id}"),
        }
    }
}

impl From<&str> for QueueTag {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for QueueTag {
    fn from(name: String) -> Self {
        Self::name(name)
    }
}
