use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// One admissible state of a factor.
///
/// Values are opaque atoms compared by content. The text is shared, so cloning
/// a value never copies it. Numeric-looking values are still strings: the
/// literal `3` in a story file becomes the value `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Value(Arc<str>);

impl Value {
    /// Create a value from its text.
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// The value's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::from(n.to_string())
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
