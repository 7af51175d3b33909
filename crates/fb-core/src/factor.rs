use std::fmt;

use crate::value::Value;

/// Dense index of a factor within its universe (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactorId(pub(crate) usize);

impl FactorId {
    /// Position of the factor in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named discrete state variable with a fixed set of possible values.
///
/// The initial value is always one of the possible values; factors built
/// through [`Universe::add_factor`](crate::Universe::add_factor) take the
/// first declared value.
#[derive(Debug, Clone)]
pub struct Factor {
    pub(crate) id: FactorId,
    pub(crate) label: String,
    pub(crate) initial: Value,
    pub(crate) possible: Vec<Value>,
}

impl Factor {
    /// The factor's ID within its universe.
    pub fn id(&self) -> FactorId {
        self.id
    }

    /// The factor's unique label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The value every new session starts with.
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Possible values, in declaration order, without duplicates.
    pub fn possible(&self) -> &[Value] {
        &self.possible
    }

    /// Whether `value` is one of this factor's declared values.
    pub fn is_possible(&self, value: &Value) -> bool {
        self.possible.contains(value)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} [", self.label)?;
        for (i, v) in self.possible.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "] {}}}", self.initial)
    }
}
