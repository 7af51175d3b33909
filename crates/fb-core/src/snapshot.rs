use std::collections::BTreeMap;

use crate::factor::FactorId;
use crate::value::Value;

/// A total mapping from every factor of a universe to its current value.
///
/// Indexed by [`FactorId`]; a snapshot always holds exactly one value per
/// factor of the universe it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    values: Vec<Value>,
}

impl Snapshot {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// The value of a factor, or `None` if the factor belongs to another universe.
    pub fn get(&self, factor: FactorId) -> Option<&Value> {
        self.values.get(factor.0)
    }

    /// Number of factors in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the universe has no factors.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(factor, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorId, &Value)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (FactorId(i), v))
    }

    /// A copy of this snapshot with `effects` overlaid.
    ///
    /// Effects naming factors outside the snapshot are ignored.
    pub fn with_effects(&self, effects: &BTreeMap<FactorId, Value>) -> Self {
        let mut values = self.values.clone();
        for (factor, value) in effects {
            if let Some(slot) = values.get_mut(factor.0) {
                *slot = value.clone();
            }
        }
        Self { values }
    }
}
