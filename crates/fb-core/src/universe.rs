use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::expr::BoolExpr;
use crate::factor::{Factor, FactorId};
use crate::schedule::Schedule;
use crate::snapshot::Snapshot;
use crate::state::State;
use crate::transition::{Transition, TransitionId};
use crate::value::Value;

/// The compiled story model: every factor and every transition.
///
/// A universe is built once and is read-only afterwards. Sessions share it
/// through an `Arc`, so any number of [`State`]s can play the same universe.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    factors: Vec<Factor>,
    transitions: Vec<Transition>,

    // Index
    by_label: HashMap<String, FactorId>,
}

impl Universe {
    /// Create an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Declare a factor. The first value becomes the initial value.
    ///
    /// Repeated values are kept once, at their first position.
    pub fn add_factor<I, V>(&mut self, label: impl Into<String>, values: I) -> CoreResult<FactorId>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let label = label.into();
        if self.by_label.contains_key(&label) {
            return Err(CoreError::DuplicateFactor(label));
        }

        let mut possible: Vec<Value> = Vec::new();
        for value in values {
            let value = value.into();
            if !possible.contains(&value) {
                possible.push(value);
            }
        }
        let initial = possible
            .first()
            .cloned()
            .ok_or_else(|| CoreError::EmptyFactor(label.clone()))?;

        let id = FactorId(self.factors.len());
        self.by_label.insert(label.clone(), id);
        self.factors.push(Factor {
            id,
            label,
            initial,
            possible,
        });
        Ok(id)
    }

    /// Declare a transition.
    ///
    /// Every factor named by the condition or the effects must belong to this
    /// universe. Later effects for the same factor override earlier ones.
    pub fn add_transition(
        &mut self,
        label: impl Into<String>,
        condition: BoolExpr,
        schedule: Schedule,
        description: impl Into<String>,
        effects: impl IntoIterator<Item = (FactorId, Value)>,
    ) -> CoreResult<TransitionId> {
        let effects: BTreeMap<FactorId, Value> = effects.into_iter().collect();

        let mut unknown = None;
        condition.for_each_test(&mut |factor, _| {
            if unknown.is_none() && self.factor(factor).is_none() {
                unknown = Some(factor);
            }
        });
        if let Some(factor) = unknown.or_else(|| {
            effects
                .keys()
                .copied()
                .find(|f| self.factor(*f).is_none())
        }) {
            return Err(CoreError::UnknownFactor(factor));
        }

        let id = TransitionId(self.transitions.len());
        self.transitions.push(Transition {
            id,
            label: label.into(),
            condition,
            schedule,
            description: description.into(),
            effects,
        });
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Find a factor by label (case-sensitive).
    pub fn find_factor(&self, label: &str) -> Option<&Factor> {
        self.by_label.get(label).map(|id| &self.factors[id.0])
    }

    /// Get a factor by ID.
    pub fn factor(&self, id: FactorId) -> Option<&Factor> {
        self.factors.get(id.0)
    }

    /// All factors in declaration order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Get a transition by ID.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.0)
    }

    /// All transitions in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Find the first transition with the given label.
    pub fn find_transition(&self, label: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.label == label)
    }

    /// Number of factors.
    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Snapshot with every factor at its initial value.
    pub fn initial_snapshot(&self) -> Snapshot {
        Snapshot::new(self.factors.iter().map(|f| f.initial.clone()).collect())
    }

    /// Start a session positioned at the initial moment.
    pub fn instantiate(self: &Arc<Self>) -> State {
        State::new(Arc::clone(self))
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Universe[")?;
        for (i, factor) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{factor}")?;
        }
        write!(f, "]")
    }
}
