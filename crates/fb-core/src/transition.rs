use std::collections::BTreeMap;
use std::fmt;

use crate::expr::BoolExpr;
use crate::factor::FactorId;
use crate::schedule::Schedule;
use crate::snapshot::Snapshot;
use crate::value::Value;

/// Dense index of a transition within its universe (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub(crate) usize);

impl TransitionId {
    /// Position of the transition in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A conditional state change.
///
/// Each transition has:
/// - a label, for the author's use (may be empty)
/// - a condition, deciding in which states it can occur
/// - a schedule, deciding when it occurs once it can
/// - a description, shown to the player when it happens
/// - effects, the factors it changes and their new values
///
/// Effects are owned by the transition and never change after construction.
#[derive(Debug, Clone)]
pub struct Transition {
    pub(crate) id: TransitionId,
    pub(crate) label: String,
    pub(crate) condition: BoolExpr,
    pub(crate) schedule: Schedule,
    pub(crate) description: String,
    pub(crate) effects: BTreeMap<FactorId, Value>,
}

impl Transition {
    /// The transition's ID within its universe.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Author-facing label; empty for anonymous transitions.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Eligibility condition.
    pub fn condition(&self) -> &BoolExpr {
        &self.condition
    }

    /// Trigger schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Narrative text shown when the transition happens.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Menu text, for transitions the player chooses.
    pub fn choice_description(&self) -> Option<&str> {
        self.schedule.choice_description()
    }

    /// Factors this transition changes and their new values.
    pub fn effects(&self) -> &BTreeMap<FactorId, Value> {
        &self.effects
    }

    /// Whether the condition holds in `snapshot`.
    pub fn is_possible(&self, snapshot: &Snapshot) -> bool {
        self.condition.evaluate(snapshot)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}...}}", self.label)
    }
}
