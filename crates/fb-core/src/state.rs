//! Live sessions over a universe.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{SessionConfig, SpontaneousOrder};
use crate::error::{CoreError, CoreResult};
use crate::factor::FactorId;
use crate::history::{History, Moment, MomentId};
use crate::snapshot::Snapshot;
use crate::transition::{Transition, TransitionId};
use crate::universe::Universe;
use crate::value::Value;

/// A live session: a shared universe plus a cursor into its history.
///
/// `apply` is the only operation that creates moments. The scheduling
/// helpers (`possible_transitions`, `chosen_transitions`, `run_spontaneous`)
/// only decide which transitions get fed into it. Cloning a state forks an
/// independent timeline over the same universe.
#[derive(Debug, Clone)]
pub struct State {
    universe: Arc<Universe>,
    history: History,
    now: MomentId,
    config: SessionConfig,
}

impl State {
    /// Start a session at the universe's initial moment.
    pub fn new(universe: Arc<Universe>) -> Self {
        Self::with_config(universe, SessionConfig::default())
    }

    /// Start a session with an explicit configuration.
    pub fn with_config(universe: Arc<Universe>, config: SessionConfig) -> Self {
        let history = History::new(universe.initial_snapshot());
        let now = history.root();
        Self {
            universe,
            history,
            now,
            config,
        }
    }

    /// The universe being played.
    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The session's moment arena.
    pub fn history(&self) -> &History {
        &self.history
    }

    // -----------------------------------------------------------------------
    // Current position
    // -----------------------------------------------------------------------

    /// The current moment's ID.
    pub fn now(&self) -> MomentId {
        self.now
    }

    /// The current moment.
    pub fn current(&self) -> &Moment {
        // `now` only ever moves to moments created by `apply` or checked by
        // `goto`, and truncation only removes moments after it.
        match self.history.get(self.now) {
            Some(moment) => moment,
            None => unreachable!("current moment {} is not live", self.now),
        }
    }

    /// Look up any live moment of this session.
    pub fn moment(&self, id: MomentId) -> Option<&Moment> {
        self.history.get(id)
    }

    /// Factor values at the current moment.
    pub fn values(&self) -> &Snapshot {
        self.current().values()
    }

    /// Current value of a factor.
    pub fn get(&self, factor: FactorId) -> Option<&Value> {
        self.values().get(factor)
    }

    /// Current value of the factor with the given label.
    pub fn get_by_label(&self, label: &str) -> Option<&Value> {
        let factor = self.universe.find_factor(label)?;
        self.get(factor.id())
    }

    /// Whether a factor currently holds one of its declared values.
    pub fn is_valid(&self, factor: FactorId) -> bool {
        match (self.universe.factor(factor), self.get(factor)) {
            (Some(f), Some(v)) => f.is_possible(v),
            _ => false,
        }
    }

    /// Factors whose current value is outside their declared set.
    pub fn invalid_factors(&self) -> Vec<FactorId> {
        self.universe
            .factors()
            .iter()
            .map(|f| f.id())
            .filter(|id| !self.is_valid(*id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Transitions whose condition holds now, in declaration order.
    pub fn possible_transitions(&self) -> Vec<&Transition> {
        let values = self.values();
        self.universe
            .transitions()
            .iter()
            .filter(|t| t.is_possible(values))
            .collect()
    }

    /// Possible transitions the player may choose, in declaration order.
    pub fn chosen_transitions(&self) -> Vec<&Transition> {
        self.possible_transitions()
            .into_iter()
            .filter(|t| t.schedule().is_offered())
            .collect()
    }

    /// Run one spontaneous pass and return the transitions that fired.
    ///
    /// Candidates are the transitions possible when the pass starts, in the
    /// configured [`SpontaneousOrder`]. Each spontaneous candidate draws from
    /// `rng`; if it fires and its condition still holds against the current
    /// moment, it is applied immediately, so later candidates see its effects.
    pub fn run_spontaneous<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<TransitionId> {
        let universe = Arc::clone(&self.universe);
        let mut candidates: Vec<&Transition> = universe
            .transitions()
            .iter()
            .filter(|t| t.is_possible(self.values()))
            .collect();
        if self.config.spontaneous_order == SpontaneousOrder::Shuffled {
            candidates.shuffle(rng);
        }

        let mut fired = Vec::new();
        for transition in candidates {
            if transition.schedule().fires(rng) && transition.is_possible(self.values()) {
                tracing::debug!(
                    transition = transition.label(),
                    id = %transition.id(),
                    "spontaneous transition fired"
                );
                self.apply(transition);
                fired.push(transition.id());
            }
        }
        fired
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Apply a transition unconditionally and move to the resulting moment.
    ///
    /// The new moment holds the current values overlaid with the
    /// transition's effects. It replaces the current moment's future; any
    /// previously recorded redo branch is discarded. Checking the condition
    /// is the caller's job.
    pub fn apply(&mut self, transition: &Transition) -> MomentId {
        let values = self.values().with_effects(transition.effects());
        let id = self.history.push_after(self.now, values, transition.id());
        tracing::trace!(from = %self.now, to = %id, transition = transition.label(), "applied");
        self.now = id;
        id
    }

    /// Apply the transition with the given ID.
    pub fn apply_id(&mut self, id: TransitionId) -> CoreResult<MomentId> {
        let universe = Arc::clone(&self.universe);
        let transition = universe
            .transition(id)
            .ok_or(CoreError::UnknownTransition(id))?;
        Ok(self.apply(transition))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to any live moment without changing the timeline.
    pub fn goto(&mut self, moment: MomentId) -> CoreResult<()> {
        if !self.history.contains(moment) {
            return Err(CoreError::UnknownMoment(moment));
        }
        self.now = moment;
        Ok(())
    }

    /// Step back one moment. Returns false at the root.
    pub fn undo(&mut self) -> bool {
        match self.current().past() {
            Some(past) => {
                self.now = past;
                true
            }
            None => false,
        }
    }

    /// Step forward along the recorded future. Returns false at the end.
    pub fn redo(&mut self) -> bool {
        match self.current().future() {
            Some(future) => {
                self.now = future;
                true
            }
            None => false,
        }
    }

    /// Whether [`State::undo`] would move.
    pub fn can_undo(&self) -> bool {
        self.current().past().is_some()
    }

    /// Whether [`State::redo`] would move.
    pub fn can_redo(&self) -> bool {
        self.current().future().is_some()
    }

    /// Causes of the moments after `from` up to now, oldest first.
    ///
    /// Empty if `from` is now or is not an ancestor of the current moment.
    pub fn events_since(&self, from: MomentId) -> Vec<&Transition> {
        let mut causes = Vec::new();
        let mut cursor = self.now;
        while cursor != from {
            let step = self
                .history
                .get(cursor)
                .and_then(|m| m.cause().zip(m.past()));
            match step {
                Some((cause, past)) => {
                    if let Some(t) = self.universe.transition(cause) {
                        causes.push(t);
                    }
                    cursor = past;
                }
                None => return Vec::new(),
            }
        }
        causes.reverse();
        causes
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, factor) in self.universe.factors().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let note = if self.is_valid(factor.id()) {
                ""
            } else {
                "<INVALID>"
            };
            let value = self.get(factor.id()).map(Value::as_str).unwrap_or_default();
            write!(f, "{}:{note}{value}", factor.label())?;
        }
        write!(f, "]")
    }
}
