//! Trigger schedules for transitions.

use rand::Rng;
use serde::Serialize;

/// When an eligible transition happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Fires on its own with the given probability each spontaneous pass.
    /// Never offered to the player.
    Spontaneous {
        /// Chance of firing per pass. Values at or above 1 always fire,
        /// values at or below 0 never do.
        probability_per_turn: f64,
    },
    /// Offered to the player as a menu option. Never fires on its own.
    Chosen {
        /// Menu text shown to the player.
        choice_description: String,
    },
}

impl Schedule {
    /// A spontaneous schedule with probability `p` per pass.
    pub fn spontaneous(p: f64) -> Self {
        Self::Spontaneous {
            probability_per_turn: p,
        }
    }

    /// A player-chosen schedule with the given menu text.
    pub fn chosen(choice_description: impl Into<String>) -> Self {
        Self::Chosen {
            choice_description: choice_description.into(),
        }
    }

    /// Draw from `rng` and decide whether the transition fires this pass.
    ///
    /// Spontaneous schedules always consume one draw; chosen schedules never do.
    pub fn fires<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self {
            Schedule::Spontaneous {
                probability_per_turn,
            } => {
                let draw: f64 = rng.random();
                *probability_per_turn > 0.0 && draw <= *probability_per_turn
            }
            Schedule::Chosen { .. } => false,
        }
    }

    /// Whether the transition is offered to the player.
    pub fn is_offered(&self) -> bool {
        matches!(self, Schedule::Chosen { .. })
    }

    /// Menu text for chosen schedules.
    pub fn choice_description(&self) -> Option<&str> {
        match self {
            Schedule::Chosen { choice_description } => Some(choice_description),
            Schedule::Spontaneous { .. } => None,
        }
    }

    /// Probability per pass for spontaneous schedules.
    pub fn probability(&self) -> Option<f64> {
        match self {
            Schedule::Spontaneous {
                probability_per_turn,
            } => Some(*probability_per_turn),
            Schedule::Chosen { .. } => None,
        }
    }
}
