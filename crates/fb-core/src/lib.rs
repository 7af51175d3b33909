//! Core types for Fabula: factors, transitions, and the session history engine.
//!
//! This crate defines the model that story files compile into and the runtime
//! that plays it. It is independent of the parser: a [`Universe`] can be built
//! programmatically and instantiated into a [`State`] directly.

/// Session configuration (seed, spontaneous pass ordering).
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// Boolean conditions over factor values.
pub mod expr;
/// Factors: named discrete state variables.
pub mod factor;
/// The moment arena backing a session's undo/redo timeline.
pub mod history;
/// Trigger schedules for transitions.
pub mod schedule;
/// Total factor-to-value snapshots.
pub mod snapshot;
/// Live sessions: a universe plus a cursor into its history.
pub mod state;
/// Transitions: conditional state changes.
pub mod transition;
/// The compiled, immutable story model.
pub mod universe;
/// Interned factor values.
pub mod value;

/// Re-export configuration types.
pub use config::{SessionConfig, SpontaneousOrder};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export condition types.
pub use expr::BoolExpr;
/// Re-export factor types.
pub use factor::{Factor, FactorId};
/// Re-export history types.
pub use history::{History, Moment, MomentId};
/// Re-export schedule types.
pub use schedule::Schedule;
/// Re-export snapshot types.
pub use snapshot::Snapshot;
/// Re-export session types.
pub use state::State;
/// Re-export transition types.
pub use transition::{Transition, TransitionId};
/// Re-export the universe.
pub use universe::Universe;
/// Re-export value types.
pub use value::Value;
