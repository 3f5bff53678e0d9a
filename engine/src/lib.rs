//! Minesweeper board simulation engine.
//!
//! The engine owns the board model and the full reveal/flag state machine:
//! deferred mine placement (the first revealed cell is never a mine),
//! neighbor-mine counting, the cascading flood-fill reveal, win and loss
//! detection, and the flag budget. A UI layer drives it through
//! [`GameController`] and renders from the returned change-sets or from
//! broadcast [`minefield_common::protocol::SessionEvent`]s; nothing in here
//! knows about widgets, timers or colors.

pub mod controller;
pub mod data;
pub mod error;
pub mod logic;

pub use controller::GameController;
pub use error::EngineError;
pub use logic::Session;
