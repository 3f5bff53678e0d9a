//! Renderable projection of a minefield game session.
//!
//! The engine reports every state change twice: as a return value and as a
//! broadcast [`minefield_common::protocol::SessionEvent`]. This crate is the
//! consumer side of the event stream: a [`ViewModel`] drains the events, keeps
//! a [`BoardView`] up to date and translates what happened into coarse
//! [`GameEvent`]s a UI can react to (repaint these cells, show the win
//! dialog). It never touches the engine directly, so it can sit behind any
//! boundary the host puts between the two.
//!
//! ```rust,no_run
//! use minefield_common::models::{GameConfig, Pos};
//! use minefield_engine::GameController;
//! use minefield_view::ViewModel;
//!
//! fn main() -> Result<(), minefield_engine::EngineError> {
//!     let mut controller = GameController::new(GameConfig::default())?;
//!     let (_id, receiver) = controller.subscribe();
//!     let mut view = ViewModel::new(receiver);
//!
//!     controller.reveal(Pos { x: 4, y: 4 })?;
//!     for event in view.pump() {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

mod board;
mod model;

pub use board::BoardView;
pub use model::{GameEvent, ViewModel};

// Re-export common types for convenience
pub use minefield_common::{models::*, protocol::*};
