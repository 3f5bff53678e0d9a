use serde::{Deserialize, Serialize};

use crate::models::{CellView, GameStatus, Pos};

/// A single cell whose visible state changed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: Pos,
    pub value: CellView,
}

/// Outcome of one reveal action: every cell that changed, the resulting
/// status, and (on a loss only) the positions of all disclosed mines.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RevealResult {
    pub updates: Vec<CellUpdate>,
    pub status: GameStatus,
    pub exposed_mines: Vec<Pos>,
    pub flags_remaining: usize,
}

impl RevealResult {
    pub fn is_no_op(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Outcome of one flag toggle. `update` is `None` when the toggle was a
/// defined no-op (revealed cell, exhausted flags, finished game).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FlagResult {
    pub update: Option<CellUpdate>,
    pub status: GameStatus,
    pub flags_remaining: usize,
}

impl FlagResult {
    pub fn is_no_op(&self) -> bool {
        self.update.is_none()
    }
}

/// Messages broadcast to subscribed observers of a game session.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "init")]
    Init {
        id: String,
        width: usize,
        height: usize,
        mines: usize,
        board: Vec<Vec<CellView>>,
    },
    #[serde(rename = "update")]
    Update {
        updates: Vec<CellUpdate>,
        status: GameStatus,
        flags_remaining: usize,
    },
}
