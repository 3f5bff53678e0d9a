use std::collections::HashMap;

use minefield_common::{
    models::{CellView, GameStatus, Pos},
    protocol::CellUpdate,
};

/// Renderable snapshot of one game session.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub status: GameStatus,
    pub flags_remaining: usize,
    board: Vec<Vec<CellView>>,
}

impl BoardView {
    pub fn new(width: usize, height: usize, mines: usize, board: Vec<Vec<CellView>>) -> Self {
        Self {
            width,
            height,
            mines,
            status: GameStatus::InProgress,
            flags_remaining: mines,
            board,
        }
    }

    /// Get the cell at the specified position.
    pub fn cell(&self, pos: Pos) -> Option<&CellView> {
        if pos.x < self.width && pos.y < self.height {
            self.board.get(pos.y)?.get(pos.x)
        } else {
            None
        }
    }

    pub fn rows(&self) -> &[Vec<CellView>] {
        &self.board
    }

    pub(crate) fn apply(&mut self, update: &CellUpdate) {
        if update.pos.x < self.width
            && update.pos.y < self.height
            && let Some(row) = self.board.get_mut(update.pos.y)
            && let Some(cell) = row.get_mut(update.pos.x)
        {
            *cell = update.value;
        }
    }

    /// Count the number of cells in each state.
    pub fn count_cells(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for row in &self.board {
            for cell in row {
                let state = match cell {
                    CellView::Hidden => "hidden",
                    CellView::Flagged => "flagged",
                    CellView::Questioned => "questioned",
                    CellView::Revealed { .. } => "revealed",
                    CellView::Mine => "mine",
                };
                *counts.entry(state).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }
}
