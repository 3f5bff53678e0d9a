use nanoid::nanoid;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use minefield_common::{
    models::{CellView, GameConfig, GameStatus, Pos, SessionInfo},
    protocol::{CellUpdate, FlagResult, RevealResult},
};

use crate::data::{Cell, CellState, Field};


/// Decides mine placement for every cell except the excluded one.
///
/// Walks the board once, mining each candidate with probability
/// `mines_left / cells_left`, which yields an unbiased sample without
/// replacement of exactly `field.mines` cells.
fn scatter_mines(field: &mut Field, excluded: Pos, rng: &mut impl Rng) {
    let excluded_index = field.index(&excluded);
    let mut mines_left = field.mines;
    let mut cells_left = field.width * field.height - 1;

    for index in 0..field.cells.len() {
        if index == excluded_index {
            continue;
        }
        if mines_left > 0 && rng.random_ratio(mines_left as u32, cells_left as u32) {
            field.cells[index].mine = true;
            mines_left -= 1;
        }
        cells_left -= 1;
    }
}

/// The up-to-8 grid neighbors of `pos`, clipped to the board bounds.
fn neighbors(width: usize, height: usize, pos: Pos) -> impl Iterator<Item = Pos> {
    (-1i32..=1).flat_map(move |dy| {
        (-1i32..=1).filter_map(move |dx| {
            if dx == 0 && dy == 0 {
                return None;
            }

            let x = pos.x as i32 + dx;
            let y = pos.y as i32 + dy;

            if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                Some(Pos {
                    x: x as usize,
                    y: y as usize,
                })
            } else {
                None
            }
        })
    })
}

fn compute_adjacent_counts(field: &mut Field) {
    for y in 0..field.height {
        for x in 0..field.width {
            let pos = Pos { x, y };
            let index = field.index(&pos);
            if field.cells[index].mine {
                continue;
            }

            let count = neighbors(field.width, field.height, pos)
                .filter(|neighbor| field.cells[field.index(neighbor)].mine)
                .count();
            field.cells[index].adjacent = count as u8;
        }
    }
}

impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        match value.state {
            CellState::Hidden => Self::Hidden,
            CellState::Flagged => Self::Flagged,
            CellState::Questioned => Self::Questioned,
            CellState::Revealed if value.mine => Self::Mine,
            CellState::Revealed => Self::Revealed {
                adjacent: value.adjacent,
            },
        }
    }
}

impl Field {
    fn new(config: &GameConfig) -> Self {
        let mines = config.mines.min(config.total_cells().saturating_sub(1));
        Self {
            width: config.width,
            height: config.height,
            mines,
            revealed: 0,
            flags_remaining: mines,
            armed: false,
            marks: config.marks,
            status: GameStatus::InProgress,
            cells: vec![
                Cell {
                    mine: false,
                    adjacent: 0,
                    state: CellState::Hidden,
                };
                config.width * config.height
            ],
        }
    }

    fn index(&self, pos: &Pos) -> usize {
        pos.x + pos.y * self.width
    }

    fn validate_pos(&self, pos: &Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// First-reveal arming: the clicked cell never receives a mine.
    fn arm(&mut self, excluded: Pos) {
        scatter_mines(self, excluded, &mut rand::rng());
        compute_adjacent_counts(self);
        self.armed = true;
    }

    fn has_won(&self) -> bool {
        self.width * self.height == self.mines + self.revealed
    }

    fn expose_mines(&mut self, updates: &mut Vec<CellUpdate>, exposed: &mut Vec<Pos>) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { x, y };
                let index = self.index(&pos);

                if self.cells[index].mine {
                    self.cells[index].state = CellState::Revealed;
                    updates.push(CellUpdate {
                        pos,
                        value: (&self.cells[index]).into(),
                    });
                    exposed.push(pos);
                }
            }
        }
    }

    fn flood_reveal(&mut self, start: Pos, updates: &mut Vec<CellUpdate>) {
        let mut pending = vec![start];

        while let Some(pos) = pending.pop() {
            let index = self.index(&pos);
            let state = self.cells[index].state;
            if state == CellState::Revealed || state == CellState::Flagged {
                continue;
            }

            self.cells[index].state = CellState::Revealed;
            self.revealed += 1;
            updates.push(CellUpdate {
                pos,
                value: (&self.cells[index]).into(),
            });

            if self.cells[index].adjacent != 0 {
                continue;
            }

            for neighbor in neighbors(self.width, self.height, pos) {
                let cell = &self.cells[self.index(&neighbor)];
                if cell.state != CellState::Revealed
                    && cell.state != CellState::Flagged
                    && !cell.mine
                {
                    pending.push(neighbor);
                }
            }
        }
    }

    fn flag_remaining_mines(&mut self, updates: &mut Vec<CellUpdate>) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { x, y };
                let index = self.index(&pos);

                if self.cells[index].mine && self.cells[index].state != CellState::Flagged {
                    self.cells[index].state = CellState::Flagged;
                    updates.push(CellUpdate {
                        pos,
                        value: (&self.cells[index]).into(),
                    });
                }
            }
        }
        self.flags_remaining = 0;
    }
}

/// One playthrough, from first reveal to terminal outcome.
///
/// The session exclusively owns its field. Once the status is `Won` or
/// `Lost` every further action is a no-op; a new game means a new session.
pub struct Session {
    id: String,
    config: GameConfig,
    field: Field,
}

impl Session {
    #[instrument(level = "trace")]
    pub fn new(config: GameConfig) -> Self {
        info!(
            "Creating session: {}x{} with {} mines",
            config.width, config.height, config.mines
        );
        Self {
            id: nanoid!(8),
            config,
            field: Field::new(&config),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.field.status
    }

    pub fn flags_remaining(&self) -> usize {
        self.field.flags_remaining
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.field.validate_pos(&pos)
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            width: self.field.width,
            height: self.field.height,
            mines: self.field.mines,
        }
    }

    pub fn cell_view(&self, pos: Pos) -> Option<CellView> {
        if !self.field.validate_pos(&pos) {
            return None;
        }
        Some((&self.field.cells[self.field.index(&pos)]).into())
    }

    /// Full board as the renderer may see it, row by row.
    pub fn board_rows(&self) -> Vec<Vec<CellView>> {
        self.field
            .cells
            .iter()
            .map(CellView::from)
            .collect::<Vec<CellView>>()
            .chunks(self.field.width)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> RevealResult {
        if !self.field.validate_pos(&pos) {
            warn!("Invalid reveal position: ({}, {})", pos.x, pos.y);
            return self.unchanged_reveal();
        }

        if self.field.status.is_finished() {
            debug!(
                "Ignoring reveal action on finished game at ({}, {})",
                pos.x, pos.y
            );
            return self.unchanged_reveal();
        }

        let index = self.field.index(&pos);
        match self.field.cells[index].state {
            CellState::Flagged => {
                debug!("Ignoring reveal on flagged cell ({}, {})", pos.x, pos.y);
                return self.unchanged_reveal();
            }
            CellState::Revealed => {
                debug!(
                    "Ignoring reveal on already revealed cell ({}, {})",
                    pos.x, pos.y
                );
                return self.unchanged_reveal();
            }
            CellState::Hidden | CellState::Questioned => {}
        }

        if !self.field.armed {
            info!(
                "First reveal at ({}, {}), arming {} mines",
                pos.x, pos.y, self.field.mines
            );
            self.field.arm(pos);
        }

        if self.field.cells[index].mine {
            warn!("Player hit mine at ({}, {}) - game over!", pos.x, pos.y);
            let mut updates = Vec::new();
            let mut exposed = Vec::new();
            self.field.expose_mines(&mut updates, &mut exposed);
            self.field.status = GameStatus::Lost;
            info!("Game ended with loss, disclosed {} mines", exposed.len());
            return RevealResult {
                updates,
                status: self.field.status,
                exposed_mines: exposed,
                flags_remaining: self.field.flags_remaining,
            };
        }

        let mut updates = Vec::new();
        self.field.flood_reveal(pos, &mut updates);

        if self.field.has_won() {
            self.field.status = GameStatus::Won;
            self.field.flag_remaining_mines(&mut updates);
            info!("Game won! All safe cells revealed.");
        } else {
            debug!("Revealed {} cells, game continues", updates.len());
        }

        RevealResult {
            updates,
            status: self.field.status,
            exposed_mines: Vec::new(),
            flags_remaining: self.field.flags_remaining,
        }
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn toggle_flag(&mut self, pos: Pos) -> FlagResult {
        if !self.field.validate_pos(&pos) {
            warn!("Invalid flag position: ({}, {})", pos.x, pos.y);
            return self.unchanged_flag();
        }

        if self.field.status.is_finished() {
            debug!(
                "Ignoring flag action on finished game at ({}, {})",
                pos.x, pos.y
            );
            return self.unchanged_flag();
        }

        let index = self.field.index(&pos);
        let old_state = self.field.cells[index].state;
        let new_state = match old_state {
            CellState::Revealed => {
                debug!(
                    "Ignoring flag action on revealed cell ({}, {})",
                    pos.x, pos.y
                );
                return self.unchanged_flag();
            }
            CellState::Hidden => {
                if self.field.flags_remaining == 0 {
                    debug!("No flags remaining, ignoring flag at ({}, {})", pos.x, pos.y);
                    return self.unchanged_flag();
                }
                CellState::Flagged
            }
            CellState::Flagged if self.field.marks => CellState::Questioned,
            CellState::Flagged => CellState::Hidden,
            CellState::Questioned => CellState::Hidden,
        };

        self.field.cells[index].state = new_state;
        if new_state == CellState::Flagged {
            self.field.flags_remaining -= 1;
        } else if old_state == CellState::Flagged {
            self.field.flags_remaining += 1;
        }
        debug!("Cell ({}, {}) flag state toggled", pos.x, pos.y);

        // Same win predicate as reveal; a flag toggle never changes the
        // revealed count, so this can only confirm an already-won board.
        if self.field.has_won() {
            self.field.status = GameStatus::Won;
        }

        FlagResult {
            update: Some(CellUpdate {
                pos,
                value: (&self.field.cells[index]).into(),
            }),
            status: self.field.status,
            flags_remaining: self.field.flags_remaining,
        }
    }

    fn unchanged_reveal(&self) -> RevealResult {
        RevealResult {
            updates: Vec::new(),
            status: self.field.status,
            exposed_mines: Vec::new(),
            flags_remaining: self.field.flags_remaining,
        }
    }

    fn unchanged_flag(&self) -> FlagResult {
        FlagResult {
            update: None,
            status: self.field.status,
            flags_remaining: self.field.flags_remaining,
        }
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }
}
