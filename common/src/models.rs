use serde::{Deserialize, Serialize};

/// What a renderer is allowed to know about a single cell.
///
/// `Mine` only ever appears once the game is lost and the board is
/// disclosed; an unrevealed mine looks like any other hidden cell.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum CellView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "questioned")]
    Questioned,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

/// Board coordinate, 0-indexed: `x` is the column, `y` is the row.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Immutable per-game configuration. Reconfiguring a running game means
/// constructing a new session from a new value, never mutating this one.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    /// Enables the three-state flag cycle (flag, question mark, none).
    pub marks: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::Beginner.config()
    }
}

impl GameConfig {
    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }
}

/// Standard difficulty presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub fn config(self) -> GameConfig {
        let (width, height, mines) = match self {
            Difficulty::Beginner => (9, 9, 10),
            Difficulty::Intermediate => (16, 16, 40),
            Difficulty::Expert => (30, 16, 99),
        };
        GameConfig {
            width,
            height,
            mines,
            marks: false,
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(value: Difficulty) -> Self {
        value.config()
    }
}

/// Handle describing the active session, returned by `new_game` and `reset`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}
