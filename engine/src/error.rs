use minefield_common::models::Pos;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid game configuration: {width}x{height} with {mines} mines")]
    InvalidConfiguration {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[error("position {pos:?} is outside the {width}x{height} board")]
    OutOfBounds {
        pos: Pos,
        width: usize,
        height: usize,
    },
}
