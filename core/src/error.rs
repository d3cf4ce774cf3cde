use thiserror::Error;

use crate::{MAX_SIZE, MIN_SIZE};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid size must be between {} and {}", MIN_SIZE, MAX_SIZE)]
    InvalidSize,
    #[error("Too many mines to keep the first move safe")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, GameError>;
