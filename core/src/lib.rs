#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use grid::*;
pub use session::*;
pub use types::*;
pub use view::*;

mod cell;
mod error;
mod grid;
mod session;
mod types;
mod view;

pub const MIN_SIZE: Coord = 4;
pub const MAX_SIZE: Coord = 24;
pub const DEFAULT_MINE_RATIO: f64 = 0.2;

/// Cells that must stay free of mines around the first move.
const SAFE_BLOCK_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mine_ratio: f64,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mine_ratio: f64) -> Self {
        Self { size, mine_ratio }
    }

    /// Validates the grid size and clamps the ratio into `0.0..=1.0`.
    ///
    /// Fails when the resulting mine count would not leave the 3×3 block of the first move free.
    pub fn new(size: Coord, mine_ratio: f64) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GameError::InvalidSize);
        }

        let mine_ratio = if mine_ratio.is_nan() {
            log::warn!("Mine ratio is not a number, using {}", DEFAULT_MINE_RATIO);
            DEFAULT_MINE_RATIO
        } else if !(0.0..=1.0).contains(&mine_ratio) {
            log::warn!("Mine ratio {} out of range, clamped", mine_ratio);
            mine_ratio.clamp(0.0, 1.0)
        } else {
            mine_ratio
        };

        let config = Self::new_unchecked(size, mine_ratio);
        if config.mines() > config.total_cells() - SAFE_BLOCK_CELLS {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub fn with_size(size: Coord) -> Result<Self> {
        Self::new(size, DEFAULT_MINE_RATIO)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    /// `floor(size² · mine_ratio)`.
    pub fn mines(&self) -> CellCount {
        (f64::from(self.total_cells()) * self.mine_ratio) as CellCount
    }

    pub fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
