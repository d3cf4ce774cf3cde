use serde::{Deserialize, Serialize};

use crate::*;

/// What the player gets to see of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Cleared(u8),
    Hidden,
    Flagged,
    Uncertain,
    Mine,
    Detonated,
    Misflagged,
}

impl CellView {
    /// `reveal_all` exposes mines and wrong flags, used once the game is over.
    pub const fn of(cell: Cell, reveal_all: bool) -> Self {
        if cell.detonated {
            return Self::Detonated;
        }
        if !cell.hidden {
            return Self::Cleared(cell.adjacent);
        }

        if reveal_all {
            match (cell.has_mine, cell.mark) {
                (true, Some(Mark::Flag)) => Self::Flagged,
                (true, _) => Self::Mine,
                (false, Some(Mark::Flag)) => Self::Misflagged,
                (false, _) => Self::Hidden,
            }
        } else {
            match cell.mark {
                Some(Mark::Flag) => Self::Flagged,
                Some(Mark::Uncertain) => Self::Uncertain,
                None => Self::Hidden,
            }
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Cleared(0) => ' ',
            Self::Cleared(count) => (b'0' + count) as char,
            Self::Hidden => '.',
            Self::Flagged => '#',
            Self::Uncertain => '?',
            Self::Mine => '*',
            Self::Detonated => 'X',
            Self::Misflagged => 'x',
        }
    }
}
