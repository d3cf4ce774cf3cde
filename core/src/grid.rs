use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Progress made by one clearing action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub cleared: CellCount,
    pub triggered: bool,
}

/// Square matrix of cells, indexed by `(row, column)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// A grid of hidden cells without any mines.
    pub fn new(size: Coord) -> Self {
        let size = usize::from(size);
        Self {
            cells: Array2::default((size, size)),
        }
    }

    /// A grid with mines at exactly `mine_coords`, counts not yet computed.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size);

        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid[coords].has_mine = true;
        }

        Ok(grid)
    }

    pub fn size(&self) -> Coord {
        Coord::try_from(self.cells.nrows()).unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let size = self.size();
        (0..size).flat_map(move |x| (0..size).map(move |y| (x, y)))
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.has_mine)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(|cell| cell.hidden && cell.is_flagged())
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|&cell| predicate(cell)).count();
        CellCount::try_from(count).unwrap_or(CellCount::MAX)
    }

    /// Places up to `count` mines by rejection sampling, skipping mined cells and any cell for
    /// which `exclude` holds. Returns how many were placed.
    pub fn seed_mines(
        &mut self,
        count: CellCount,
        rng: &mut SmallRng,
        exclude: impl Fn(Coord2) -> bool,
    ) -> CellCount {
        use rand::prelude::*;

        let eligible = self
            .coords()
            .filter(|&pos| !self[pos].has_mine && !exclude(pos))
            .count();
        let eligible = CellCount::try_from(eligible).unwrap_or(CellCount::MAX);
        let count = if count > eligible {
            log::warn!(
                "Grid too full, requested {} mines but only {} cells are eligible",
                count,
                eligible
            );
            eligible
        } else {
            count
        };

        let size = self.size();
        let mut placed = 0;
        while placed < count {
            let pos = (rng.random_range(0..size), rng.random_range(0..size));
            if self[pos].has_mine || exclude(pos) {
                continue;
            }
            self[pos].has_mine = true;
            placed += 1;
        }
        placed
    }

    /// Moves every mine in the 3×3 block around `center` to a random cell outside of it.
    ///
    /// The total number of mines is unchanged. Returns how many mines were moved.
    pub fn displace_mines_from(&mut self, center: Coord2, rng: &mut SmallRng) -> CellCount {
        let mut moved = 0;

        for pos in self.cells.iter_block(center) {
            if !self[pos].has_mine {
                continue;
            }
            if self.seed_mines(1, rng, |candidate| in_block(center, candidate)) == 0 {
                // nowhere to put it, leave the mine where it is
                continue;
            }
            self[pos].has_mine = false;
            moved += 1;
        }

        moved
    }

    /// Fresh count of mines around `coords`, the cell itself not included.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .cells
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].has_mine)
            .count();
        // at most 8 neighbors
        count as u8
    }

    pub fn compute_adjacent_counts(&mut self) {
        for pos in self.coords() {
            if !self[pos].has_mine {
                self[pos].adjacent = self.adjacent_mine_count(pos);
            }
        }
    }

    /// Clears a hidden, unmarked cell and flood-fills from it when it has no adjacent mines.
    ///
    /// Cells that are already cleared or carry a mark are left alone and report no progress.
    pub fn clear_cell(&mut self, coords: Coord2) -> ClearOutcome {
        let mut pending = Vec::from([coords]);
        self.drain_clears(&mut pending)
    }

    /// Runs [`clear_cell`](Self::clear_cell) over the whole 3×3 block around `coords`.
    pub fn flood_clear_neighbors(&mut self, coords: Coord2) -> ClearOutcome {
        let mut pending: Vec<_> = self.cells.iter_block(coords).collect();
        self.drain_clears(&mut pending)
    }

    fn drain_clears(&mut self, pending: &mut Vec<Coord2>) -> ClearOutcome {
        let mut outcome = ClearOutcome::default();

        while let Some(coords) = pending.pop() {
            let cell = &mut self[coords];
            if !cell.is_clearable() {
                continue;
            }

            cell.hidden = false;
            outcome.cleared += 1;

            if cell.has_mine {
                cell.detonated = true;
                outcome.triggered = true;
            } else if cell.adjacent == 0 {
                pending.extend(
                    self.cells
                        .iter_block(coords)
                        .filter(|&pos| self[pos].is_clearable()),
                );
            }
        }

        outcome
    }

    /// Applies the mark transition requested by the player to a hidden cell.
    pub fn cycle_mark(&mut self, coords: Coord2, requested: Mark) -> MarkOutcome {
        let cell = &mut self[coords];
        if !cell.hidden {
            return MarkOutcome::NoChange;
        }

        let next = requested.cycle(cell.mark);
        if next == cell.mark {
            return MarkOutcome::NoChange;
        }
        cell.mark = next;
        MarkOutcome::Changed
    }

    /// Flagged hidden cells in the 3×3 block around `coords`.
    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        let count = self
            .cells
            .iter_block(coords)
            .filter(|&pos| {
                let cell = self[pos];
                cell.hidden && cell.is_flagged()
            })
            .count();
        count as u8
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
