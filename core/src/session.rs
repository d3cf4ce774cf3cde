use core::num::Saturating;
use ndarray::Array2;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of a single move: cells cleared by it and the outcome afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub cleared: CellCount,
    pub outcome: Outcome,
}

/// One game, from the first move to a win or a loss.
///
/// Mines are placed when the session is created, but the block around the first move is emptied
/// and the adjacency counts are only computed once that move arrives.
#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    rng: SmallRng,
    cells_to_clear: CellCount,
    cells_cleared: Saturating<CellCount>,
    first_move_pending: bool,
    outcome: Outcome,
}

impl Session {
    pub fn new(size: Coord, mine_ratio: f64, seed: u64) -> Result<Self> {
        Ok(Self::from_config(GameConfig::new(size, mine_ratio)?, seed))
    }

    pub fn from_config(config: GameConfig, seed: u64) -> Self {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = Grid::new(config.size);
        grid.seed_mines(config.mines(), &mut rng, |_| false);
        log::debug!(
            "new {}x{} session with {} mines, seed {}",
            config.size,
            config.size,
            config.mines(),
            seed
        );
        Self::with_rng(grid, rng)
    }

    /// Session over a prepared mine layout; `seed` only drives first-move displacement.
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        use rand::prelude::*;

        Self::with_rng(grid, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rng: SmallRng) -> Self {
        let cells_to_clear = grid.total_cells() - grid.mine_count();
        Self {
            grid,
            rng,
            cells_to_clear,
            cells_cleared: Saturating(0),
            first_move_pending: true,
            outcome: Outcome::default(),
        }
    }

    pub fn size(&self) -> Coord {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid.cell_at(coords)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn cells_to_clear(&self) -> CellCount {
        self.cells_to_clear
    }

    pub fn cells_cleared(&self) -> CellCount {
        self.cells_cleared.0
    }

    pub fn is_first_move_pending(&self) -> bool {
        self.first_move_pending
    }

    pub fn mines_left(&self) -> isize {
        (self.grid.mine_count() as isize) - (self.grid.flag_count() as isize)
    }

    /// Coordinates of every mine the player set off.
    pub fn detonated(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.grid
            .coords()
            .filter(|&pos| self.grid[pos].detonated)
    }

    /// Clears `coords` when `request` is `None`, otherwise cycles the requested mark.
    ///
    /// A clear on a cleared number whose flagged neighbors match it clears the whole block
    /// around it. Moves that cannot apply leave the session untouched and report no progress,
    /// including any move once the game is over.
    pub fn apply_move(&mut self, coords: Coord2, request: Option<Mark>) -> Result<MoveReport> {
        let coords = self.grid.validate_coords(coords)?;

        if self.outcome.is_finished() {
            log::debug!("game already ended, ignoring move at {:?}", coords);
            return Ok(self.report(0));
        }

        if self.first_move_pending {
            let moved = self.grid.displace_mines_from(coords, &mut self.rng);
            self.grid.compute_adjacent_counts();
            self.first_move_pending = false;
            log::debug!("first move at {:?}, displaced {} mines", coords, moved);
        }

        log::trace!("move at {:?}, request {:?}", coords, request);
        let cell = self.grid[coords];
        let cleared = match request {
            Some(mark) if cell.hidden => {
                let marked = self.grid.cycle_mark(coords, mark);
                log::trace!("mark at {:?} updated: {}", coords, marked.has_update());
                0
            }
            Some(_) => 0,
            None if cell.hidden => {
                let clearing = self.grid.clear_cell(coords);
                self.absorb(clearing)
            }
            None if cell.adjacent > 0
                && cell.adjacent == self.grid.count_flagged_neighbors(coords) =>
            {
                let clearing = self.grid.flood_clear_neighbors(coords);
                self.absorb(clearing)
            }
            None => 0,
        };

        if self.outcome == Outcome::InProgress && self.cells_cleared.0 == self.cells_to_clear {
            self.outcome = Outcome::Won;
            log::debug!("all {} safe cells cleared", self.cells_to_clear);
        }

        Ok(self.report(cleared))
    }

    fn absorb(&mut self, clearing: ClearOutcome) -> CellCount {
        self.cells_cleared += clearing.cleared;
        if clearing.triggered {
            self.outcome = Outcome::Lost;
            log::debug!("mine triggered after {} cleared cells", self.cells_cleared);
        }
        clearing.cleared
    }

    fn report(&self, cleared: CellCount) -> MoveReport {
        MoveReport {
            cleared,
            outcome: self.outcome,
        }
    }

    /// Display state of every cell, see [`CellView::of`].
    pub fn render(&self, reveal_all: bool) -> Array2<CellView> {
        self.grid
            .cells()
            .map(|&cell| CellView::of(cell, reveal_all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    // M . . M
    // . . . .
    // . . . .
    // M . . .
    const CORNERS: &[Coord2] = &[(0, 0), (0, 3), (3, 0)];

    // M 2 M 1
    // 1 2 1 1
    // 0 0 1 1
    // 0 0 1 M
    const CHORD: &[Coord2] = &[(0, 0), (0, 2), (3, 3)];

    fn session(mines: &[Coord2]) -> Session {
        Session::from_grid(Grid::from_mine_coords(4, mines).unwrap(), 0)
    }

    fn clear(session: &mut Session, coords: Coord2) -> MoveReport {
        session.apply_move(coords, None).unwrap()
    }

    fn flag(session: &mut Session, coords: Coord2) -> MoveReport {
        session.apply_move(coords, Some(Mark::Flag)).unwrap()
    }

    #[test]
    fn new_session_rejects_invalid_size() {
        assert!(matches!(
            Session::new(3, DEFAULT_MINE_RATIO, 1),
            Err(GameError::InvalidSize)
        ));
        assert!(matches!(
            Session::new(25, DEFAULT_MINE_RATIO, 1),
            Err(GameError::InvalidSize)
        ));
    }

    #[test]
    fn out_of_range_move_is_an_error() {
        let mut session = session(CORNERS);

        assert_eq!(session.apply_move((4, 0), None), Err(GameError::InvalidCoords));
        assert!(session.is_first_move_pending());
    }

    #[test]
    fn clearing_every_safe_cell_wins() {
        let mut session = session(CORNERS);
        assert_eq!(session.cells_to_clear(), 13);

        let opening = clear(&mut session, (2, 2));
        assert_eq!(opening.cleared, 9);
        assert_eq!(opening.outcome, Outcome::InProgress);

        for coords in [(0, 1), (0, 2), (1, 0)] {
            assert_eq!(clear(&mut session, coords).outcome, Outcome::InProgress);
        }
        let last = clear(&mut session, (2, 0));

        assert_eq!(last.cleared, 1);
        assert_eq!(last.outcome, Outcome::Won);
        assert_eq!(session.cells_cleared(), 13);
        assert_eq!(session.grid().mine_count(), 3);
    }

    #[test]
    fn clearing_a_mine_loses_and_marks_it_detonated() {
        let mut session = session(CORNERS);

        clear(&mut session, (3, 3));
        flag(&mut session, (0, 3));
        flag(&mut session, (1, 0));
        let report = clear(&mut session, (0, 0));

        assert_eq!(report.cleared, 1);
        assert_eq!(report.outcome, Outcome::Lost);
        assert!(session.cell_at((0, 0)).detonated);
        assert_eq!(session.detonated().collect::<Vec<_>>(), [(0, 0)]);

        let view = session.render(true);
        assert_eq!(view[[0, 0]].symbol(), 'X');
        assert_eq!(view[[3, 0]].symbol(), '*');
        assert_eq!(view[[0, 3]].symbol(), '#');
        assert_eq!(view[[1, 0]].symbol(), 'x');
        assert_eq!(view[[3, 3]].symbol(), ' ');
    }

    #[test]
    fn finished_game_ignores_moves() {
        let mut session = session(CORNERS);
        clear(&mut session, (3, 3));
        clear(&mut session, (0, 0));
        let cleared = session.cells_cleared();

        let report = clear(&mut session, (0, 1));

        assert_eq!(
            report,
            MoveReport {
                cleared: 0,
                outcome: Outcome::Lost
            }
        );
        assert_eq!(session.cells_cleared(), cleared);
        assert!(session.cell_at((0, 1)).hidden);
    }

    #[test]
    fn first_move_is_always_safe() {
        for seed in 0..32 {
            let mut session = Session::new(10, DEFAULT_MINE_RATIO, seed).unwrap();
            assert_eq!(session.grid().mine_count(), 20);

            let report = clear(&mut session, (5, 5));

            assert_ne!(report.outcome, Outcome::Lost);
            assert_eq!(session.cell_at((5, 5)).adjacent, 0);
            assert!(report.cleared >= 9);
            assert_eq!(session.grid().mine_count(), 20);
            assert_eq!(session.cells_cleared(), report.cleared);
        }
    }

    #[test]
    fn first_move_flag_still_settles_the_layout() {
        let mut session = session(&[(1, 1), (3, 3), (0, 3)]);

        let report = flag(&mut session, (0, 0));

        assert_eq!(report.cleared, 0);
        assert!(!session.is_first_move_pending());
        assert_eq!(session.cell_at((0, 0)).mark, Some(Mark::Flag));
        assert!(!session.cell_at((1, 1)).has_mine);
        assert_eq!(session.grid().mine_count(), 3);
        assert_eq!(session.mines_left(), 2);
    }

    #[test]
    fn chord_needs_matching_flags() {
        let mut session = session(CHORD);
        assert_eq!(clear(&mut session, (3, 0)).cleared, 9);
        assert_eq!(session.cell_at((1, 1)).adjacent, 2);

        flag(&mut session, (0, 0));
        assert_eq!(clear(&mut session, (1, 1)).cleared, 0);
        assert!(session.cell_at((0, 1)).hidden);

        flag(&mut session, (0, 2));
        let report = clear(&mut session, (1, 1));

        assert_eq!(report.cleared, 1);
        assert_eq!(report.outcome, Outcome::InProgress);
        assert!(!session.cell_at((0, 1)).hidden);
        assert!(session.cell_at((0, 0)).hidden);
        assert!(session.cell_at((0, 2)).hidden);
    }

    #[test]
    fn chord_with_wrong_flag_detonates() {
        let mut session = session(CHORD);
        clear(&mut session, (3, 0));
        assert_eq!(session.cell_at((1, 2)).adjacent, 1);

        flag(&mut session, (0, 3));
        let report = clear(&mut session, (1, 2));

        assert_eq!(report.outcome, Outcome::Lost);
        assert_eq!(report.cleared, 4);
        assert!(session.cell_at((0, 2)).detonated);
        assert!(session.cell_at((0, 3)).hidden);
    }

    #[test]
    fn marks_on_cleared_cells_are_ignored() {
        let mut session = session(CORNERS);
        clear(&mut session, (2, 2));

        let report = flag(&mut session, (2, 2));

        assert_eq!(report.cleared, 0);
        assert_eq!(session.cell_at((2, 2)).mark, None);
    }

    #[test]
    fn marked_cells_are_protected_from_clearing() {
        let mut session = session(CORNERS);
        clear(&mut session, (2, 2));

        session.apply_move((0, 0), Some(Mark::Uncertain)).unwrap();
        let report = clear(&mut session, (0, 0));

        assert_eq!(report.cleared, 0);
        assert_eq!(report.outcome, Outcome::InProgress);
        assert_eq!(session.render(false)[[0, 0]], CellView::Uncertain);
    }
}
