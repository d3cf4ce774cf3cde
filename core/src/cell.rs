use serde::{Deserialize, Serialize};

/// Player annotation on a hidden cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Flag,
    Uncertain,
}

impl Mark {
    /// Next mark when the player requests `self` on a cell currently marked `current`.
    ///
    /// Requesting [`Flag`](Mark::Flag) cycles none, flag, uncertain, none. Requesting
    /// [`Uncertain`](Mark::Uncertain) toggles the uncertain mark and always drops a flag.
    pub const fn cycle(self, current: Option<Mark>) -> Option<Mark> {
        match (self, current) {
            (Mark::Flag, None) => Some(Mark::Flag),
            (Mark::Flag, Some(Mark::Flag)) => Some(Mark::Uncertain),
            (Mark::Flag, Some(Mark::Uncertain)) => None,
            (Mark::Uncertain, Some(Mark::Uncertain)) => None,
            (Mark::Uncertain, _) => Some(Mark::Uncertain),
        }
    }
}

/// State of a single grid position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub hidden: bool,
    pub mark: Option<Mark>,
    /// Mines among the neighbors, only meaningful for cells without a mine.
    pub adjacent: u8,
    /// Set on the mine the player cleared.
    pub detonated: bool,
}

impl Cell {
    pub const fn is_flagged(&self) -> bool {
        matches!(self.mark, Some(Mark::Flag))
    }

    /// Hidden and carrying no mark, so clearing it is allowed.
    pub const fn is_clearable(&self) -> bool {
        self.hidden && self.mark.is_none()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            has_mine: false,
            hidden: true,
            mark: None,
            adjacent: 0,
            detonated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_requests_cycle_through_uncertain() {
        let mut mark = None;
        let mut seen = [None; 3];

        for (slot, request) in seen
            .iter_mut()
            .zip([Mark::Flag, Mark::Flag, Mark::Uncertain])
        {
            mark = request.cycle(mark);
            *slot = mark;
        }

        assert_eq!(seen, [Some(Mark::Flag), Some(Mark::Uncertain), None]);
    }

    #[test]
    fn uncertain_request_replaces_flag_and_toggles_off() {
        assert_eq!(Mark::Uncertain.cycle(None), Some(Mark::Uncertain));
        assert_eq!(Mark::Uncertain.cycle(Some(Mark::Flag)), Some(Mark::Uncertain));
        assert_eq!(Mark::Uncertain.cycle(Some(Mark::Uncertain)), None);
    }

    #[test]
    fn marked_cells_are_not_clearable() {
        let mut cell = Cell::default();
        assert!(cell.is_clearable());

        cell.mark = Some(Mark::Uncertain);
        assert!(!cell.is_clearable());

        cell.mark = None;
        cell.hidden = false;
        assert!(!cell.is_clearable());
    }
}
