use minegrid_core::{Coord, CellView};
use ndarray::Array2;

use crate::command::axis_label;

/// Column letters across the top, then one lettered line per row.
pub(crate) fn format_board(view: &Array2<CellView>) -> String {
    let mut out = String::from(" ");
    for y in 0..view.ncols() {
        out.push(' ');
        out.push(label(y));
    }
    out.push('\n');

    for (x, row) in view.rows().into_iter().enumerate() {
        out.push(label(x));
        for cell in row {
            out.push(' ');
            out.push(cell.symbol());
        }
        out.push('\n');
    }
    out
}

fn label(index: usize) -> char {
    Coord::try_from(index).map_or('?', axis_label)
}
