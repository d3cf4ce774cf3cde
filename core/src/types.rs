use ndarray::Array2;

/// Single coordinate axis used for the grid dimension and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, where `x` selects the row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait BlockIterExt {
    /// The 3×3 block around `center`, center included, clipped to the grid.
    fn iter_block(&self, center: Coord2) -> BlockIter;

    /// Same as [`iter_block`](Self::iter_block) without the center itself.
    fn iter_neighbors(&self, center: Coord2) -> BlockIter {
        self.iter_block(center).without_center()
    }
}

impl<T> BlockIterExt for Array2<T> {
    fn iter_block(&self, center: Coord2) -> BlockIter {
        let dim = self.dim();
        let bounds = (
            Coord::try_from(dim.0).unwrap_or(Coord::MAX),
            Coord::try_from(dim.1).unwrap_or(Coord::MAX),
        );
        BlockIter::new(center, bounds)
    }
}

/// Whether `coords` lies in the 3×3 block around `center`.
pub const fn in_block(center: Coord2, coords: Coord2) -> bool {
    coords.0.abs_diff(center.0) <= 1 && coords.1.abs_diff(center.1) <= 1
}

const DISPLACEMENTS: [(i8, i8); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct BlockIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
    skip_center: bool,
}

impl BlockIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
            skip_center: false,
        }
    }

    fn without_center(mut self) -> Self {
        self.skip_center = true;
        self
    }
}

impl Iterator for BlockIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if self.skip_center && delta == (0, 0) {
                continue;
            }

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
