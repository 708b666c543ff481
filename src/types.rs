use ndarray::Array2;

/// Linear axis type for board dimensions and cell positions.
pub type Coord = u8;

/// Area-scale count type for mines and cells.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
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

pub trait NeighborIterExt {
    /// Up-to-8 surrounding positions within bounds, for mine adjacency.
    fn iter_adjacent(&self, index: Coord2) -> NeighborIter;
    /// Up-to-4 orthogonal positions within bounds, for flood fill.
    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_adjacent(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, dim_coords(self), ADJACENT)
    }

    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, dim_coords(self), ORTHOGONAL)
    }
}

fn dim_coords<T>(array: &Array2<T>) -> Coord2 {
    let dim = array.dim();
    (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
}

const ADJACENT: &[(isize, isize)] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL: &[(isize, isize)] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Applies `delta` to `coords`, returning a value only when it stays within `bounds`.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let next_x = coords.0.checked_add_signed(delta.0.try_into().ok()?)?;
    let next_y = coords.1.checked_add_signed(delta.1.try_into().ok()?)?;
    (next_x < bounds.0 && next_y < bounds.1).then_some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = self.displacements.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(coords) = apply_delta(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}
