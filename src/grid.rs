//! The two 8x8 occupancy surfaces and their coordinate geometry.
//!
//! Cells are stored in raw (physical) coordinates. Simulation code works in canonical
//! coordinates, which the current [`Rotation`] maps onto raw ones, so that "down" in
//! canonical space is always the `(0, 7)` corner.

use core::fmt;

use crate::config::GRID_SIZE;

const MAX: u8 = GRID_SIZE as u8 - 1;
/// Anti-diagonals in an 8x8 grid.
pub const SLICE_COUNT: u8 = 2 * GRID_SIZE as u8 - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Diagonal step towards the `(0, 7)` corner.
    pub fn down(self) -> Option<Coord> {
        (self.x > 0 && self.y < MAX).then(|| Coord::new(self.x - 1, self.y + 1))
    }

    pub fn left(self) -> Option<Coord> {
        (self.x > 0).then(|| Coord::new(self.x - 1, self.y))
    }

    pub fn right(self) -> Option<Coord> {
        (self.y < MAX).then(|| Coord::new(self.x, self.y + 1))
    }

    /// Index of the anti-diagonal this cell sits on, 0 at the down corner.
    pub const fn slice(self) -> u8 {
        self.x + (MAX - self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixId {
    A,
    B,
}

impl MatrixId {
    pub const ALL: [MatrixId; 2] = [MatrixId::A, MatrixId::B];

    pub const fn index(self) -> usize {
        match self {
            MatrixId::A => 0,
            MatrixId::B => 1,
        }
    }

    pub const fn other(self) -> MatrixId {
        match self {
            MatrixId::A => MatrixId::B,
            MatrixId::B => MatrixId::A,
        }
    }
}

/// Quarter-turn applied when translating canonical coordinates to raw ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Snaps any angle to the quarter-turn at or below it.
    pub const fn from_degrees(degrees: u16) -> Self {
        match (degrees % 360) / 90 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub const fn to_raw(self, c: Coord) -> Coord {
        match self {
            Rotation::Deg0 => c,
            Rotation::Deg90 => Coord::new(MAX - c.y, c.x),
            Rotation::Deg180 => Coord::new(MAX - c.x, MAX - c.y),
            Rotation::Deg270 => Coord::new(c.y, MAX - c.x),
        }
    }
}

/// Which way a slice is walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    Forward,
    Reverse,
}

/// Cells of anti-diagonal `slice`, each visited once.
///
/// `Forward` starts on the high-y end (`y = 7 - j`), `Reverse` walks the same cells the
/// other way round.
pub fn slice_cells(slice: u8, order: ScanOrder) -> impl Iterator<Item = Coord> {
    assert!(slice < SLICE_COUNT, "slice {} out of range", slice);
    let n = GRID_SIZE as u8;
    let z = if slice < n { 0 } else { slice - n + 1 };
    (z..=slice - z).map(move |j| match order {
        ScanOrder::Forward => Coord::new(slice - j, MAX - j),
        ScanOrder::Reverse => Coord::new(j, MAX - (slice - j)),
    })
}

/// One 8x8 matrix, row-major bitmaps with bit `x` of `rows[y]` set for an occupied cell.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Grid {
    rows: [u8; GRID_SIZE],
}

impl Grid {
    pub const fn new() -> Self {
        Self {
            rows: [0; GRID_SIZE],
        }
    }

    fn check(c: Coord) {
        assert!(
            c.x <= MAX && c.y <= MAX,
            "cell ({}, {}) outside the matrix",
            c.x,
            c.y
        );
    }

    pub fn get(&self, c: Coord) -> bool {
        Self::check(c);
        self.rows[c.y as usize] & (1 << c.x) != 0
    }

    pub fn set(&mut self, c: Coord, on: bool) {
        Self::check(c);
        if on {
            self.rows[c.y as usize] |= 1 << c.x;
        } else {
            self.rows[c.y as usize] &= !(1 << c.x);
        }
    }

    pub fn toggle(&mut self, c: Coord) {
        Self::check(c);
        self.rows[c.y as usize] ^= 1 << c.x;
    }

    pub fn clear(&mut self) {
        self.rows = [0; GRID_SIZE];
    }

    pub fn count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    pub fn rows(&self) -> &[u8; GRID_SIZE] {
        &self.rows
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({} grains)", self.count())
    }
}

/// Ruled dump with quadrant separators, raw coordinates.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " 0123-4567 ")?;
        for y in 0..GRID_SIZE as u8 {
            if y == 4 {
                writeln!(f, "|----|----|")?;
            }
            write!(f, "{}", y)?;
            for x in 0..GRID_SIZE as u8 {
                if x == 4 {
                    write!(f, "|")?;
                }
                let cell = if self.get(Coord::new(x, y)) { 'X' } else { ' ' };
                write!(f, "{}", cell)?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "-----------")
    }
}

/// Both matrices plus the rotation that defines the canonical frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matrices {
    grids: [Grid; 2],
    rotation: Rotation,
}

impl Matrices {
    pub const fn new() -> Self {
        Self {
            grids: [Grid::new(), Grid::new()],
            rotation: Rotation::Deg0,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn grid(&self, id: MatrixId) -> &Grid {
        &self.grids[id.index()]
    }

    pub fn grid_mut(&mut self, id: MatrixId) -> &mut Grid {
        &mut self.grids[id.index()]
    }

    /// Canonical read.
    pub fn get(&self, id: MatrixId, c: Coord) -> bool {
        self.grid(id).get(self.rotation.to_raw(c))
    }

    /// Canonical write.
    pub fn set(&mut self, id: MatrixId, c: Coord, on: bool) {
        let raw = self.rotation.to_raw(c);
        self.grid_mut(id).set(raw, on);
    }

    pub fn get_raw(&self, id: MatrixId, c: Coord) -> bool {
        self.grid(id).get(c)
    }

    pub fn toggle_raw(&mut self, id: MatrixId, c: Coord) {
        self.grid_mut(id).toggle(c);
    }

    pub fn count(&self, id: MatrixId) -> usize {
        self.grid(id).count()
    }

    pub fn total(&self) -> usize {
        self.grids.iter().map(Grid::count).sum()
    }

    pub fn clear(&mut self) {
        for grid in &mut self.grids {
            grid.clear();
        }
    }

    /// Packs `count` grains into `id` from the canonical down corner outwards, slice by
    /// slice. Cells past `count` are cleared.
    pub fn fill(&mut self, id: MatrixId, count: usize) {
        let mut placed = 0;
        for slice in 0..SLICE_COUNT {
            for c in slice_cells(slice, ScanOrder::Forward) {
                placed += 1;
                self.set(id, c, placed <= count);
            }
        }
    }
}
