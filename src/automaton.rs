//! Per-frame sand relaxation.
//!
//! Cells are visited one anti-diagonal at a time, starting at the down corner, so a
//! grain that moves lands on a slice that has already been scanned and is not moved
//! again in the same pass. Each slice is walked in a random direction to keep the pile
//! from leaning to one side.

use rand::Rng;

use crate::grid::{slice_cells, Coord, MatrixId, Matrices, ScanOrder, SLICE_COUNT};

pub fn can_go_left(m: &Matrices, id: MatrixId, c: Coord) -> bool {
    c.left().is_some_and(|to| !m.get(id, to))
}

pub fn can_go_right(m: &Matrices, id: MatrixId, c: Coord) -> bool {
    c.right().is_some_and(|to| !m.get(id, to))
}

/// A straight fall needs both diagonal supports clear as well as the target.
pub fn can_go_down(m: &Matrices, id: MatrixId, c: Coord) -> bool {
    match c.down() {
        Some(to) => can_go_left(m, id, c) && can_go_right(m, id, c) && !m.get(id, to),
        None => false,
    }
}

fn move_to(m: &mut Matrices, id: MatrixId, from: Coord, to: Coord) {
    m.set(id, from, false);
    m.set(id, to, true);
}

/// Moves the grain at `c`, if any and if it has somewhere to go.
pub fn move_particle<R: Rng + ?Sized>(
    m: &mut Matrices,
    id: MatrixId,
    c: Coord,
    rng: &mut R,
) -> bool {
    if !m.get(id, c) {
        return false;
    }

    let left = c.left().filter(|_| can_go_left(m, id, c));
    let right = c.right().filter(|_| can_go_right(m, id, c));

    let to = match (left, right) {
        (None, None) => return false,
        _ if can_go_down(m, id, c) => c.down(),
        (Some(left), None) => Some(left),
        (None, Some(right)) => Some(right),
        (Some(left), Some(right)) => Some(if rng.gen_bool(0.5) { left } else { right }),
    };

    match to {
        Some(to) => {
            move_to(m, id, c, to);
            true
        }
        None => false,
    }
}

/// One relaxation pass over both matrices. Returns whether any grain moved.
pub fn step<R: Rng + ?Sized>(m: &mut Matrices, rng: &mut R) -> bool {
    let mut moved = false;
    for slice in 0..SLICE_COUNT {
        let order = if rng.gen_bool(0.5) {
            ScanOrder::Forward
        } else {
            ScanOrder::Reverse
        };
        for c in slice_cells(slice, order) {
            // Both matrices share the scan so they animate in lockstep.
            moved |= move_particle(m, MatrixId::B, c, rng);
            moved |= move_particle(m, MatrixId::A, c, rng);
        }
    }
    moved
}

/// Runs passes until nothing moves or `max_passes` is reached. Returns the passes that
/// moved something.
pub fn settle<R: Rng + ?Sized>(m: &mut Matrices, rng: &mut R, max_passes: usize) -> usize {
    let mut passes = 0;
    while passes < max_passes && step(m, rng) {
        passes += 1;
    }
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GRAIN_COUNT, GRID_SIZE};
    use crate::grid::Rotation;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn lone_grain_falls_to_the_down_corner() {
        let mut m = Matrices::new();
        m.set(MatrixId::A, Coord::new(7, 0), true);
        let mut rng = rng(1);
        let passes = settle(&mut m, &mut rng, 64);
        assert!(passes > 0);
        assert!(m.get(MatrixId::A, Coord::new(0, 7)));
        assert_eq!(m.count(MatrixId::A), 1);
    }

    #[test]
    fn corner_grain_never_moves() {
        let mut m = Matrices::new();
        let corner = Coord::new(0, 7);
        m.set(MatrixId::B, corner, true);
        assert!(!can_go_left(&m, MatrixId::B, corner));
        assert!(!can_go_right(&m, MatrixId::B, corner));
        assert!(!can_go_down(&m, MatrixId::B, corner));
        assert!(!move_particle(&mut m, MatrixId::B, corner, &mut rng(3)));
    }

    #[test]
    fn blocked_support_prevents_a_fall() {
        let mut m = Matrices::new();
        let c = Coord::new(3, 3);
        m.set(MatrixId::A, c, true);
        m.set(MatrixId::A, Coord::new(2, 3), true);
        assert!(!can_go_left(&m, MatrixId::A, c));
        assert!(can_go_right(&m, MatrixId::A, c));
        assert!(!can_go_down(&m, MatrixId::A, c));
        assert!(move_particle(&mut m, MatrixId::A, c, &mut rng(4)));
        assert!(m.get(MatrixId::A, Coord::new(3, 4)));
        assert!(!m.get(MatrixId::A, c));
    }

    #[test]
    fn open_cell_falls_straight_down() {
        let mut m = Matrices::new();
        let c = Coord::new(4, 2);
        m.set(MatrixId::A, c, true);
        assert!(can_go_down(&m, MatrixId::A, c));
        move_particle(&mut m, MatrixId::A, c, &mut rng(5));
        assert!(m.get(MatrixId::A, Coord::new(3, 3)));
    }

    #[test]
    fn tie_break_uses_both_sides() {
        // Down blocked, both diagonals open.
        let mut went_left = false;
        let mut went_right = false;
        for seed in 0..32 {
            let mut m = Matrices::new();
            let c = Coord::new(4, 2);
            m.set(MatrixId::A, c, true);
            m.set(MatrixId::A, Coord::new(3, 3), true);
            move_particle(&mut m, MatrixId::A, c, &mut rng(seed));
            went_left |= m.get(MatrixId::A, Coord::new(3, 2));
            went_right |= m.get(MatrixId::A, Coord::new(4, 3));
        }
        assert!(went_left && went_right);
    }

    #[test]
    fn passes_conserve_grains() {
        for seed in 0..8 {
            let mut rng = rng(seed);
            let mut m = Matrices::new();
            for (i, c) in (0..GRID_SIZE as u8)
                .flat_map(|y| (0..GRID_SIZE as u8).map(move |x| Coord::new(x, y)))
                .enumerate()
            {
                m.set(MatrixId::A, c, i % 3 == 0);
                m.set(MatrixId::B, c, i % 5 == 1);
            }
            let total = m.total();
            for pass in 0..40 {
                m.set_rotation(Rotation::from_degrees((pass / 10) as u16 * 90));
                step(&mut m, &mut rng);
                assert_eq!(m.total(), total);
            }
        }
    }

    #[test]
    fn full_matrix_is_already_settled() {
        let mut m = Matrices::new();
        m.set_rotation(Rotation::Deg90);
        m.fill(MatrixId::A, GRAIN_COUNT);
        let before = m.clone();
        let mut rng = rng(9);
        assert!(!step(&mut m, &mut rng));
        assert_eq!(m, before);
    }

    #[test]
    fn settled_state_stays_settled() {
        let mut m = Matrices::new();
        m.fill(MatrixId::B, 21);
        m.set(MatrixId::A, Coord::new(7, 0), true);
        m.set(MatrixId::A, Coord::new(5, 5), true);
        let mut rng = rng(11);
        settle(&mut m, &mut rng, 200);
        let settled = m.clone();
        for _ in 0..10 {
            assert!(!step(&mut m, &mut rng));
            assert_eq!(m, settled);
        }
    }
}
