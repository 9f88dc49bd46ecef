use crate::gravity::Gravity;
use crate::grid::{MatrixId, Rotation};

/// Rotation that keeps the picture upright for the given gravity, or `None` to leave the
/// display as it is.
pub fn rotation_for(mounting_offset: u16, gravity: Option<Gravity>) -> Option<Rotation> {
    gravity.map(|g| Rotation::from_degrees((mounting_offset + g.degrees()) % 360))
}

/// Matrix grains leave from. Right drains A into B, Left drains B into A. Off the
/// coupling axis A counts as the source only when pointing Up.
pub fn source_matrix(gravity: Option<Gravity>) -> MatrixId {
    match gravity {
        Some(Gravity::Right) | Some(Gravity::Up) => MatrixId::A,
        Some(Gravity::Left) | Some(Gravity::Down) | None => MatrixId::B,
    }
}

/// Matrix that ends up full once the run is over, if the glass stands on the coupling
/// axis.
pub fn downstream_matrix(gravity: Option<Gravity>) -> Option<MatrixId> {
    match gravity {
        Some(Gravity::Right) => Some(MatrixId::B),
        Some(Gravity::Left) => Some(MatrixId::A),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ROTATION_OFFSET;

    #[test]
    fn rotation_adds_the_mounting_offset() {
        assert_eq!(
            rotation_for(ROTATION_OFFSET, Some(Gravity::Right)),
            Some(Rotation::Deg90)
        );
        assert_eq!(
            rotation_for(ROTATION_OFFSET, Some(Gravity::Up)),
            Some(Rotation::Deg180)
        );
        assert_eq!(
            rotation_for(ROTATION_OFFSET, Some(Gravity::Left)),
            Some(Rotation::Deg270)
        );
        assert_eq!(
            rotation_for(ROTATION_OFFSET, Some(Gravity::Down)),
            Some(Rotation::Deg0)
        );
        assert_eq!(rotation_for(ROTATION_OFFSET, None), None);
    }

    #[test]
    fn source_and_downstream_are_opposite_on_the_axis() {
        for g in [Gravity::Right, Gravity::Left] {
            assert_eq!(
                downstream_matrix(Some(g)),
                Some(source_matrix(Some(g)).other())
            );
        }
        assert_eq!(downstream_matrix(Some(Gravity::Up)), None);
        assert_eq!(source_matrix(Some(Gravity::Up)), MatrixId::A);
        assert_eq!(source_matrix(None), MatrixId::B);
    }
}
