//! Corner and winding tables for the unit cube.
//!
//! ```text
//!   4____5
//!  /|   /|
//! 0-+--1 |
//! | 6__|_7
//! |/   |/
//! 2----3
//! ```
//!
//! Every face is two triangles listed counter-clockwise as seen from outside
//! the cube, so a single front-face convention works for all six.

use crate::voxels::block::block_face::BlockFace;

/// The eight corners of a unit cube centred on the origin.
pub(super) const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
];

/// Which edge of the inset tile a vertex samples, for u and v respectively.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum UvCorner {
    NearNear,
    NearFar,
    FarNear,
    FarFar,
}

impl UvCorner {
    /// `(u is far, v is far)`
    pub(super) fn is_far(self) -> (bool, bool) {
        match self {
            UvCorner::NearNear => (false, false),
            UvCorner::NearFar => (false, true),
            UvCorner::FarNear => (true, false),
            UvCorner::FarFar => (true, true),
        }
    }
}

use UvCorner::*;

/// One emitted vertex: a cube corner and the tile corner it samples.
pub(super) type FaceVertex = (usize, UvCorner);

/// Six vertices per face, indexed by `BlockFace as usize`.
const FACE_TABLE: [[FaceVertex; 6]; 6] = [
    // RIGHT (+y)
    [(1, NearNear), (7, FarFar), (3, NearFar), (7, FarFar), (1, NearNear), (5, FarNear)],
    // LEFT (-y)
    [(4, NearNear), (2, FarFar), (6, NearFar), (2, FarFar), (4, NearNear), (0, FarNear)],
    // BACK (+x)
    [(5, NearNear), (6, FarFar), (7, NearFar), (6, FarFar), (5, NearNear), (4, FarNear)],
    // FRONT (-x)
    [(0, NearNear), (3, FarFar), (2, NearFar), (3, FarFar), (0, NearNear), (1, FarNear)],
    // BOTTOM (-z)
    [(2, NearFar), (3, FarFar), (6, NearNear), (7, FarNear), (6, NearNear), (3, FarFar)],
    // TOP (+z)
    [(4, NearNear), (1, FarFar), (0, NearFar), (1, FarFar), (4, NearNear), (5, FarNear)],
];

/// The six vertices of `face`.
pub(super) fn face_vertices(face: BlockFace) -> &'static [FaceVertex; 6] {
    &FACE_TABLE[face as usize]
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    fn corner(index: usize) -> Vector3<f32> {
        CUBE_CORNERS[index].into()
    }

    #[test]
    fn every_face_lies_on_its_plane() {
        for face in BlockFace::all() {
            let normal = face.normal();
            for (index, _) in face_vertices(face) {
                assert_eq!(corner(*index).dot(normal), 0.5, "{:?}", face);
            }
        }
    }

    #[test]
    fn every_triangle_winds_outward() {
        for face in BlockFace::all() {
            for triangle in face_vertices(face).chunks(3) {
                let a = corner(triangle[0].0);
                let b = corner(triangle[1].0);
                let c = corner(triangle[2].0);
                let normal = (b - a).cross(c - a).normalize();
                assert_eq!(normal, face.normal(), "{:?}", face);
            }
        }
    }

    #[test]
    fn each_face_covers_four_corners() {
        for face in BlockFace::all() {
            let mut corners: Vec<usize> = face_vertices(face).iter().map(|v| v.0).collect();
            corners.sort_unstable();
            corners.dedup();
            assert_eq!(corners.len(), 4, "{:?}", face);
        }
    }
}
