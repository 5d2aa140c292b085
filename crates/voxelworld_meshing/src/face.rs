//! Cube faces: directions, normals and quad corners.
//!
//! Every face is a quad with corners in clockwise order seen from outside,
//! triangulated as `(0, 1, 2)` and `(0, 2, 3)`. The raw cross product of a
//! triangle's edges therefore points into the cube, the same convention
//! the marching-cubes tables follow.

use voxelworld_shared::{Vec2, Vec3};

/// One of the six axis-aligned cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Z (top)
    Top,
    /// -Z (bottom)
    Bottom,
    /// +X
    East,
    /// -X
    West,
    /// +Y
    North,
    /// -Y
    South,
}

impl Face {
    /// All faces in meshing order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::East,
        Self::West,
        Self::North,
        Self::South,
    ];

    /// Quad texture coordinates, matching [`Face::corners`].
    pub const UVS: [Vec2; 4] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
    ];

    /// Integer offset to the neighbor across this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Top => (0, 0, 1),
            Self::Bottom => (0, 0, -1),
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
            Self::North => (0, 1, 0),
            Self::South => (0, -1, 0),
        }
    }

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.offset();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Quad corners relative to the cube origin for a cube of edge `s`.
    #[must_use]
    pub fn corners(self, s: f32) -> [Vec3; 4] {
        let v = Vec3::new;
        match self {
            Self::Top => [v(0.0, 0.0, s), v(0.0, s, s), v(s, s, s), v(s, 0.0, s)],
            Self::Bottom => [v(0.0, 0.0, 0.0), v(s, 0.0, 0.0), v(s, s, 0.0), v(0.0, s, 0.0)],
            Self::East => [v(s, 0.0, 0.0), v(s, 0.0, s), v(s, s, s), v(s, s, 0.0)],
            Self::West => [v(0.0, 0.0, 0.0), v(0.0, s, 0.0), v(0.0, s, s), v(0.0, 0.0, s)],
            Self::North => [v(0.0, s, 0.0), v(s, s, 0.0), v(s, s, s), v(0.0, s, s)],
            Self::South => [v(0.0, 0.0, 0.0), v(0.0, 0.0, s), v(s, 0.0, s), v(s, 0.0, 0.0)],
        }
    }
}
