//! Table-driven marching cubes for a single cube.
//!
//! A cube is eight corner positions plus eight densities, ordered as in
//! [`CORNER_OFFSETS`](crate::tables::CORNER_OFFSETS). Triangles come out in
//! table order, whose raw cross product points toward the solid side.

use crate::tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use voxelworld_shared::Vec3;

/// Densities closer to zero than this snap the crossing to that corner.
pub const EDGE_EPSILON: f32 = 1e-4;

/// Corner-sign index: bit `i` set when corner `i` is solid (`> 0`).
#[inline]
#[must_use]
pub fn cube_index(densities: &[f32; 8]) -> usize {
    densities
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > 0.0)
        .fold(0, |index, (i, _)| index | (1 << i))
}

/// Zero crossing between two corners.
///
/// Snaps to `p1` if `v1` is near zero, to `p2` if `v2` is, and to `p1`
/// when the densities are equal.
#[must_use]
pub fn interpolate_edge(p1: Vec3, p2: Vec3, v1: f32, v2: f32) -> Vec3 {
    if v1.abs() < EDGE_EPSILON {
        return p1;
    }
    if v2.abs() < EDGE_EPSILON {
        return p2;
    }
    if (v1 - v2).abs() < EDGE_EPSILON {
        return p1;
    }
    let t = (-v1 / (v2 - v1)).clamp(0.0, 1.0);
    p1 + (p2 - p1) * t
}

/// Triangulates one cube, appending triangles to `out`.
///
/// Returns the number of triangles appended. Uniform cubes (all solid or
/// all air) produce none.
pub fn polygonize(positions: &[Vec3; 8], densities: &[f32; 8], out: &mut Vec<[Vec3; 3]>) -> usize {
    let case = cube_index(densities);
    let edges = EDGE_TABLE[case];
    if edges == 0 {
        return 0;
    }

    let mut edge_points = [Vec3::ZERO; 12];
    for (edge, [a, b]) in EDGE_CORNERS.iter().enumerate() {
        if edges & (1 << edge) != 0 {
            edge_points[edge] = interpolate_edge(positions[*a], positions[*b], densities[*a], densities[*b]);
        }
    }

    let before = out.len();
    for tri in TRI_TABLE[case].chunks_exact(3) {
        if tri[0] < 0 {
            break;
        }
        out.push([
            edge_points[tri[0] as usize],
            edge_points[tri[1] as usize],
            edge_points[tri[2] as usize],
        ]);
    }
    out.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::CORNER_OFFSETS;

    fn unit_cube() -> [Vec3; 8] {
        CORNER_OFFSETS.map(|[x, y, z]| Vec3::new(x as f32, y as f32, z as f32))
    }

    #[test]
    fn test_uniform_cubes_emit_nothing() {
        let mut out = Vec::new();
        assert_eq!(polygonize(&unit_cube(), &[-1.0; 8], &mut out), 0);
        assert_eq!(polygonize(&unit_cube(), &[0.0; 8], &mut out), 0);
        assert_eq!(polygonize(&unit_cube(), &[1.5; 8], &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_cube_index_bits() {
        let mut d = [-1.0; 8];
        assert_eq!(cube_index(&d), 0);
        d[0] = 1.0;
        d[7] = 0.1;
        assert_eq!(cube_index(&d), 0b1000_0001);
        // Zero is air
        d[3] = 0.0;
        assert_eq!(cube_index(&d), 0b1000_0001);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let p = interpolate_edge(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0, -1.0);
        assert!((p.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_interpolate_snaps() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, 4.0);
        assert_eq!(interpolate_edge(a, b, 0.0, -1.0), a);
        assert_eq!(interpolate_edge(a, b, 1.0, 0.00001), b);
        assert_eq!(interpolate_edge(a, b, 0.7, 0.7), a);
    }

    #[test]
    fn test_single_corner_triangle_points_at_solid() {
        let mut d = [-1.0; 8];
        d[0] = 1.0;
        let mut out = Vec::new();
        assert_eq!(polygonize(&unit_cube(), &d, &mut out), 1);

        let [a, b, c] = out[0];
        let raw = (b - a).cross(c - a);
        // Solid corner is the origin; the triangle sits at x+y+z = 0.5
        assert!(raw.dot(Vec3::new(1.0, 1.0, 1.0)) < 0.0);
        for p in out[0] {
            assert!((p.x + p.y + p.z - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_half_solid_cube_is_a_plane() {
        // Bottom four corners solid: a horizontal quad at the crossing
        let d = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];
        let mut out = Vec::new();
        assert_eq!(polygonize(&unit_cube(), &d, &mut out), 2);
        for tri in &out {
            for p in tri {
                assert!((p.z - 0.5).abs() < 1e-6);
            }
        }
    }
}
