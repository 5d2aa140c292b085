//! # Chunk Meshing Tests
//!
//! Structural checks on whole-chunk meshes built from generated terrain.

use voxelworld_meshing::{ChunkMesh, ChunkMesher, MeshMode, MeshSettings};
use voxelworld_procedural::{BlockCatalog, BlockRegistry, Chunk, TerrainConfig, TerrainGenerator};
use voxelworld_shared::{ChunkCoord, Vec3, BLOCK_SIZE, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

fn setup(coord: ChunkCoord) -> (BlockRegistry, TerrainGenerator, Chunk) {
    let catalog = BlockRegistry::with_defaults();
    let terrain = TerrainGenerator::from_config(&TerrainConfig::default(), &catalog).unwrap();
    let mut chunk = Chunk::new(coord);
    chunk.generate(&terrain);
    (catalog, terrain, chunk)
}

fn smooth_mesher() -> ChunkMesher {
    ChunkMesher::new(MeshSettings { mode: MeshMode::Smooth, ..MeshSettings::default() })
}

fn assert_well_formed(mesh: &ChunkMesh) {
    for (group, section) in mesh.sections() {
        let n = section.positions.len();
        assert_eq!(section.normals.len(), n, "group {group}");
        assert_eq!(section.uvs.len(), n, "group {group}");
        assert_eq!(section.colors.len(), n, "group {group}");
        assert_eq!(section.indices.len() % 3, 0, "group {group}");
        assert!(section.indices.iter().all(|&i| (i as usize) < n), "group {group}");
        for normal in &section.normals {
            assert!((normal.length() - 1.0).abs() < 1e-3, "group {group}: {normal:?}");
        }
    }
}

/// Test: Every blocky quad separates a solid cell from an empty one.
#[test]
fn test_blocky_faces_are_exposed() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(4, -9));
    let mesh = ChunkMesher::default().build(&chunk, &terrain, &catalog);
    assert!(!mesh.is_empty());

    for (_, section) in mesh.sections() {
        assert_eq!(section.positions.len() % 4, 0);
        for (quad, normals) in section.positions.chunks_exact(4).zip(section.normals.chunks_exact(4)) {
            let center = (quad[0] + quad[1] + quad[2] + quad[3]) * 0.25;
            let normal = normals[0];
            let inside = center * (1.0 / BLOCK_SIZE) - normal * 0.5;

            let x = inside.x.floor() as i32;
            let y = inside.y.floor() as i32;
            let z = inside.z.floor() as i32;
            let (nx, ny, nz) = (normal.x.round() as i32, normal.y.round() as i32, normal.z.round() as i32);

            assert!(chunk.is_solid(x, y, z), "face at {center:?} has no block behind it");
            assert!(!chunk.is_solid(x + nx, y + ny, z + nz), "face at {center:?} is hidden");
        }
    }
}

/// Test: Blocky quads are wound consistently against their normal.
#[test]
fn test_blocky_winding_is_consistent() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(0, 0));
    let mesh = ChunkMesher::default().build(&chunk, &terrain, &catalog);

    for (_, section) in mesh.sections() {
        for tri in section.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| section.positions[i as usize]);
            let cross = (b - a).cross(c - a);
            assert!(cross.dot(section.normals[tri[0] as usize]) < 0.0);
        }
    }
}

/// Test: Both modes produce well-formed buffers.
#[test]
fn test_meshes_are_well_formed() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(-3, 11));
    assert_well_formed(&ChunkMesher::default().build(&chunk, &terrain, &catalog));
    assert_well_formed(&smooth_mesher().build(&chunk, &terrain, &catalog));
}

/// Test: Smooth mesh vertices stay within the chunk's footprint.
#[test]
fn test_smooth_vertices_inside_chunk() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(1, 1));
    let mesh = smooth_mesher().build(&chunk, &terrain, &catalog);
    let extent = Vec3::new(CHUNK_SIZE_X as f32, CHUNK_SIZE_Y as f32, CHUNK_SIZE_Z as f32) * BLOCK_SIZE;

    // Positions are chunk-local
    for (_, section) in mesh.sections() {
        for p in &section.positions {
            assert!(p.x >= -1e-3 && p.x <= extent.x + 1e-3, "{p:?}");
            assert!(p.y >= -1e-3 && p.y <= extent.y + 1e-3, "{p:?}");
            assert!(p.z >= -1e-3 && p.z <= extent.z + 1e-3, "{p:?}");
        }
    }
}

/// Test: The smooth surface faces the sky on average.
#[test]
fn test_smooth_surface_faces_up() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(7, 2));
    let mesh = smooth_mesher().build(&chunk, &terrain, &catalog);

    // Surface triangles carry the column's sand or grass color; cubes never do
    let palette = terrain.palette();
    let surface_colors = [catalog.color(palette.sand), catalog.color(palette.grass)];
    let mut upward = 0.0f32;
    let mut seen = 0;
    for (_, section) in mesh.sections() {
        for (normal, color) in section.normals.iter().zip(&section.colors) {
            if surface_colors.contains(color) {
                upward += normal.z;
                seen += 1;
            }
        }
    }
    assert!(seen > 0);
    assert!(upward > 0.0);
}

/// Test: Meshing is a pure function of the chunk.
#[test]
fn test_meshing_is_deterministic() {
    let (catalog, terrain, chunk) = setup(ChunkCoord::new(-20, 5));
    for mesher in [ChunkMesher::default(), smooth_mesher()] {
        assert_eq!(mesher.build(&chunk, &terrain, &catalog), mesher.build(&chunk, &terrain, &catalog));
    }
}
