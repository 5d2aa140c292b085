//! # Walkthrough
//!
//! Headless run of the world manager: an observer walks east across the
//! world, digs a hole and builds a small pillar, while a second thread
//! plays the renderer and counts the meshes it receives.
//!
//! Usage: `walkthrough [config.toml]`

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use voxelworld::meshing::MeshMode;
use voxelworld::procedural::{BlockCatalog, BlockRegistry};
use voxelworld::shared::{Vec3, BLOCK_SIZE, CHUNK_SIZE_X};
use voxelworld::{ChannelMeshSink, MeshEvent, WorldConfig, WorldManager, WorldResult};

/// Blocks walked per tick.
const STEP_BLOCKS: f32 = 4.0;
/// Number of ticks in the walk.
const TICKS: usize = 64;

fn main() {
    if let Err(err) = run() {
        eprintln!("walkthrough failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> WorldResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    let catalog = Arc::new(BlockRegistry::with_defaults());
    let brick = catalog.id_by_name("Brick").unwrap_or_default();
    let pebble = catalog.id_by_name("Stone_Small").unwrap_or_default();

    println!("=== VOXELWORLD WALKTHROUGH ===");
    println!(
        "render distance {}, {} meshing, {} blocks in catalog",
        config.streaming.render_distance,
        match config.meshing.mode {
            MeshMode::Blocky => "blocky",
            MeshMode::Smooth => "smooth",
        },
        catalog.len()
    );

    let (sink, receiver) = ChannelMeshSink::unbounded();
    let mut world = WorldManager::new(config, catalog, sink)?;

    let renderer = thread::spawn(move || {
        let (mut uploads, mut releases, mut triangles) = (0usize, 0usize, 0usize);
        while let Some(event) = receiver.recv() {
            match event {
                MeshEvent::Upload(upload) => {
                    uploads += 1;
                    triangles += upload.triangle_count();
                }
                MeshEvent::Release(_) => releases += 1,
            }
        }
        (uploads, releases, triangles)
    });

    let start = Instant::now();
    let mut observer = Vec3::new(BLOCK_SIZE * 0.5, BLOCK_SIZE * 0.5, BLOCK_SIZE * 20.0);

    for tick in 0..TICKS {
        let report = world.tick(observer);
        if report.rescanned {
            println!(
                "tick {tick:>3}: chunk {} +{} -{} ({} resident)",
                report.observer_chunk,
                report.loaded,
                report.unloaded,
                world.loaded_chunk_count()
            );
        }

        // Dig under the observer and build next to them every chunk
        if tick % (CHUNK_SIZE_X / STEP_BLOCKS as usize) == 0 {
            let surface = world.terrain().surface_height(
                (observer.x / BLOCK_SIZE).floor() as i32,
                (observer.y / BLOCK_SIZE).floor() as i32,
            );
            let top = Vec3::new(observer.x, observer.y, (surface as f32 - 0.5) * BLOCK_SIZE);
            let above = Vec3::new(observer.x + BLOCK_SIZE, observer.y, (surface as f32 + 0.5) * BLOCK_SIZE);

            let dug = world.remove_block_at(top);
            let built = world.place_large_block_at(above, brick);
            let pebbled = world.place_small_block_at(top, pebble);
            println!("tick {tick:>3}: dig {dug}, build {built}, pebble {pebbled}");
        }

        observer.x += STEP_BLOCKS * BLOCK_SIZE;
    }
    world.flush_remesh_queue();

    let elapsed = start.elapsed();
    let stats = world.stats();
    drop(world);

    let (uploads, releases, triangles) = renderer.join().unwrap_or_default();

    println!();
    println!("=== SUMMARY ===");
    println!("elapsed:        {elapsed:.2?}");
    println!("chunks loaded:  {}", stats.chunks_loaded);
    println!("chunks dropped: {}", stats.chunks_unloaded);
    println!("remeshes:       {}", stats.chunks_remeshed);
    println!("uploads:        {uploads} ({triangles} triangles)");
    println!("releases:       {releases}");
    Ok(())
}
