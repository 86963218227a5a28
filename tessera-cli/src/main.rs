//! Tessera: tessellate box scenes into triangle meshes.
//!
//! Reads a JSON scene of styled boxes, generates their background and
//! border geometry, and reports what was produced.
//!
//! - `tessera scene.json`              # Print mesh statistics
//! - `tessera --json scene.json`       # Dump the mesh as JSON
//! - `tessera -o out.png scene.json`   # Rasterize with the software renderer

mod build;
mod scene;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tessera_common::warning::clear_warnings;
use tessera_geometry::{Geometry, MeshCache, Vector2f};
use tessera_render::SoftwareRenderer;

use build::{SceneMesh, build_scene};
use scene::Scene;

/// Tessera: background and border tessellation for box scenes
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print mesh statistics
    tessera demos/panels.json

    # Dump the generated mesh
    tessera --json demos/panels.json

    # Render to a PNG
    tessera -o panels.png demos/panels.json

    # Render with a custom canvas size
    tessera -o panels.png --width 1024 --height 768 demos/panels.json
"#)]
struct Cli {
    /// Path to the scene file
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Print the generated mesh as JSON instead of statistics
    #[arg(long)]
    json: bool,

    /// Print statistics even when rendering or dumping JSON
    #[arg(long)]
    stats: bool,

    /// Rasterize the scene and save it to the specified file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Canvas width (overrides the scene)
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (overrides the scene)
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    clear_warnings();

    let mut scene = Scene::from_path(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;
    if let Some(width) = cli.width {
        scene.width = width;
    }
    if let Some(height) = cli.height {
        scene.height = height;
    }

    let mut cache = MeshCache::new();
    let built = build_scene(&scene, &mut cache);

    if cli.json {
        let json = serde_json::to_string_pretty(&built.mesh).context("failed to serialize mesh")?;
        println!("{json}");
    }

    if let Some(ref output_path) = cli.output {
        render_scene(&scene, &built, output_path)?;
        println!("{} {}", "Rendered to:".green(), output_path.display());
    }

    if cli.stats || (!cli.json && cli.output.is_none()) {
        print_stats(&scene, &built, &cache);
    }

    Ok(())
}

/// Rasterize the scene mesh and write it to `output_path`.
fn render_scene(scene: &Scene, built: &SceneMesh, output_path: &Path) -> anyhow::Result<()> {
    let mut renderer = SoftwareRenderer::new(scene.width, scene.height, scene.clear);
    let mut geometry = Geometry::new(built.mesh.clone());
    if !geometry.render(&mut renderer, Vector2f::ZERO) && !built.mesh.is_empty() {
        anyhow::bail!("renderer refused to compile the scene mesh");
    }
    geometry.release(&mut renderer);

    renderer
        .save(output_path)
        .with_context(|| format!("failed to save {}", output_path.display()))?;
    Ok(())
}

fn print_stats(scene: &Scene, built: &SceneMesh, cache: &MeshCache) {
    let (hits, misses) = cache.stats();
    println!("{}", "=== Scene ===".bold());
    println!("canvas     {}x{}", scene.width, scene.height);
    println!("boxes      {}", scene.boxes.len());

    println!("\n{}", "=== Mesh ===".bold());
    println!("vertices   {}", built.mesh.vertices.len().cyan());
    println!("indices    {}", built.mesh.indices.len().cyan());
    println!("triangles  {}", built.mesh.triangle_count().cyan());

    println!("\n{}", "=== Boxes ===".bold());
    for (index, count) in built.box_vertices.iter().enumerate() {
        if *count == 0 {
            println!("  #{index}: {}", "nothing to draw".dimmed());
        } else {
            println!("  #{index}: {count} vertices");
        }
    }

    println!("\n{}", "=== Cache ===".bold());
    println!("hits       {}", hits.green());
    println!("misses     {}", misses.yellow());
}
