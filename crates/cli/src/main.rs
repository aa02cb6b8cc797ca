use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roadscape::api::{grid_graph, Graph, World, WorldCfg};
use roadscape::Vec2;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Generate road, building and tree geometry from a road graph")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build a world from a graph document and write its geometry as JSON
    Generate {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Partial `WorldCfg` JSON; missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides the seed from the config
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        view_x: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        view_y: f64,
    },
    /// Write a grid road graph document
    Demo {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 3)]
        rows: usize,
        #[arg(long, default_value_t = 3)]
        cols: usize,
        #[arg(long, default_value_t = 600.0)]
        spacing: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate {
            graph,
            out,
            config,
            seed,
            view_x,
            view_y,
        } => generate(&graph, &out, config.as_deref(), seed, Vec2::new(view_x, view_y)),
        Action::Demo {
            out,
            rows,
            cols,
            spacing,
        } => demo(&out, rows, cols, spacing),
        Action::Report => report(),
    }
}

fn load_cfg(path: Option<&Path>, seed: Option<u64>) -> Result<WorldCfg> {
    let mut cfg = match path {
        Some(p) => {
            let text =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            WorldCfg::from_json(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        None => WorldCfg::default(),
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    Ok(cfg)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn generate(
    graph_path: &Path,
    out: &Path,
    config: Option<&Path>,
    seed: Option<u64>,
    view_point: Vec2<f64>,
) -> Result<()> {
    let cfg = load_cfg(config, seed)?;
    let text = std::fs::read_to_string(graph_path)
        .with_context(|| format!("reading {}", graph_path.display()))?;
    let graph =
        Graph::from_json(&text).with_context(|| format!("parsing {}", graph_path.display()))?;
    tracing::info!(
        graph = %graph_path.display(),
        points = graph.points().len(),
        segments = graph.edges().len(),
        seed = cfg.seed,
        "generate"
    );

    let mut world = World::new(graph, cfg)?;
    world.set_view_point(view_point);
    let report = world.scatter_report();
    tracing::info!(
        borders = world.road_borders().len(),
        buildings = world.buildings().len(),
        trees = world.trees().len(),
        "world ready"
    );

    ensure_parent(out)?;
    let doc = export::world_to_json(&world);
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(serde_json::json!({
        "graph": graph_path.to_string_lossy(),
        "config": serde_json::to_value(world.cfg())?,
        "view_point": [view_point.x, view_point.y],
        "scatter": {
            "requested": report.requested,
            "placed": report.placed,
            "attempts": report.attempts,
        },
    }));
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote world");
    Ok(())
}

fn demo(out: &Path, rows: usize, cols: usize, spacing: f64) -> Result<()> {
    tracing::info!(rows, cols, spacing, "demo");
    let graph = grid_graph(rows, cols, spacing);
    ensure_parent(out)?;
    std::fs::write(out, graph.to_json()?).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": roadscape::VERSION,
        "defaults": serde_json::to_value(WorldCfg::default())?,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
