//! Generate a small grid town and print what came out.
//!
//! Usage:
//!   cargo run -p roadscape --example grid_town -- [rows] [cols] [seed]
//!
//! Prints border, building and tree counts, then moves one intersection and
//! shows that `update` regenerates exactly once.

use roadscape::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let rows = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let cols = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);

    let cfg = WorldCfg {
        seed,
        ..WorldCfg::default()
    };
    let mut world = World::new(roadscape::api::grid_graph(rows, cols, 600.0), cfg).unwrap();
    print_summary("initial", &world);

    let mut clock = TimeStep::new(0.0);
    clock.update(16.0);
    println!("update without edits: regenerated={}", world.update(&clock));

    world.graph_mut().move_point(0, Vec2::new(-150.0, -100.0));
    clock.update(32.0);
    println!("update after move: regenerated={}", world.update(&clock));
    print_summary("moved", &world);
}

fn print_summary(label: &str, world: &World) {
    let report = world.scatter_report();
    println!(
        "{label}: roads={}, borders={}, buildings={}, trees={}/{} ({} draws)",
        world.envelopes().len(),
        world.road_borders().len(),
        world.buildings().len(),
        report.placed,
        report.requested,
        report.attempts
    );
}
