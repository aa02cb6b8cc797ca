//! JSON rendering of a generated world.
//!
//! Layout: `{ view_point, envelopes, road_borders, items, scatter }` where
//! `items` is in painter's order (far first) and each polygon is a list of
//! `{x, y}` points.

use roadscape::api::{Building, Item, Polygon, Segment, Style, Tree, World, XY};
use roadscape::Vec2;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct Shape<'a> {
    points: Vec<XY>,
    style: &'a Style,
}

fn xy(p: Vec2<f64>) -> XY {
    XY::from(p)
}

fn points(poly: &Polygon) -> Vec<XY> {
    poly.points().iter().copied().map(xy).collect()
}

fn segment(s: &Segment) -> Value {
    json!({ "from": xy(s.from), "to": xy(s.to) })
}

fn building(b: &Building) -> Value {
    let base = Shape {
        points: points(b.base()),
        style: &b.style,
    };
    let ceiling = Shape {
        points: points(b.ceiling()),
        style: &b.style,
    };
    let sides: Vec<Vec<XY>> = b.sides().iter().map(points).collect();
    json!({
        "kind": "building",
        "height": b.height(),
        "base": base,
        "sides": sides,
        "ceiling": ceiling,
    })
}

fn tree(t: &Tree) -> Value {
    let levels: Vec<Value> = t
        .levels()
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let style = t.level_style(i);
            json!({ "points": points(level), "style": style })
        })
        .collect();
    json!({
        "kind": "tree",
        "position": xy(t.position()),
        "size": t.size(),
        "levels": levels,
    })
}

pub fn world_to_json(world: &World) -> Value {
    let envelopes: Vec<Value> = world
        .envelopes()
        .iter()
        .map(|e| {
            json!({
                "skeleton": segment(e.skeleton()),
                "width": e.width(),
                "points": points(e.polygon()),
                "style": &e.style,
            })
        })
        .collect();
    let items: Vec<Value> = world
        .items_back_to_front()
        .into_iter()
        .map(|item| match item {
            Item::Building(b) => building(b),
            Item::Tree(t) => tree(t),
        })
        .collect();
    let report = world.scatter_report();
    json!({
        "view_point": xy(world.view_point()),
        "envelopes": envelopes,
        "road_borders": world.road_borders().iter().map(segment).collect::<Vec<_>>(),
        "items": items,
        "scatter": {
            "requested": report.requested,
            "placed": report.placed,
            "attempts": report.attempts,
        },
    })
}
