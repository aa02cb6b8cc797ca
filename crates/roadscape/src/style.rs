//! Display attributes carried alongside generated geometry.
//!
//! The core never draws; styles travel with polygons so a renderer can.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: String,
    pub stroke: String,
    pub line_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "rgba(0, 0, 255, 0.3)".into(),
            stroke: "blue".into(),
            line_width: 2.0,
        }
    }
}

impl Style {
    pub fn road() -> Self {
        Self {
            fill: "#BBB".into(),
            stroke: "#BBB".into(),
            line_width: 15.0,
        }
    }

    pub fn building() -> Self {
        Self {
            fill: "white".into(),
            stroke: "#AAA".into(),
            line_width: 2.0,
        }
    }

    /// Canopy level shade: darker green at the base, lighter toward the top.
    pub fn canopy(t: f64) -> Self {
        let g = crate::geom2::lerp(50.0, 200.0, t.clamp(0.0, 1.0)).round() as u8;
        Self {
            fill: format!("rgb(30,{g},70)"),
            stroke: "rgba(0,0,0,0)".into(),
            line_width: 0.0,
        }
    }
}

/// Point marker display state used by graph editors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub size: f64,
    pub color: String,
    pub outlined: bool,
    pub filled: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 18.0,
            color: "black".into(),
            outlined: false,
            filled: false,
        }
    }
}
