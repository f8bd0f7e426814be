//! Shape definitions for scene contents.

use super::color::ColorSpec;
use serde::{Deserialize, Serialize};

/// A drawable primitive placed in world space.
///
/// Coordinates are world units with the y axis pointing up. Shapes are drawn
/// in the order they appear in the scene (first shape = bottom layer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle anchored at its bottom-left corner
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: ColorSpec,
        /// Fill the interior instead of stroking the outline
        #[serde(default)]
        fill: bool,
        /// Outline thickness in world units
        #[serde(default = "default_thick")]
        thick: f64,
    },
    /// Ellipse centered at (cx, cy)
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        color: ColorSpec,
        #[serde(default)]
        fill: bool,
        #[serde(default = "default_thick")]
        thick: f64,
    },
    /// Straight line segment
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: ColorSpec,
        #[serde(default = "default_thick")]
        thick: f64,
    },
    /// Open polyline through the listed points
    Polyline {
        points: Vec<[f64; 2]>,
        color: ColorSpec,
        #[serde(default = "default_thick")]
        thick: f64,
    },
}

fn default_thick() -> f64 {
    0.05
}

impl Shape {
    /// Returns the color the shape is drawn with.
    pub fn color(&self) -> &ColorSpec {
        match self {
            Shape::Rect { color, .. }
            | Shape::Ellipse { color, .. }
            | Shape::Line { color, .. }
            | Shape::Polyline { color, .. } => color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_deserialize_from_tagged_tables() {
        #[derive(Deserialize)]
        struct Holder {
            shapes: Vec<Shape>,
        }

        let holder: Holder = toml::from_str(
            r#"
            [[shapes]]
            kind = "rect"
            x = -1.0
            y = -1.0
            w = 2.0
            h = 2.0
            color = "red"
            fill = true

            [[shapes]]
            kind = "polyline"
            points = [[0.0, 0.0], [1.0, 1.0]]
            color = [0, 255, 0]
            "#,
        )
        .unwrap();

        assert_eq!(holder.shapes.len(), 2);
        match &holder.shapes[0] {
            Shape::Rect { fill, thick, .. } => {
                assert!(*fill);
                assert_eq!(*thick, 0.05);
            }
            other => panic!("expected rect, got {other:?}"),
        }
        assert_eq!(holder.shapes[1].color(), &ColorSpec::Rgb([0, 255, 0]));
    }
}
