//! Alignment and distribution geometry.

use crate::object::ObjectId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// How a set of objects is lined up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignMode {
    /// Smallest x.
    Left,
    /// Largest x.
    Right,
    /// Smallest y.
    Top,
    /// Largest y.
    Bottom,
    /// Midpoint of the horizontal extent.
    Center,
    /// Midpoint of the vertical extent.
    Middle,
    /// Even horizontal spacing between the outermost objects.
    #[serde(rename = "distribute-h")]
    DistributeHorizontal,
    /// Even vertical spacing between the outermost objects.
    #[serde(rename = "distribute-v")]
    DistributeVertical,
    /// On a circle around the centroid, keeping each object's angle.
    Circular,
}

impl AlignMode {
    /// History description for this alignment.
    pub fn description(self) -> &'static str {
        match self {
            AlignMode::Left => "Align left",
            AlignMode::Right => "Align right",
            AlignMode::Top => "Align top",
            AlignMode::Bottom => "Align bottom",
            AlignMode::Center => "Align center",
            AlignMode::Middle => "Align middle",
            AlignMode::DistributeHorizontal => "Distribute horizontally",
            AlignMode::DistributeVertical => "Distribute vertically",
            AlignMode::Circular => "Arrange in circle",
        }
    }
}

/// Result of an alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// New position for each input object, in input order.
    pub positions: Vec<(ObjectId, Point)>,
    /// Center and radius, for circular alignment.
    pub circle: Option<(Point, f64)>,
}

/// Compute aligned positions for `objects`.
///
/// Returns None for fewer than two objects.
pub fn align(objects: &[(ObjectId, Point)], mode: AlignMode, min_circle_radius: f64) -> Option<Alignment> {
    if objects.len() < 2 {
        return None;
    }

    let xs = objects.iter().map(|(_, p)| p.x);
    let ys = objects.iter().map(|(_, p)| p.y);
    let (min_x, max_x) = extent(xs);
    let (min_y, max_y) = extent(ys);

    let set_x = |x: f64| -> Vec<(ObjectId, Point)> {
        objects.iter().map(|&(id, p)| (id, Point::new(x, p.y))).collect()
    };
    let set_y = |y: f64| -> Vec<(ObjectId, Point)> {
        objects.iter().map(|&(id, p)| (id, Point::new(p.x, y))).collect()
    };

    let positions: Vec<(ObjectId, Point)> = match mode {
        AlignMode::Left => set_x(min_x),
        AlignMode::Right => set_x(max_x),
        AlignMode::Top => set_y(min_y),
        AlignMode::Bottom => set_y(max_y),
        AlignMode::Center => set_x((min_x + max_x) / 2.0),
        AlignMode::Middle => set_y((min_y + max_y) / 2.0),
        AlignMode::DistributeHorizontal => {
            let xs = distribute(objects.iter().map(|(_, p)| p.x).collect());
            objects
                .iter()
                .zip(xs)
                .map(|(&(id, p), x)| (id, Point::new(x, p.y)))
                .collect()
        }
        AlignMode::DistributeVertical => {
            let ys = distribute(objects.iter().map(|(_, p)| p.y).collect());
            objects
                .iter()
                .zip(ys)
                .map(|(&(id, p), y)| (id, Point::new(p.x, y)))
                .collect()
        }
        AlignMode::Circular => return Some(arrange_in_circle(objects, min_circle_radius)),
    };

    Some(Alignment {
        positions,
        circle: None,
    })
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Evenly space coordinates between their extremes, assigned by sorted rank.
/// Equal coordinates keep their input order.
fn distribute(coords: Vec<f64>) -> Vec<f64> {
    let n = coords.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| coords[a].total_cmp(&coords[b]));

    let min = coords[order[0]];
    let max = coords[order[n - 1]];
    let step = (max - min) / (n - 1) as f64;

    let mut result = coords;
    for (rank, &idx) in order.iter().enumerate() {
        result[idx] = min + step * rank as f64;
    }
    result
}

fn arrange_in_circle(objects: &[(ObjectId, Point)], min_radius: f64) -> Alignment {
    let points: Vec<Point> = objects.iter().map(|(_, p)| *p).collect();
    let center = centroid(&points).unwrap_or(Point::ZERO);
    let radius = points
        .iter()
        .map(|p| (*p - center).hypot())
        .fold(0.0, f64::max)
        .max(min_radius);

    let positions = objects
        .iter()
        .map(|&(id, p)| (id, point_on_circle(center, radius, angle_around(center, p))))
        .collect();

    Alignment {
        positions,
        circle: Some((center, radius)),
    }
}

/// Average of the given points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

/// Angle of `point` around `center`, in radians.
pub fn angle_around(center: Point, point: Point) -> f64 {
    (point - center).atan2()
}

/// Point at `angle` radians on the circle of `radius` around `center`.
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}
