//! Circular placement mode.
//!
//! Keeps a set of objects on a shared circle while they are dragged. The
//! circle's geometry is session state derived from object positions: it is
//! never stored in history, and is rebuilt from the board after undo/redo.

use crate::align::{angle_around, centroid, point_on_circle};
use crate::board::BoardData;
use crate::object::ObjectId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Active circular constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularMode {
    pub center: Point,
    pub radius: f64,
    pub participating_ids: Vec<ObjectId>,
    /// Angle of each participant around the center, in radians.
    pub object_angles: BTreeMap<ObjectId, f64>,
}

impl CircularMode {
    /// Enter the mode for the objects of `ids` that exist on `board`.
    ///
    /// Each object's angle is read from its current position, so the relative
    /// arrangement around the circle is preserved. Returns None if none of
    /// the ids exist.
    pub fn enter(
        board: &BoardData,
        center: Point,
        radius: f64,
        ids: &[ObjectId],
        min_radius: f64,
    ) -> Option<Self> {
        let participating_ids = board.existing_ids(ids);
        if participating_ids.is_empty() {
            return None;
        }
        let object_angles = participating_ids
            .iter()
            .filter_map(|&id| board.get(id).map(|obj| (id, angle_around(center, obj.position))))
            .collect();
        Some(Self {
            center,
            radius: radius.max(min_radius),
            participating_ids,
            object_angles,
        })
    }

    /// Rebuild the mode from where its participants actually are on `board`.
    ///
    /// The center becomes the centroid of the surviving participants and the
    /// radius their mean distance from it. Returns None if no participant is left.
    pub fn recompute(&self, board: &BoardData, min_radius: f64) -> Option<Self> {
        let participating_ids = board.existing_ids(&self.participating_ids);
        let points: Vec<Point> = participating_ids
            .iter()
            .filter_map(|&id| board.get(id).map(|obj| obj.position))
            .collect();
        let center = centroid(&points)?;
        let mean_distance =
            points.iter().map(|p| (*p - center).hypot()).sum::<f64>() / points.len() as f64;

        let object_angles = participating_ids
            .iter()
            .zip(&points)
            .map(|(&id, &p)| (id, angle_around(center, p)))
            .collect();

        Some(Self {
            center,
            radius: mean_distance.max(min_radius),
            participating_ids,
            object_angles,
        })
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.object_angles.contains_key(&id)
    }

    /// Drop participants that no longer exist. Returns false if none are left.
    pub fn retain_existing(&mut self, board: &BoardData) -> bool {
        self.participating_ids.retain(|&id| board.contains(id));
        self.object_angles.retain(|id, _| board.contains(*id));
        !self.participating_ids.is_empty()
    }

    /// Move the center, translating every participant by the same delta.
    /// Returns whether the center moved.
    pub fn update_center(&mut self, board: &mut BoardData, center: Point) -> bool {
        if center == self.center {
            return false;
        }
        let delta = center - self.center;
        for &id in &self.participating_ids {
            if let Some(obj) = board.get_mut(id) {
                obj.position += delta;
            }
        }
        self.center = center;
        true
    }

    /// Change the radius, re-projecting every participant at its stored angle.
    /// Returns whether any participant moved.
    pub fn update_radius(&mut self, board: &mut BoardData, radius: f64, min_radius: f64) -> bool {
        self.radius = radius.max(min_radius);
        let mut moved = false;
        for (&id, &angle) in &self.object_angles {
            if let Some(obj) = board.get_mut(id) {
                let target = point_on_circle(self.center, self.radius, angle);
                if obj.position != target {
                    obj.position = target;
                    moved = true;
                }
            }
        }
        moved
    }

    /// Slide one participant to a new angle. Returns false if `id` does not participate.
    pub fn move_object(&mut self, board: &mut BoardData, id: ObjectId, angle: f64) -> bool {
        if !self.contains(id) {
            return false;
        }
        let Some(obj) = board.get_mut(id) else {
            return false;
        };
        obj.position = point_on_circle(self.center, self.radius, angle);
        self.object_angles.insert(id, angle);
        true
    }
}
