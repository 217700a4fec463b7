//! Field-level property patches.
//!
//! Patches merge into nested records field by field, so a patch touching only
//! `color.opacity` leaves the other color channels as they were.

use super::{BoardColor, BoardObject, ObjectFlags};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Partial update for [`ObjectFlags`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_horizontal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_vertical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl FlagsPatch {
    pub fn apply(&self, flags: ObjectFlags) -> ObjectFlags {
        ObjectFlags {
            visible: self.visible.unwrap_or(flags.visible),
            flip_horizontal: self.flip_horizontal.unwrap_or(flags.flip_horizontal),
            flip_vertical: self.flip_vertical.unwrap_or(flags.flip_vertical),
            locked: self.locked.unwrap_or(flags.locked),
        }
    }
}

/// Partial update for [`BoardColor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl ColorPatch {
    /// Patch that sets the RGB channels and keeps opacity.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: Some(r),
            g: Some(g),
            b: Some(b),
            opacity: None,
        }
    }

    pub fn apply(&self, color: BoardColor) -> BoardColor {
        BoardColor {
            r: self.r.unwrap_or(color.r),
            g: self.g.unwrap_or(color.g),
            b: self.b.unwrap_or(color.b),
            opacity: self.opacity.unwrap_or(color.opacity),
        }
    }
}

/// Sparse update for a [`BoardObject`]. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param2: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param3: Option<i32>,
}

impl ObjectPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether applying this patch would change `object`.
    pub fn changes(&self, object: &BoardObject) -> bool {
        self.position.is_some_and(|p| p != object.position)
            || self.rotation.is_some_and(|r| r != object.rotation)
            || self.size.is_some_and(|s| s != object.size)
            || self.color.is_some_and(|c| c.apply(object.color) != object.color)
            || self.flags.is_some_and(|f| f.apply(object.flags) != object.flags)
            || self.text.as_ref().is_some_and(|t| object.text.as_ref() != Some(t))
            || self.param1.is_some_and(|p| object.param1 != Some(p))
            || self.param2.is_some_and(|p| object.param2 != Some(p))
            || self.param3.is_some_and(|p| object.param3 != Some(p))
    }

    /// Merge this patch into `object`.
    pub fn apply(&self, object: &mut BoardObject) {
        if let Some(position) = self.position {
            object.position = position;
        }
        if let Some(rotation) = self.rotation {
            object.rotation = rotation;
        }
        if let Some(size) = self.size {
            object.size = size;
        }
        if let Some(color) = self.color {
            object.color = color.apply(object.color);
        }
        if let Some(flags) = self.flags {
            object.flags = flags.apply(object.flags);
        }
        if let Some(text) = &self.text {
            object.text = Some(text.clone());
        }
        if self.param1.is_some() {
            object.param1 = self.param1;
        }
        if self.param2.is_some() {
            object.param2 = self.param2;
        }
        if self.param3.is_some() {
            object.param3 = self.param3;
        }
    }
}
