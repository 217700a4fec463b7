//! Board object definitions.

pub mod kinds;
mod patch;

pub use patch::{ColorPatch, FlagsPatch, ObjectPatch};

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for board objects.
pub type ObjectId = Uuid;

/// Default scale, in percent.
pub const DEFAULT_SIZE: f64 = 100.0;

/// Object color with a percentage opacity (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: u8,
}

impl BoardColor {
    /// Fully opaque.
    pub const MAX_OPACITY: u8 = 100;

    pub fn new(r: u8, g: u8, b: u8, opacity: u8) -> Self {
        Self { r, g, b, opacity }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, Self::MAX_OPACITY)
    }

    /// Opacity expressed as an 8-bit alpha channel.
    pub fn alpha(&self) -> u8 {
        let opacity = u16::from(self.opacity.min(Self::MAX_OPACITY));
        (opacity * 255 / u16::from(Self::MAX_OPACITY)) as u8
    }
}

impl Default for BoardColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<BoardColor> for Color {
    fn from(color: BoardColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.alpha())
    }
}

/// Display and editing flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFlags {
    pub visible: bool,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Locked objects are skipped by drag moves.
    pub locked: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            visible: true,
            flip_horizontal: false,
            flip_vertical: false,
            locked: false,
        }
    }
}

/// A single placed element on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardObject {
    /// Stable identifier, assigned when the object is created.
    pub id: ObjectId,
    /// Visual/semantic type of the object (see [`kinds`]).
    pub object_id: u32,
    /// Center position in board coordinates.
    pub position: Point,
    /// Rotation in degrees. Not normalized.
    pub rotation: f64,
    /// Scale in percent.
    pub size: f64,
    pub color: BoardColor,
    pub flags: ObjectFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param2: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param3: Option<i32>,
}

impl BoardObject {
    /// Create an object of the given type at a position, with the type's default parameters.
    pub fn new(object_id: u32, position: Point) -> Self {
        let defaults = kinds::default_params(object_id);
        Self {
            id: Uuid::new_v4(),
            object_id,
            position,
            rotation: 0.0,
            size: DEFAULT_SIZE,
            color: BoardColor::default(),
            flags: ObjectFlags::default(),
            text: kinds::is_text(object_id).then(String::new),
            param1: defaults[0],
            param2: defaults[1],
            param3: defaults[2],
        }
    }

    /// Copy this object under a freshly generated id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn is_locked(&self) -> bool {
        self.flags.locked
    }

    /// Rotation normalized to `[0, 360)` for display.
    pub fn display_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_object_defaults() {
        let obj = BoardObject::new(kinds::CONE_AOE, Point::new(10.0, 20.0));
        assert_eq!(obj.size, DEFAULT_SIZE);
        assert!(obj.flags.visible);
        assert!(!obj.flags.locked);
        assert_eq!(obj.param1, Some(90));
        assert!(obj.text.is_none());
    }

    #[test]
    fn test_text_object_has_text() {
        let obj = BoardObject::new(kinds::TEXT, Point::ZERO);
        assert_eq!(obj.text.as_deref(), Some(""));
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let obj = BoardObject::new(kinds::LINE, Point::new(5.0, 5.0));
        let copy = obj.duplicate();
        assert_ne!(obj.id, copy.id);
        assert_eq!(obj.position, copy.position);
        assert_eq!(obj.param1, copy.param1);
    }

    #[test]
    fn test_display_rotation() {
        let mut obj = BoardObject::new(1, Point::ZERO);
        obj.rotation = -90.0;
        assert!((obj.display_rotation() - 270.0).abs() < f64::EPSILON);
        obj.rotation = 725.0;
        assert!((obj.display_rotation() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(BoardColor::new(0, 0, 0, 100).alpha(), 255);
        assert_eq!(BoardColor::new(0, 0, 0, 0).alpha(), 0);
        assert_eq!(BoardColor::new(0, 0, 0, 50).alpha(), 127);
        // Out-of-range opacity is clamped.
        assert_eq!(BoardColor::new(0, 0, 0, 200).alpha(), 255);
    }

    #[test]
    fn test_serde_field_names() {
        let obj = BoardObject::new(kinds::TEXT, Point::new(1.0, 2.0));
        let json = serde_json::to_value(&obj).unwrap();
        assert!(json.get("objectId").is_some());
        assert!(json["flags"].get("flipHorizontal").is_some());
        assert_eq!(json["position"]["x"], 1.0);
        let back: BoardObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, obj);
    }
}
