//! Object type numbers the engine treats specially.
//!
//! Every other type number is an icon with no parameters.

/// Fan-shaped area marker. `param1` is the cone angle in degrees.
pub const CONE_AOE: u32 = 10;
/// Rectangular area marker. `param1` is the length, `param2` the width.
pub const LINE_AOE: u32 = 12;
/// Free line. `param1`/`param2` hold the end point relative to the position.
pub const LINE: u32 = 15;
/// Ring-shaped area marker. `param1` is the arc angle, `param2` the inner radius ×10.
pub const DONUT_AOE: u32 = 17;
/// Text label.
pub const TEXT: u32 = 100;

/// Whether objects of this type carry a text body.
pub fn is_text(object_id: u32) -> bool {
    object_id == TEXT
}

/// Default `param1..param3` for a freshly placed object.
pub fn default_params(object_id: u32) -> [Option<i32>; 3] {
    match object_id {
        CONE_AOE => [Some(90), None, None],
        LINE_AOE => [Some(128), Some(128), None],
        LINE => [Some(64), Some(0), Some(6)],
        DONUT_AOE => [Some(360), Some(500), None],
        _ => [None, None, None],
    }
}
