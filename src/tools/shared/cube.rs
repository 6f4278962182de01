//! Provides cuboid face vocabulary and face-UV inference.
//!
//! A block model element is an axis-aligned box with up to six named faces.
//! This module knows which faces sweep into one another under a quarter turn
//! about each axis, and how to derive a face's default UV rectangle from the
//! element bounds when the model leaves it implicit.
//!
//! # Examples
//! ```
//! use modeltools::tools::shared::cube::{Axis, FaceName};
//!
//! assert_eq!(Axis::Y.face_cycle()[1], FaceName::East);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::json::vec_to_json;
use crate::tools::{ToolError, ToolResult};

/// Side length of the texture canvas in model units.
pub const CANVAS_SIZE: f64 = 16.0;

/// A principal axis.
///
/// # Examples
/// ```
/// use modeltools::tools::shared::cube::Axis;
///
/// let axis: Axis = "Z".parse().unwrap();
/// assert_eq!(axis, Axis::Z);
/// assert!("w".parse::<Axis>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the four faces that rotate into one another about this axis.
    ///
    /// A counter-clockwise quarter turn moves the face at position `i` to
    /// position `i + 1`.
    pub fn face_cycle(&self) -> [FaceName; 4] {
        use FaceName::*;
        match self {
            Axis::X => [Up, North, Down, South],
            Axis::Y => [Up, East, Down, West],
            Axis::Z => [East, North, West, South],
        }
    }
}

impl FromStr for Axis {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(ToolError::InvalidArgument(format!(
                "unknown axis `{other}`, expected x, y or z"
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// One of the six faces of an element.
///
/// Deserializes from its lowercase JSON name, as used by `cullface`.
///
/// # Examples
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
///
/// use modeltools::tools::shared::cube::FaceName;
///
/// assert_eq!(FaceName::from_key("north"), Some(FaceName::North));
/// assert_eq!(FaceName::from_key("top"), None);
/// assert_eq!(FaceName::West.as_str(), "west");
/// assert_eq!(FaceName::deserialize(&json!("east")).ok(), Some(FaceName::East));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceName {
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl FaceName {
    /// All faces, in the order block models conventionally list them.
    pub const ALL: [FaceName; 6] = [
        FaceName::Down,
        FaceName::Up,
        FaceName::North,
        FaceName::South,
        FaceName::West,
        FaceName::East,
    ];

    /// Looks up a face by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.as_str() == key)
    }

    /// Returns the JSON key of this face.
    pub fn as_str(&self) -> &'static str {
        match self {
            FaceName::Up => "up",
            FaceName::Down => "down",
            FaceName::North => "north",
            FaceName::South => "south",
            FaceName::East => "east",
            FaceName::West => "west",
        }
    }

    /// Returns the `(u, v)` coordinate indices this face's texture spans.
    ///
    /// Up/down map x and z, north/south map x and y, east/west map z and y.
    pub fn uv_axes(&self) -> (usize, usize) {
        match self {
            FaceName::Up | FaceName::Down => (0, 2),
            FaceName::North | FaceName::South => (0, 1),
            FaceName::East | FaceName::West => (2, 1),
        }
    }

    /// Whether the face is one of the four vertical sides.
    pub fn is_side(&self) -> bool {
        !matches!(self, FaceName::Up | FaceName::Down)
    }
}

impl fmt::Display for FaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How inferred UVs treat the v axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UvMode {
    /// UVs copied straight from the element bounds.
    Planar,
    /// Side faces read v as `16 - v`, matching the canvas orientation a
    /// rotated element is textured against.
    FlippedSides,
}

/// Computes the default UV rectangle of `face` for an element spanning
/// `from`..`to`.
///
/// # Examples
/// ```
/// use glam::DVec3;
///
/// use modeltools::tools::shared::cube::{default_uv, FaceName, UvMode};
///
/// let from = DVec3::new(2.0, 0.0, 4.0);
/// let to = DVec3::new(14.0, 6.0, 12.0);
/// assert_eq!(default_uv(FaceName::Up, from, to, UvMode::Planar), [2.0, 4.0, 14.0, 12.0]);
/// assert_eq!(
///     default_uv(FaceName::North, from, to, UvMode::FlippedSides),
///     [2.0, 10.0, 14.0, 16.0]
/// );
/// ```
pub fn default_uv(face: FaceName, from: DVec3, to: DVec3, mode: UvMode) -> [f64; 4] {
    let (u, v) = face.uv_axes();
    if mode == UvMode::FlippedSides && face.is_side() {
        [from[u], CANVAS_SIZE - to[v], to[u], CANVAS_SIZE - from[v]]
    } else {
        [from[u], from[v], to[u], to[v]]
    }
}

/// Fills in `uv` for every face of `faces` that lacks one.
///
/// Faces with an explicit `uv` and keys that are not face names are left
/// alone, so running this twice changes nothing the second time.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if a face is not a JSON object.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use serde_json::json;
///
/// use modeltools::tools::shared::cube::{infer_face_uvs, UvMode};
///
/// let mut faces = json!({ "up": { "texture": "#all" } });
/// let faces = faces.as_object_mut().unwrap();
/// infer_face_uvs(faces, DVec3::ZERO, DVec3::splat(16.0), UvMode::Planar).unwrap();
/// assert_eq!(faces["up"]["uv"], json!([0, 0, 16, 16]));
/// ```
pub fn infer_face_uvs(
    faces: &mut Map<String, Value>,
    from: DVec3,
    to: DVec3,
    mode: UvMode,
) -> ToolResult<()> {
    for (key, face) in faces.iter_mut() {
        let Some(name) = FaceName::from_key(key) else {
            continue;
        };
        let face = face.as_object_mut().ok_or_else(|| {
            ToolError::MalformedDocument(format!("face `{key}` is not an object"))
        })?;
        if face.contains_key("uv") {
            continue;
        }

        let uv = default_uv(name, from, to, mode);
        tracing::debug!(face = %name, ?uv, "inferred face uv");
        face.insert("uv".to_string(), vec_to_json(&uv)?);
    }
    Ok(())
}
