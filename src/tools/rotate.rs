//! Provides the `rotate` operator: quarter-turn rotation of a whole model.
//!
//! Geometry is rotated about a pivot, and because an element's faces are
//! named by world direction, their contents are carried round the face cycle
//! of the rotation axis. The two faces parallel to the axis stay put and
//! accumulate the turn in their own texture `rotation`.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::rotate::RotateArgs;
//! use modeltools::tools::Transform;
//!
//! let mut model = json!({ "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16] } ] });
//! let args: RotateArgs = "90,y".parse().unwrap();
//! args.transform(&mut model).unwrap();
//! assert_eq!(model["elements"][0]["to"], json!([16, 16, 16]));
//! ```

use std::str::FromStr;

use glam::DVec3;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::shared::cube::{infer_face_uvs, Axis, FaceName, UvMode};
use super::shared::json::{expect_object_mut, for_each_element};
use super::shared::rotation::{rotate_about_pivot, rotate_box, QuarterTurn, CANVAS_CENTER};
use super::{parse_vec3_arg, ToolError, ToolResult, Transform};

/// Argument grammar accepted by [`RotateArgs::from_str`].
pub const VALUE_PATTERN: &str = "<angle>,<axis>[,<originX>,<originY>,<originZ>]";

/// Arguments of the `rotate` operator.
#[derive(Clone, Debug, PartialEq)]
pub struct RotateArgs {
    /// Counter-clockwise angle in degrees; always a multiple of 90.
    pub angle: i32,
    /// The rotation axis.
    pub axis: Axis,
    /// A point on the rotation axis; defaults to the canvas centre.
    pub pivot: DVec3,
}

impl RotateArgs {
    /// Creates arguments rotating about `axis` through the canvas centre.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArgument`] if `angle` is not a multiple of 90.
    pub fn new(angle: i32, axis: Axis) -> ToolResult<Self> {
        QuarterTurn::from_degrees(angle)?;
        Ok(Self {
            angle,
            axis,
            pivot: CANVAS_CENTER,
        })
    }

    /// Uses `pivot` instead of the canvas centre.
    pub fn with_pivot(mut self, pivot: DVec3) -> Self {
        self.pivot = pivot;
        self
    }
}

impl FromStr for RotateArgs {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ',').collect();
        if parts.len() < 2 {
            return Err(ToolError::InvalidArgument(format!(
                "`{s}` does not match {VALUE_PATTERN}"
            )));
        }

        let angle = parts[0].trim().parse::<i32>().map_err(|_| {
            ToolError::InvalidArgument(format!("angle `{}` is not an integer", parts[0]))
        })?;
        let args = Self::new(angle, parts[1].parse()?)?;

        match parts.get(2) {
            Some(pivot) => Ok(args.with_pivot(parse_vec3_arg(pivot, "origin")?)),
            None => Ok(args),
        }
    }
}

impl Transform for RotateArgs {
    fn transform(&self, document: &mut Value) -> ToolResult<()> {
        let turn = QuarterTurn::from_degrees(self.angle)?;
        tracing::debug!(
            angle = self.angle,
            axis = %self.axis,
            pivot = ?self.pivot,
            "rotating model"
        );

        for_each_element(document, |index, mut element| {
            let from = element.from()?;
            let to = element.to()?;

            if let Some(faces) = element.faces_mut()? {
                infer_face_uvs(faces, from, to, UvMode::FlippedSides)?;
                rotate_faces(faces, self.axis, turn)?;
            }

            let (new_from, new_to) = rotate_box(from, to, self.pivot, self.axis, turn);
            tracing::debug!(index, ?from, ?to, ?new_from, ?new_to, "rotated element");
            element.set_from(new_from)?;
            element.set_to(new_to)?;

            element.map_rotation_origin(|origin| {
                rotate_about_pivot(origin, self.pivot, self.axis, turn)
            })
        })
    }
}

/// Carries face contents and cull faces round the face cycle of `axis`.
///
/// The face at cycle position `i` moves to position `i + steps`; faces
/// parallel to the axis get the turn added to their texture rotation.
fn rotate_faces(faces: &mut Map<String, Value>, axis: Axis, turn: QuarterTurn) -> ToolResult<()> {
    let cycle = axis.face_cycle();
    let steps = turn.steps();
    let shifted = |name: FaceName| {
        cycle
            .iter()
            .position(|f| *f == name)
            .map(|i| cycle[(i + steps) % cycle.len()])
    };

    for (key, face) in faces.iter_mut() {
        let Some(name) = FaceName::from_key(key) else {
            continue;
        };
        let face = expect_object_mut(face, &format!("face `{key}`"))?;

        if let Some(cull) = face
            .get("cullface")
            .and_then(|cull| FaceName::deserialize(cull).ok())
            .and_then(shifted)
        {
            face.insert("cullface".to_string(), Value::from(cull.as_str()));
        }

        if !cycle.contains(&name) {
            let previous = face
                .get("rotation")
                .and_then(Value::as_f64)
                .map(|r| r.round() as i64);
            let rotation = (previous.unwrap_or(0) + (steps as i64) * 90).rem_euclid(360);
            if rotation != 0 {
                face.insert("rotation".to_string(), Value::from(rotation));
            } else if previous.is_some_and(|r| r != 0) {
                // back to the default orientation
                face.shift_remove("rotation");
            }
        }
    }

    let mut moved: Vec<(FaceName, Value)> = cycle
        .iter()
        .filter_map(|name| {
            let target = shifted(*name)?;
            faces.get(name.as_str()).map(|face| (target, face.clone()))
        })
        .collect();

    let mut rebuilt = Map::new();
    for (key, value) in std::mem::take(faces) {
        match FaceName::from_key(&key) {
            Some(name) if cycle.contains(&name) => {
                if let Some(i) = moved.iter().position(|(target, _)| *target == name) {
                    rebuilt.insert(key, moved.swap_remove(i).1);
                }
            }
            _ => {
                rebuilt.insert(key, value);
            }
        }
    }
    for (target, value) in moved {
        rebuilt.insert(target.as_str().to_string(), value);
    }
    *faces = rebuilt;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labelled_cube() -> Value {
        json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [16, 16, 16],
                "faces": {
                    "down":  { "uv": [0, 0, 16, 16], "texture": "#down", "cullface": "down" },
                    "up":    { "uv": [0, 0, 16, 16], "texture": "#up", "cullface": "up" },
                    "north": { "uv": [0, 0, 16, 16], "texture": "#north", "cullface": "north" },
                    "south": { "uv": [0, 0, 16, 16], "texture": "#south", "cullface": "south" },
                    "west":  { "uv": [0, 0, 16, 16], "texture": "#west", "cullface": "west" },
                    "east":  { "uv": [0, 0, 16, 16], "texture": "#east", "cullface": "east" }
                }
            } ]
        })
    }

    #[test]
    fn test_parse_args() {
        let args: RotateArgs = "90,y".parse().unwrap();
        assert_eq!(args.angle, 90);
        assert_eq!(args.axis, Axis::Y);
        assert_eq!(args.pivot, CANVAS_CENTER);

        let args: RotateArgs = "-180,X,0,0,0".parse().unwrap();
        assert_eq!(args.axis, Axis::X);
        assert_eq!(args.pivot, DVec3::ZERO);

        assert!(matches!(
            "45,y".parse::<RotateArgs>(),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!(matches!(
            "90,w".parse::<RotateArgs>(),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!("90".parse::<RotateArgs>().is_err());
        assert!("90,y,1,2".parse::<RotateArgs>().is_err());
        assert!("ninety,y".parse::<RotateArgs>().is_err());
    }

    #[test]
    fn test_full_cube_is_invariant() {
        let mut model = labelled_cube();
        RotateArgs::new(90, Axis::Y)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        assert_eq!(model["elements"][0]["from"], json!([0, 0, 0]));
        assert_eq!(model["elements"][0]["to"], json!([16, 16, 16]));
    }

    #[test]
    fn test_face_contents_move_forward_along_cycle() {
        let mut model = labelled_cube();
        RotateArgs::new(90, Axis::Y)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        let faces = &model["elements"][0]["faces"];

        // Y cycle: up -> east -> down -> west -> up
        assert_eq!(faces["east"]["texture"], json!("#up"));
        assert_eq!(faces["down"]["texture"], json!("#east"));
        assert_eq!(faces["west"]["texture"], json!("#down"));
        assert_eq!(faces["up"]["texture"], json!("#west"));
        // cull faces travel with the same shift
        assert_eq!(faces["east"]["cullface"], json!("east"));
        assert_eq!(faces["up"]["cullface"], json!("up"));

        // parallel faces keep their content and accumulate rotation
        assert_eq!(faces["north"]["texture"], json!("#north"));
        assert_eq!(faces["north"]["rotation"], json!(90));
        assert_eq!(faces["south"]["rotation"], json!(90));
        assert_eq!(faces["north"]["cullface"], json!("north"));

        // key order is preserved
        let keys: Vec<&String> = faces.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["down", "up", "north", "south", "west", "east"]);
    }

    #[test]
    fn test_four_quarter_turns_round_trip() {
        let original = json!({
            "elements": [ {
                "from": [2, 0, 5],
                "to": [7, 3, 16],
                "rotation": { "origin": [1, 2, 3], "axis": "y", "angle": 22.5 },
                "faces": {
                    "north": { "uv": [0, 0, 5, 3], "texture": "#a", "rotation": 180 },
                    "up": { "uv": [1, 1, 2, 2], "texture": "#b" },
                    "east": { "uv": [3, 3, 4, 4], "texture": "#c", "cullface": "up" }
                }
            } ]
        });
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut model = original.clone();
            let args = RotateArgs::new(90, axis).unwrap();
            for _ in 0..4 {
                args.transform(&mut model).unwrap();
            }
            let element = &model["elements"][0];
            assert_eq!(element["from"], original["elements"][0]["from"]);
            assert_eq!(element["to"], original["elements"][0]["to"]);
            assert_eq!(element["rotation"], original["elements"][0]["rotation"]);
            for face in ["north", "up", "east"] {
                assert_eq!(
                    element["faces"][face]["texture"],
                    original["elements"][0]["faces"][face]["texture"]
                );
                assert_eq!(
                    element["faces"][face]["cullface"],
                    original["elements"][0]["faces"][face]["cullface"]
                );
            }
            assert_eq!(element["faces"]["north"]["rotation"], json!(180));
        }
    }

    #[test]
    fn test_four_quarter_turns_restore_whole_document() {
        let mut model = labelled_cube();
        let args = RotateArgs::new(90, Axis::Y).unwrap();
        for _ in 0..4 {
            args.transform(&mut model).unwrap();
        }
        assert_eq!(model, labelled_cube());
        assert!(model["elements"][0]["faces"]["north"].get("rotation").is_none());
    }

    #[test]
    fn test_parallel_face_rotation_cleared_at_zero() {
        // east and west are parallel to x
        let mut model = json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [16, 16, 16],
                "faces": {
                    "east": { "uv": [0, 0, 16, 16], "texture": "#e", "rotation": 270 },
                    "west": { "uv": [0, 0, 16, 16], "texture": "#w", "rotation": 0 }
                }
            } ]
        });
        RotateArgs::new(90, Axis::X)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        let faces = &model["elements"][0]["faces"];
        assert!(faces["east"].get("rotation").is_none());
        assert_eq!(faces["west"]["rotation"], json!(90));
    }

    #[test]
    fn test_negative_angle_matches_positive_equivalent() {
        let source = json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [4, 2, 16],
                "rotation": { "origin": [1, 2, 3], "axis": "x", "angle": 22.5 },
                "faces": {
                    "north": { "texture": "#n", "rotation": 180 },
                    "up": { "texture": "#u", "cullface": "up" },
                    "east": { "texture": "#e" }
                }
            } ]
        });

        let mut negative = source.clone();
        let mut positive = source.clone();
        RotateArgs::new(-90, Axis::Y)
            .unwrap()
            .transform(&mut negative)
            .unwrap();
        RotateArgs::new(270, Axis::Y)
            .unwrap()
            .transform(&mut positive)
            .unwrap();
        assert_eq!(negative, positive);

        let faces = &negative["elements"][0]["faces"];
        // Y cycle: three steps forward carries up to west and east to up
        assert_eq!(faces["west"]["texture"], json!("#u"));
        assert_eq!(faces["west"]["cullface"], json!("west"));
        assert_eq!(faces["up"]["texture"], json!("#e"));
        // (180 + 270) mod 360
        assert_eq!(faces["north"]["rotation"], json!(90));
    }

    #[test]
    fn test_unknown_cullface_is_kept() {
        let mut model = json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [16, 16, 16],
                "faces": {
                    "north": { "uv": [0, 0, 16, 16], "texture": "#n", "cullface": "bottom" },
                    "up": { "uv": [0, 0, 16, 16], "texture": "#u", "cullface": 3 }
                }
            } ]
        });
        RotateArgs::new(90, Axis::Y)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        let faces = &model["elements"][0]["faces"];
        assert_eq!(faces["north"]["cullface"], json!("bottom"));
        assert_eq!(faces["east"]["cullface"], json!(3));
    }

    #[test]
    fn test_absent_face_leaves_gap() {
        let mut model = json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [16, 16, 16],
                "faces": { "up": { "uv": [0, 0, 16, 16], "texture": "#top" } }
            } ]
        });
        RotateArgs::new(90, Axis::X)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        let faces = model["elements"][0]["faces"].as_object().unwrap();
        // X cycle: up -> north
        assert_eq!(faces.len(), 1);
        assert_eq!(faces["north"]["texture"], json!("#top"));
    }

    #[test]
    fn test_off_center_box_and_flipped_uv() {
        let mut model = json!({
            "elements": [ {
                "from": [0, 0, 0],
                "to": [4, 2, 16],
                "rotation": { "origin": [0, 0, 0], "axis": "x", "angle": 45 },
                "faces": { "north": { "texture": "#n" } }
            } ]
        });
        RotateArgs::new(90, Axis::Z)
            .unwrap()
            .transform(&mut model)
            .unwrap();
        let element = &model["elements"][0];
        // corners (0,0) and (4,2) in the xy plane turn to (16,0) and (14,4)
        assert_eq!(element["from"], json!([14, 0, 0]));
        assert_eq!(element["to"], json!([16, 4, 16]));
        assert_eq!(element["rotation"]["origin"], json!([16, 0, 0]));
        // north moves to west with its uv inferred from the unrotated bounds
        assert_eq!(element["faces"]["west"]["uv"], json!([0, 14, 4, 16]));
        assert!(element["faces"].get("north").is_none());
    }

    #[test]
    fn test_missing_from_is_malformed() {
        let mut model = json!({ "elements": [ { "to": [1, 1, 1] } ] });
        let result = RotateArgs::new(90, Axis::Y).unwrap().transform(&mut model);
        assert!(matches!(result, Err(ToolError::MalformedDocument(_))));
    }
}
