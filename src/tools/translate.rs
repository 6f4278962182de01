//! Provides the `translate` operator: moving every element by a fixed offset.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::translate::TranslateArgs;
//! use modeltools::tools::Transform;
//!
//! let mut model = json!({ "elements": [ { "from": [0, 0, 0], "to": [1, 1, 1] } ] });
//! let args: TranslateArgs = "0,2,-1".parse().unwrap();
//! args.transform(&mut model).unwrap();
//! assert_eq!(model["elements"][0]["from"], json!([0, 2, -1]));
//! ```

use std::str::FromStr;

use glam::DVec3;
use serde_json::Value;

use super::shared::cube::{infer_face_uvs, UvMode};
use super::shared::json::for_each_element;
use super::shared::rotation::translate;
use super::{parse_vec3_arg, ToolError, ToolResult, Transform};

/// Argument grammar accepted by [`TranslateArgs::from_str`].
pub const VALUE_PATTERN: &str = "<x>,<y>,<z>";

/// Arguments of the `translate` operator.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslateArgs {
    pub offset: DVec3,
}

impl TranslateArgs {
    pub fn new(offset: DVec3) -> Self {
        Self { offset }
    }
}

impl FromStr for TranslateArgs {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(parse_vec3_arg(s, "offset")?))
    }
}

impl Transform for TranslateArgs {
    fn transform(&self, document: &mut Value) -> ToolResult<()> {
        tracing::debug!(offset = ?self.offset, "translating model");

        for_each_element(document, |index, mut element| {
            let from = element.from()?;
            let to = element.to()?;

            // pin uvs before the bounds move
            if let Some(faces) = element.faces_mut()? {
                infer_face_uvs(faces, from, to, UvMode::Planar)?;
            }

            let new_from = translate(from, self.offset);
            let new_to = translate(to, self.offset);
            tracing::debug!(index, ?new_from, ?new_to, "translated element");
            element.set_from(new_from)?;
            element.set_to(new_to)?;

            element.map_rotation_origin(|origin| translate(origin, self.offset))
        })
    }
}
