//! Provides the `resize` operator: uniform scaling of every element about a pivot.
//!
//! Face UVs that were left implicit are pinned to the pre-resize bounds first,
//! so the texture mapping of the scaled model matches the original.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::resize::ResizeArgs;
//! use modeltools::tools::Transform;
//!
//! let mut model = json!({ "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16] } ] });
//! let args: ResizeArgs = "0.5".parse().unwrap();
//! args.transform(&mut model).unwrap();
//! assert_eq!(model["elements"][0]["from"], json!([4, 4, 4]));
//! ```

use std::str::FromStr;

use glam::DVec3;
use serde_json::Value;

use super::shared::cube::{infer_face_uvs, UvMode};
use super::shared::json::for_each_element;
use super::shared::rotation::{scale_about_pivot, CANVAS_CENTER};
use super::{parse_number, parse_vec3_arg, ToolError, ToolResult, Transform};

/// Argument grammar accepted by [`ResizeArgs::from_str`].
pub const VALUE_PATTERN: &str = "<magnitude>[;<originX>,<originY>,<originZ>]";

/// Arguments of the `resize` operator.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeArgs {
    /// The scale factor.
    pub magnitude: f64,
    /// The fixed point of the scaling; defaults to the canvas centre.
    pub pivot: DVec3,
}

impl ResizeArgs {
    /// Creates arguments scaling by `magnitude` about the canvas centre.
    pub fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            pivot: CANVAS_CENTER,
        }
    }

    /// Uses `pivot` as the fixed point instead of the canvas centre.
    pub fn with_pivot(mut self, pivot: DVec3) -> Self {
        self.pivot = pivot;
        self
    }
}

impl FromStr for ResizeArgs {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(';');
        let magnitude = parse_number(parts.next().unwrap_or_default(), "magnitude")?;
        let pivot = match parts.next() {
            Some(pivot) => parse_vec3_arg(pivot, "origin")?,
            None => CANVAS_CENTER,
        };
        if parts.next().is_some() {
            return Err(ToolError::InvalidArgument(format!(
                "`{s}` does not match {VALUE_PATTERN}"
            )));
        }
        Ok(Self { magnitude, pivot })
    }
}

impl Transform for ResizeArgs {
    fn transform(&self, document: &mut Value) -> ToolResult<()> {
        tracing::debug!(magnitude = self.magnitude, pivot = ?self.pivot, "resizing model");

        for_each_element(document, |index, mut element| {
            let from = element.from()?;
            let to = element.to()?;

            if let Some(faces) = element.faces_mut()? {
                infer_face_uvs(faces, from, to, UvMode::Planar)?;
            }

            let new_from = scale_about_pivot(from, self.pivot, self.magnitude);
            let new_to = scale_about_pivot(to, self.pivot, self.magnitude);
            tracing::debug!(index, ?from, ?to, ?new_from, ?new_to, "resized element");
            element.set_from(new_from)?;
            element.set_to(new_to)?;

            element.map_rotation_origin(|origin| {
                scale_about_pivot(origin, self.pivot, self.magnitude)
            })
        })
    }
}
