//! Provides the `resizeitem` operator: scaling of an item model's display transforms.
//!
//! Item models carry a `display` map from render context (`gui`, `ground`,
//! `thirdperson_righthand`, ...) to a transform with a `scale` vector. This
//! operator scales those vectors, optionally only for selected contexts.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::resize_item::ResizeItemArgs;
//! use modeltools::tools::Transform;
//!
//! let mut model = json!({ "display": { "gui": { "scale": [0.5, 0.5, 0.5] } } });
//! let args: ResizeItemArgs = "2".parse().unwrap();
//! args.transform(&mut model).unwrap();
//! assert_eq!(model["display"]["gui"]["scale"], json!([1, 1, 1]));
//! ```

use std::collections::BTreeSet;
use std::str::FromStr;

use glam::DVec3;
use serde_json::Value;

use super::shared::json::{expect_object_mut, read_vec3, vec3_to_json};
use super::shared::rotation::scale_about_pivot;
use super::{parse_number, parse_vec3_arg, ToolError, ToolResult, Transform};

/// Argument grammar accepted by [`ResizeItemArgs::from_str`].
pub const VALUE_PATTERN: &str =
    "<magnitude>[;<originX>,<originY>,<originZ>][;<item>[,<item>...]]";

/// Arguments of the `resizeitem` operator.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeItemArgs {
    /// The scale factor.
    pub magnitude: f64,
    /// The fixed point of the scaling; defaults to the origin.
    pub pivot: DVec3,
    /// Lower-cased display contexts to touch; empty means all of them.
    pub items: BTreeSet<String>,
}

impl ResizeItemArgs {
    /// Creates arguments scaling every display context by `magnitude` about zero.
    pub fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            pivot: DVec3::ZERO,
            items: BTreeSet::new(),
        }
    }

    /// Restricts the operator to the named display contexts.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.items = items
            .into_iter()
            .map(|item| item.as_ref().to_lowercase())
            .collect();
        self
    }

    fn selects(&self, context: &str) -> bool {
        self.items.is_empty() || self.items.contains(&context.to_lowercase())
    }
}

impl FromStr for ResizeItemArgs {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(';');
        let mut args = Self::new(parse_number(parts.next().unwrap_or_default(), "magnitude")?);

        let mut pivot_seen = false;
        let mut items_seen = false;
        for part in parts {
            let looks_numeric = part.split(',').count() == 3
                && part.split(',').all(|n| n.trim().parse::<f64>().is_ok());

            if looks_numeric && !pivot_seen && !items_seen {
                args.pivot = parse_vec3_arg(part, "origin")?;
                pivot_seen = true;
            } else if !items_seen {
                let items: Vec<&str> = part.split(',').map(str::trim).collect();
                if items.iter().any(|item| item.is_empty()) {
                    return Err(ToolError::InvalidArgument(format!(
                        "empty display item in `{part}`"
                    )));
                }
                args = args.with_items(items);
                items_seen = true;
            } else {
                return Err(ToolError::InvalidArgument(format!(
                    "`{s}` does not match {VALUE_PATTERN}"
                )));
            }
        }
        Ok(args)
    }
}

impl Transform for ResizeItemArgs {
    fn transform(&self, document: &mut Value) -> ToolResult<()> {
        let display = expect_object_mut(document, "model root")?
            .get_mut("display")
            .ok_or_else(|| ToolError::MalformedDocument("missing `display`".to_string()))?;
        let display = expect_object_mut(display, "`display`")?;

        for (context, entry) in display.iter_mut() {
            if !self.selects(context) {
                continue;
            }
            let entry = expect_object_mut(entry, &format!("display `{context}`"))?;
            let scale = read_vec3(entry, "scale")?;
            let new_scale = scale_about_pivot(scale, self.pivot, self.magnitude);
            tracing::debug!(%context, ?scale, ?new_scale, "resized display scale");
            entry.insert("scale".to_string(), vec3_to_json(new_scale)?);
        }
        Ok(())
    }
}
