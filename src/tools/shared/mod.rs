//! Provides shared utilities for the model operators.
//!
//! This module provides common functionality used by several operators:
//! - Point and box math (scaling, quarter turns, translation)
//! - Face vocabulary, face cycles and face-UV inference
//! - Typed access to the generic JSON tree
//!
//! # Examples
//! ```
//! use modeltools::tools::shared::{scale_about_pivot, CANVAS_CENTER};
//!
//! assert_eq!(scale_about_pivot(CANVAS_CENTER, CANVAS_CENTER, 3.0), CANVAS_CENTER);
//! ```

pub mod cube;
pub mod json;
pub mod rotation;

pub use cube::{infer_face_uvs, Axis, FaceName, UvMode};
pub use json::{for_each_element, parse_document, parse_vec3, ElementView};
pub use rotation::{
    min_max_pair, rotate_90_steps, rotate_box, scale_about_pivot, translate, QuarterTurn,
    CANVAS_CENTER,
};
