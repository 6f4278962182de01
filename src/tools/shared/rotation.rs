//! Provides the point and box math behind the model operators, using glam.
//!
//! Everything here is pure: scaling about a pivot, quarter-turn rotation about
//! a principal axis, translation, and the corner bookkeeping that keeps an
//! element's `from`/`to` pair oriented the same way after a rotation.
//!
//! # Examples
//! ```
//! use glam::DVec3;
//!
//! use modeltools::tools::shared::rotation::{scale_about_pivot, CANVAS_CENTER};
//!
//! let scaled = scale_about_pivot(DVec3::ZERO, CANVAS_CENTER, 0.5);
//! assert_eq!(scaled, DVec3::splat(4.0));
//! ```

use glam::{DVec2, DVec3};

use super::cube::Axis;
use crate::tools::{ToolError, ToolResult};

/// The centre of the 16-unit block canvas, used as the default pivot.
///
/// # Examples
/// ```
/// use modeltools::tools::shared::rotation::CANVAS_CENTER;
///
/// assert_eq!(CANVAS_CENTER.x, 8.0);
/// ```
pub const CANVAS_CENTER: DVec3 = DVec3::new(8.0, 8.0, 8.0);

/// Scales `v` about `pivot`: `(v - pivot) * factor + pivot`.
///
/// # Examples
/// ```
/// use glam::DVec3;
///
/// use modeltools::tools::shared::rotation::scale_about_pivot;
///
/// let v = scale_about_pivot(DVec3::splat(16.0), DVec3::splat(8.0), 0.5);
/// assert_eq!(v, DVec3::splat(12.0));
/// ```
#[inline]
pub fn scale_about_pivot(v: DVec3, pivot: DVec3, factor: f64) -> DVec3 {
    (v - pivot) * factor + pivot
}

/// Offsets `v` by `offset`.
#[inline]
pub fn translate(v: DVec3, offset: DVec3) -> DVec3 {
    v + offset
}

/// A rotation by a whole number of quarter turns, counter-clockwise.
///
/// Construction fails for angles that are not multiples of 90 degrees, so a
/// `QuarterTurn` always rotates grid-aligned points onto grid-aligned points
/// without any trigonometric rounding.
///
/// # Examples
/// ```
/// use modeltools::tools::shared::rotation::QuarterTurn;
///
/// assert_eq!(QuarterTurn::from_degrees(-90).unwrap().steps(), 3);
/// assert!(QuarterTurn::from_degrees(45).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuarterTurn {
    steps: u8,
}

impl QuarterTurn {
    /// Creates a quarter turn from an angle in degrees.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArgument`] if `degrees` is not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> ToolResult<Self> {
        if degrees % 90 != 0 {
            return Err(ToolError::InvalidArgument(format!(
                "angle must be a multiple of 90, got {degrees}"
            )));
        }
        Ok(Self {
            steps: (degrees / 90).rem_euclid(4) as u8,
        })
    }

    /// Returns the number of counter-clockwise quarter turns in `0..4`.
    pub fn steps(&self) -> usize {
        self.steps as usize
    }

    /// Exact `(cos, sin)` of the turn.
    fn cos_sin(&self) -> (f64, f64) {
        match self.steps {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        }
    }

    /// Rotates a 2D point counter-clockwise about the origin.
    fn apply_2d(&self, p: DVec2) -> DVec2 {
        let (cos, sin) = self.cos_sin();
        DVec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
    }
}

/// Rotates `v` about `axis` (through the origin) by `angle_degrees`.
///
/// The point is projected onto the plane perpendicular to the axis
/// (`x`: (y, z), `y`: (x, z), `z`: (x, y)), rotated counter-clockwise in that
/// plane, and written back. The axis component is left untouched.
///
/// # Errors
/// Returns [`ToolError::InvalidArgument`] if the angle is not a multiple of 90.
///
/// # Examples
/// ```
/// use glam::DVec3;
///
/// use modeltools::tools::shared::cube::Axis;
/// use modeltools::tools::shared::rotation::rotate_90_steps;
///
/// let v = rotate_90_steps(DVec3::new(1.0, 2.0, 0.0), Axis::Z, 90).unwrap();
/// assert_eq!(v, DVec3::new(-2.0, 1.0, 0.0));
/// ```
pub fn rotate_90_steps(v: DVec3, axis: Axis, angle_degrees: i32) -> ToolResult<DVec3> {
    Ok(rotate_quarter(v, axis, QuarterTurn::from_degrees(angle_degrees)?))
}

/// Rotates `v` about `axis` by an already validated quarter turn.
pub fn rotate_quarter(v: DVec3, axis: Axis, turn: QuarterTurn) -> DVec3 {
    match axis {
        Axis::X => {
            let p = turn.apply_2d(DVec2::new(v.y, v.z));
            DVec3::new(v.x, p.x, p.y)
        }
        Axis::Y => {
            let p = turn.apply_2d(DVec2::new(v.x, v.z));
            DVec3::new(p.x, v.y, p.y)
        }
        Axis::Z => {
            let p = turn.apply_2d(DVec2::new(v.x, v.y));
            DVec3::new(p.x, p.y, v.z)
        }
    }
}

/// Rotates `v` about an axis passing through `pivot`.
///
/// # Examples
/// ```
/// use glam::DVec3;
///
/// use modeltools::tools::shared::cube::Axis;
/// use modeltools::tools::shared::rotation::{rotate_about_pivot, QuarterTurn, CANVAS_CENTER};
///
/// let turn = QuarterTurn::from_degrees(180).unwrap();
/// let v = rotate_about_pivot(DVec3::ZERO, CANVAS_CENTER, Axis::Y, turn);
/// assert_eq!(v, DVec3::new(16.0, 0.0, 16.0));
/// ```
pub fn rotate_about_pivot(v: DVec3, pivot: DVec3, axis: Axis, turn: QuarterTurn) -> DVec3 {
    rotate_quarter(v - pivot, axis, turn) + pivot
}

/// Which way round a pair of corner coordinates was ordered.
///
/// # Examples
/// ```
/// use modeltools::tools::shared::rotation::{min_max_pair, CornerOrder};
///
/// assert_eq!(min_max_pair(0.0, 16.0), CornerOrder::Ascending);
/// assert_eq!(min_max_pair(16.0, 0.0).apply(3.0, 9.0), (9.0, 3.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerOrder {
    /// `from <= to`: the pair becomes `(min, max)`.
    Ascending,
    /// `from > to`: the pair becomes `(max, min)`.
    Descending,
}

impl CornerOrder {
    /// Orders two new coordinates the same way the original pair was ordered.
    pub fn apply(self, a: f64, b: f64) -> (f64, f64) {
        match self {
            CornerOrder::Ascending => (a.min(b), a.max(b)),
            CornerOrder::Descending => (a.max(b), a.min(b)),
        }
    }
}

/// Records the ordering of a `from`/`to` coordinate pair.
pub fn min_max_pair(a: f64, b: f64) -> CornerOrder {
    if a <= b {
        CornerOrder::Ascending
    } else {
        CornerOrder::Descending
    }
}

/// Rotates a box given by two opposite corners and re-derives its corners.
///
/// Each component of the result keeps the ordering the input corners had,
/// so an element authored as `from <= to` stays that way after rotation.
///
/// # Examples
/// ```
/// use glam::DVec3;
///
/// use modeltools::tools::shared::cube::Axis;
/// use modeltools::tools::shared::rotation::{rotate_box, QuarterTurn, CANVAS_CENTER};
///
/// let turn = QuarterTurn::from_degrees(90).unwrap();
/// let (from, to) = rotate_box(DVec3::ZERO, DVec3::splat(16.0), CANVAS_CENTER, Axis::Y, turn);
/// assert_eq!((from, to), (DVec3::ZERO, DVec3::splat(16.0)));
/// ```
pub fn rotate_box(
    from: DVec3,
    to: DVec3,
    pivot: DVec3,
    axis: Axis,
    turn: QuarterTurn,
) -> (DVec3, DVec3) {
    let orders = [
        min_max_pair(from.x, to.x),
        min_max_pair(from.y, to.y),
        min_max_pair(from.z, to.z),
    ];

    let a = rotate_about_pivot(from, pivot, axis, turn);
    let b = rotate_about_pivot(to, pivot, axis, turn);

    let mut new_from = DVec3::ZERO;
    let mut new_to = DVec3::ZERO;
    for (i, order) in orders.iter().enumerate() {
        let (f, t) = order.apply(a[i], b[i]);
        new_from[i] = f;
        new_to[i] = t;
    }
    (new_from, new_to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_identity() {
        let v = DVec3::new(3.0, -2.5, 11.0);
        assert_eq!(scale_about_pivot(v, DVec3::new(1.0, 2.0, 3.0), 1.0), v);
    }

    #[test]
    fn test_scale_half_about_center() {
        assert_eq!(
            scale_about_pivot(DVec3::ZERO, CANVAS_CENTER, 0.5),
            DVec3::splat(4.0)
        );
        assert_eq!(
            scale_about_pivot(DVec3::splat(16.0), CANVAS_CENTER, 0.5),
            DVec3::splat(12.0)
        );
    }

    #[test]
    fn test_quarter_turn_validation() {
        assert!(QuarterTurn::from_degrees(0).is_ok());
        assert_eq!(QuarterTurn::from_degrees(450).unwrap().steps(), 1);
        assert_eq!(QuarterTurn::from_degrees(-180).unwrap().steps(), 2);
        assert!(matches!(
            QuarterTurn::from_degrees(30),
            Err(ToolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rotate_each_axis_counter_clockwise() {
        // X: (y, z) plane
        assert_eq!(
            rotate_90_steps(DVec3::new(5.0, 1.0, 0.0), Axis::X, 90).unwrap(),
            DVec3::new(5.0, 0.0, 1.0)
        );
        // Y: (x, z) plane
        assert_eq!(
            rotate_90_steps(DVec3::new(1.0, 5.0, 0.0), Axis::Y, 90).unwrap(),
            DVec3::new(0.0, 5.0, 1.0)
        );
        // Z: (x, y) plane
        assert_eq!(
            rotate_90_steps(DVec3::new(1.0, 0.0, 5.0), Axis::Z, 90).unwrap(),
            DVec3::new(0.0, 1.0, 5.0)
        );
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let turn = QuarterTurn::from_degrees(90).unwrap();
        let start = DVec3::new(2.0, 3.5, 13.0);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut v = start;
            for _ in 0..4 {
                v = rotate_about_pivot(v, CANVAS_CENTER, axis, turn);
            }
            assert_eq!(v, start);
        }
    }

    #[test]
    fn test_rotate_box_keeps_descending_corners() {
        let turn = QuarterTurn::from_degrees(90).unwrap();
        let (from, to) = rotate_box(
            DVec3::new(16.0, 0.0, 0.0),
            DVec3::new(0.0, 4.0, 2.0),
            CANVAS_CENTER,
            Axis::Y,
            turn,
        );
        // x keeps from > to, y and z keep from < to
        assert!(from.x > to.x);
        assert!(from.y < to.y);
        assert!(from.z < to.z);
        assert_eq!(from, DVec3::new(16.0, 0.0, 0.0));
        assert_eq!(to, DVec3::new(14.0, 4.0, 16.0));
    }

    #[test]
    fn test_translate() {
        assert_eq!(
            translate(DVec3::new(1.0, 2.0, 3.0), DVec3::new(-1.0, 0.5, 2.0)),
            DVec3::new(0.0, 2.5, 5.0)
        );
    }
}
