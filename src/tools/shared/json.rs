//! Provides a typed view over the generic JSON tree of a block model.
//!
//! Operators mutate the parsed `serde_json::Value` in place so that fields
//! they do not understand (`parent`, `display`, `ambientocclusion`, ...)
//! survive untouched. The helpers here give those operators checked access to
//! the parts they do understand.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::shared::json::parse_vec3;
//!
//! assert!(parse_vec3(&json!([1, 2, 3])).is_some());
//! ```

use glam::DVec3;
use serde_json::{Map, Number, Value};

use crate::tools::{ToolError, ToolResult};

/// Converts a coordinate to a JSON number.
///
/// Integral values become JSON integers so untouched-looking coordinates stay
/// `4` rather than `4.0`; negative zero is written as `0`.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if `v` is infinite or NaN, which
/// JSON cannot represent.
///
/// # Examples
/// ```
/// use serde_json::json;
///
/// use modeltools::tools::shared::json::number_to_json;
///
/// assert_eq!(number_to_json(4.0).unwrap(), json!(4));
/// assert_eq!(number_to_json(-0.0).unwrap(), json!(0));
/// assert_eq!(number_to_json(2.5).unwrap(), json!(2.5));
/// assert!(number_to_json(f64::INFINITY).is_err());
/// ```
pub fn number_to_json(v: f64) -> ToolResult<Value> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if v.fract() == 0.0 && v.abs() < MAX_EXACT {
        return Ok(Value::from(v as i64));
    }
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| ToolError::MalformedDocument("coordinate out of range".to_string()))
}

/// Converts a slice of coordinates to a JSON array.
pub fn vec_to_json(values: &[f64]) -> ToolResult<Value> {
    values
        .iter()
        .copied()
        .map(number_to_json)
        .collect::<ToolResult<Vec<_>>>()
        .map(Value::Array)
}

/// Converts a point to a three-element JSON array.
pub fn vec3_to_json(v: DVec3) -> ToolResult<Value> {
    vec_to_json(&v.to_array())
}

/// Parses a JSON array of exactly three numbers as a point.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use serde_json::json;
///
/// use modeltools::tools::shared::json::parse_vec3;
///
/// assert_eq!(parse_vec3(&json!([1, 2.5, -3])), Some(DVec3::new(1.0, 2.5, -3.0)));
/// assert_eq!(parse_vec3(&json!([1, 2])), None);
/// assert_eq!(parse_vec3(&json!([1, 2, "3"])), None);
/// ```
pub fn parse_vec3(value: &Value) -> Option<DVec3> {
    let arr = value.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some(DVec3::new(
        arr[0].as_f64()?,
        arr[1].as_f64()?,
        arr[2].as_f64()?,
    ))
}

/// Reads the required point `key` from `object`.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if the field is missing or is not
/// an array of three numbers.
pub fn read_vec3(object: &Map<String, Value>, key: &str) -> ToolResult<DVec3> {
    let value = object
        .get(key)
        .ok_or_else(|| ToolError::MalformedDocument(format!("missing `{key}`")))?;
    parse_vec3(value).ok_or_else(|| {
        ToolError::MalformedDocument(format!("`{key}` must be an array of 3 numbers"))
    })
}

/// Parses raw bytes into a model document.
///
/// Strict JSON is tried first; if that fails the text is re-read as JSON5,
/// which tolerates comments and trailing commas found in hand-edited models.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if the bytes are not UTF-8, cannot
/// be parsed, or the top-level value is not an object.
///
/// # Examples
/// ```
/// use modeltools::tools::shared::json::parse_document;
///
/// assert!(parse_document(br#"{ "elements": [], // none yet
/// }"#).is_ok());
/// assert!(parse_document(b"[1, 2, 3]").is_err());
/// ```
pub fn parse_document(data: &[u8]) -> ToolResult<Value> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ToolError::MalformedDocument("model is not valid UTF-8".to_string()))?;

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(strict) => {
            tracing::debug!(error = %strict, "strict JSON parse failed, retrying as JSON5");
            json5::from_str(text).map_err(|_| {
                ToolError::MalformedDocument(format!("failed to parse model: {strict}"))
            })?
        }
    };

    if !value.is_object() {
        return Err(ToolError::MalformedDocument(
            "model root is not an object".to_string(),
        ));
    }
    Ok(value)
}

/// Returns the object behind `value`, or a malformed-document error naming `what`.
pub fn expect_object_mut<'a>(
    value: &'a mut Value,
    what: &str,
) -> ToolResult<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| ToolError::MalformedDocument(format!("{what} is not an object")))
}

/// Returns the `elements` array of a model document.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if the document is not an object or
/// has no `elements` array.
pub fn elements_mut(document: &mut Value) -> ToolResult<&mut Vec<Value>> {
    expect_object_mut(document, "model root")?
        .get_mut("elements")
        .ok_or_else(|| ToolError::MalformedDocument("missing `elements`".to_string()))?
        .as_array_mut()
        .ok_or_else(|| ToolError::MalformedDocument("`elements` is not an array".to_string()))
}

/// Checked, mutable view of one element of a model.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use serde_json::json;
///
/// use modeltools::tools::shared::json::ElementView;
///
/// let mut element = json!({ "from": [0, 0, 0], "to": [16, 8, 16] });
/// let mut view = ElementView::new(&mut element).unwrap();
/// assert_eq!(view.to().unwrap(), DVec3::new(16.0, 8.0, 16.0));
/// view.set_to(DVec3::splat(4.0)).unwrap();
/// assert_eq!(element["to"], json!([4, 4, 4]));
/// ```
pub struct ElementView<'a> {
    object: &'a mut Map<String, Value>,
}

impl<'a> ElementView<'a> {
    /// Wraps an element value.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if the element is not an object.
    pub fn new(element: &'a mut Value) -> ToolResult<Self> {
        Ok(Self {
            object: expect_object_mut(element, "element")?,
        })
    }

    /// Returns the `from` corner.
    pub fn from(&self) -> ToolResult<DVec3> {
        read_vec3(&*self.object, "from")
    }

    /// Returns the `to` corner.
    pub fn to(&self) -> ToolResult<DVec3> {
        read_vec3(&*self.object, "to")
    }

    /// Replaces the `from` corner.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if a coordinate is not finite.
    pub fn set_from(&mut self, v: DVec3) -> ToolResult<()> {
        self.object.insert("from".to_string(), vec3_to_json(v)?);
        Ok(())
    }

    /// Replaces the `to` corner.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if a coordinate is not finite.
    pub fn set_to(&mut self, v: DVec3) -> ToolResult<()> {
        self.object.insert("to".to_string(), vec3_to_json(v)?);
        Ok(())
    }

    /// Returns the origin of the element's own rotation block, if it has one.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if `rotation` is present but is
    /// not an object with a three-number `origin`.
    pub fn rotation_origin(&self) -> ToolResult<Option<DVec3>> {
        match self.object.get("rotation") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(rotation)) => read_vec3(rotation, "origin").map(Some),
            Some(_) => Err(ToolError::MalformedDocument(
                "element `rotation` is not an object".to_string(),
            )),
        }
    }

    /// Replaces the origin of the element's rotation block.
    ///
    /// Does nothing if the element has no rotation block.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if a coordinate is not finite.
    pub fn set_rotation_origin(&mut self, v: DVec3) -> ToolResult<()> {
        if let Some(Value::Object(rotation)) = self.object.get_mut("rotation") {
            rotation.insert("origin".to_string(), vec3_to_json(v)?);
        }
        Ok(())
    }

    /// Applies `f` to the rotation origin, if there is one.
    pub fn map_rotation_origin(&mut self, f: impl FnOnce(DVec3) -> DVec3) -> ToolResult<()> {
        if let Some(origin) = self.rotation_origin()? {
            let moved = f(origin);
            tracing::debug!(?origin, ?moved, "moved rotation origin");
            self.set_rotation_origin(moved)?;
        }
        Ok(())
    }

    /// Returns the `faces` map, if the element has one.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if `faces` is not an object.
    pub fn faces_mut(&mut self) -> ToolResult<Option<&mut Map<String, Value>>> {
        match self.object.get_mut("faces") {
            None | Some(Value::Null) => Ok(None),
            Some(faces) => expect_object_mut(faces, "`faces`").map(Some),
        }
    }
}

/// Runs `f` on every element of `document`.
///
/// # Errors
/// Returns the first error from `f`, or [`ToolError::MalformedDocument`] if the
/// document has no `elements` array or an element is not an object.
pub fn for_each_element(
    document: &mut Value,
    mut f: impl FnMut(usize, ElementView<'_>) -> ToolResult<()>,
) -> ToolResult<()> {
    for (index, element) in elements_mut(document)?.iter_mut().enumerate() {
        f(index, ElementView::new(element)?)?;
    }
    Ok(())
}
