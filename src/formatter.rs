//! Provides the block-model pretty-printer.
//!
//! Output follows ordinary indented JSON except for the shapes block model
//! authors read most: coordinate triples, element rotation blocks and face
//! definitions are each kept on a single line.
//!
//! ```text
//! {
//!     "elements": [
//!         {
//!             "from": [ 0, 0, 0 ],
//!             "to": [ 16, 16, 16 ],
//!             "rotation": { "origin": [ 8, 8, 8 ], "axis": "y", "angle": 45 },
//!             "faces": {
//!                 "up":    { "uv": [ 0, 0, 16, 16 ], "texture": "#top", "cullface": "up" },
//!                 "north": { "uv": [ 0, 0, 16, 16 ], "texture": "#side" }
//!             }
//!         }
//!     ]
//! }
//! ```
//!
//! # Examples
//! ```
//! use modeltools::formatter::{format, FormatOptions};
//!
//! let text = format(r#"{"to":[1,2,3]}"#, &FormatOptions::default()).unwrap();
//! assert_eq!(text, "{\n    \"to\": [ 1, 2, 3 ]\n}\n");
//! ```

use serde_json::{Map, Value};

use crate::tools::shared::cube::FaceName;
use crate::tools::{ToolError, ToolResult};

/// Keys whose three-element arrays are printed on one line.
const VECTOR_KEYS: [&str; 5] = ["from", "to", "rotation", "scale", "translation"];

/// Face fields in the order they are printed; anything else follows.
const FACE_FIELDS: [&str; 5] = ["uv", "texture", "cullface", "rotation", "tintindex"];

/// Width face names are padded to so face definitions line up.
const FACE_NAME_WIDTH: usize = 6;

/// Options controlling the printed layout.
///
/// # Examples
/// ```
/// use modeltools::formatter::FormatOptions;
///
/// assert_eq!(FormatOptions::default().indent, "    ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// The string used for one level of indentation.
    pub indent: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

/// Re-lays out serialized JSON text.
///
/// Formatting already formatted text returns it unchanged.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if `json` is not valid JSON.
pub fn format(json: &str, options: &FormatOptions) -> ToolResult<String> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ToolError::MalformedDocument(format!("failed to parse JSON: {e}")))?;
    Ok(format_value(&value, options))
}

/// Prints `value` in the block-model layout, ending with a newline.
pub fn format_value(value: &Value, options: &FormatOptions) -> String {
    let mut printer = Printer {
        out: String::new(),
        indent: &options.indent,
    };
    printer.write_value(value, 0, None);
    printer.out.push('\n');
    printer.out
}

struct Printer<'a> {
    out: String,
    indent: &'a str,
}

impl Printer<'_> {
    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
    }

    /// Writes a value laid out over multiple lines. `key` is the member name
    /// the value sits under, if any.
    fn write_value(&mut self, value: &Value, depth: usize, key: Option<&str>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                self.out.push('{');
                for (i, (member, child)) in map.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    self.write_member(member, child, depth + 1, key == Some("faces"));
                }
                self.newline(depth);
                self.out.push('}');
            }
            Value::Array(items) if !items.is_empty() => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    self.write_value(item, depth + 1, None);
                }
                self.newline(depth);
                self.out.push(']');
            }
            other => self.out.push_str(&inline(other)),
        }
    }

    fn write_member(&mut self, key: &str, value: &Value, depth: usize, in_faces: bool) {
        let quoted = quote(key);

        if in_faces && FaceName::from_key(key).is_some() {
            if let Value::Object(face) = value {
                let padding = FACE_NAME_WIDTH.saturating_sub(key.len()).max(1);
                self.out.push_str(&quoted);
                self.out.push(':');
                self.out.push_str(&" ".repeat(padding));
                self.out.push_str(&face_line(face));
                return;
            }
        }

        self.out.push_str(&quoted);
        self.out.push_str(": ");

        if VECTOR_KEYS.contains(&key) && is_scalar_triple(value) {
            self.out.push_str(&inline(value));
        } else if let Some(line) = (key == "rotation").then(|| rotation_line(value)).flatten() {
            self.out.push_str(&line);
        } else {
            self.write_value(value, depth, Some(key));
        }
    }
}

fn is_scalar_triple(value: &Value) -> bool {
    value.as_array().is_some_and(|items| {
        items.len() == 3 && items.iter().all(|v| !v.is_array() && !v.is_object())
    })
}

/// `{ "origin": [ .. ], "axis": .., "angle": .. }` followed by any other fields.
fn rotation_line(value: &Value) -> Option<String> {
    let block = value.as_object()?;
    let origin = block.get("origin").filter(|o| is_scalar_triple(o))?;
    let axis = block.get("axis")?;
    let angle = block.get("angle")?;

    let mut fields = vec![
        ("origin", origin),
        ("axis", axis),
        ("angle", angle),
    ];
    fields.extend(
        block
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "origin" | "axis" | "angle"))
            .map(|(k, v)| (k.as_str(), v)),
    );
    Some(inline_fields(fields))
}

fn face_line(face: &Map<String, Value>) -> String {
    let mut fields: Vec<(&str, &Value)> = FACE_FIELDS
        .iter()
        .filter_map(|field| face.get(*field).map(|v| (*field, v)))
        .collect();
    fields.extend(
        face.iter()
            .filter(|(k, _)| !FACE_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v)),
    );
    if fields.is_empty() {
        "{ }".to_string()
    } else {
        inline_fields(fields)
    }
}

fn inline_fields(fields: Vec<(&str, &Value)>) -> String {
    let body: Vec<String> = fields
        .into_iter()
        .map(|(k, v)| format!("{}: {}", quote(k), inline(v)))
        .collect();
    format!("{{ {} }}", body.join(", "))
}

/// Single-line rendering with spaces inside brackets.
fn inline(value: &Value) -> String {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let body: Vec<String> = items.iter().map(inline).collect();
            format!("[ {} ]", body.join(", "))
        }
        Value::Object(map) if !map.is_empty() => {
            inline_fields(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
        }
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
        scalar => scalar.to_string(),
    }
}

fn quote(key: &str) -> String {
    Value::from(key).to_string()
}
