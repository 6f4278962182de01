//! Provides the model operators and the registry that selects them by name.
//!
//! Each operator owns an argument type that parses its command-line grammar
//! (`FromStr`) and applies itself to a parsed model. [`Operation`] ties them
//! together so callers can go from a tool name and an argument string to
//! formatted output bytes without knowing which operator they picked.
//!
//! # Examples
//! ```
//! use modeltools::formatter::FormatOptions;
//! use modeltools::tools::{self, Operation};
//!
//! let op = Operation::parse("translate", "1,0,0").unwrap();
//! let model = br#"{"elements":[{"from":[0,0,0],"to":[1,1,1]}]}"#;
//! let out = tools::run(model, &op, "m", &FormatOptions::default()).unwrap();
//! assert!(out[0].text.contains(r#""from": [ 1, 0, 0 ]"#));
//! ```

pub mod combine;
pub mod resize;
pub mod resize_item;
pub mod rotate;
pub mod shared;
pub mod translate;

use glam::DVec3;
use serde_json::Value;
use thiserror::Error;

use crate::formatter::{self, FormatOptions};
use combine::{CombineArgs, Variant};
use resize::ResizeArgs;
use resize_item::ResizeItemArgs;
use rotate::RotateArgs;
use translate::TranslateArgs;

/// Errors that can occur while applying a tool.
///
/// # Examples
/// ```
/// use modeltools::tools::ToolError;
///
/// let err = ToolError::MalformedDocument("missing `elements`".to_string());
/// assert_eq!(err.to_string(), "Malformed model: missing `elements`");
/// ```
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required field is missing or has the wrong shape.
    #[error("Malformed model: {0}")]
    MalformedDocument(String),
    /// An operator argument could not be parsed or is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Reading or writing a model failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// An operator that rewrites a model in place.
///
/// Implementations either fully succeed or return an error; callers discard
/// the document on error, so a failed transform never reaches the output.
pub trait Transform {
    /// Applies the operator to `document`.
    ///
    /// # Errors
    /// Returns [`ToolError::MalformedDocument`] if the model lacks something the
    /// operator needs.
    fn transform(&self, document: &mut Value) -> ToolResult<()>;
}

/// Parses a finite number argument.
pub(crate) fn parse_number(s: &str, what: &str) -> ToolResult<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ToolError::InvalidArgument(format!("{what} `{s}` is not a number")))
}

/// Parses `x,y,z` into a point.
pub(crate) fn parse_vec3_arg(s: &str, what: &str) -> ToolResult<DVec3> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(ToolError::InvalidArgument(format!(
            "{what} `{s}` must be three comma-separated numbers"
        )));
    }
    Ok(DVec3::new(
        parse_number(parts[0], what)?,
        parse_number(parts[1], what)?,
        parse_number(parts[2], what)?,
    ))
}

/// A parsed tool invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Resize(ResizeArgs),
    ResizeItem(ResizeItemArgs),
    Rotate(RotateArgs),
    Translate(TranslateArgs),
    Combine(CombineArgs),
}

/// What applying an [`Operation`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The input model, transformed.
    Transformed(Value),
    /// Separate merged models, each with its own name.
    Variants(Vec<Variant>),
}

impl Operation {
    /// Looks up `tool` in the registry and parses `args` with its grammar.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArgument`] for unknown tools or bad arguments.
    ///
    /// # Examples
    /// ```
    /// use modeltools::tools::Operation;
    ///
    /// assert!(Operation::parse("Rotate", "90,y").is_ok());
    /// assert!(Operation::parse("shear", "1").is_err());
    /// ```
    pub fn parse(tool: &str, args: &str) -> ToolResult<Self> {
        let entry = find_tool(tool)
            .ok_or_else(|| ToolError::InvalidArgument(format!("tool `{tool}` does not exist")))?;
        entry.parse(args)
    }

    /// Returns the registry name of this operation's tool.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize(_) => "resize",
            Operation::ResizeItem(_) => "resizeitem",
            Operation::Rotate(_) => "rotate",
            Operation::Translate(_) => "translate",
            Operation::Combine(_) => "combine",
        }
    }

    /// Applies the operation to a parsed model.
    ///
    /// `base_name` names combine variants and is ignored by the other tools.
    ///
    /// # Errors
    /// Returns the operator's error; the document is consumed either way.
    pub fn apply(&self, mut document: Value, base_name: &str) -> ToolResult<Outcome> {
        let transform: &dyn Transform = match self {
            Operation::Resize(args) => args,
            Operation::ResizeItem(args) => args,
            Operation::Rotate(args) => args,
            Operation::Translate(args) => args,
            Operation::Combine(args) => {
                return combine::combine(&document, base_name, args).map(Outcome::Variants);
            }
        };
        transform.transform(&mut document)?;
        Ok(Outcome::Transformed(document))
    }
}

/// A registered tool: its name, argument grammar and argument parser.
///
/// # Examples
/// ```
/// use modeltools::tools;
///
/// let entry = tools::find_tool("translate").unwrap();
/// assert_eq!(entry.value_pattern, "<x>,<y>,<z>");
/// ```
pub struct ToolEntry {
    pub name: &'static str,
    pub value_pattern: &'static str,
    parser: fn(&str) -> ToolResult<Operation>,
}

impl ToolEntry {
    /// Parses an argument string for this tool.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArgument`] if `args` does not match the grammar.
    pub fn parse(&self, args: &str) -> ToolResult<Operation> {
        (self.parser)(args)
    }
}

fn parse_resize(s: &str) -> ToolResult<Operation> {
    s.parse().map(Operation::Resize)
}

fn parse_resize_item(s: &str) -> ToolResult<Operation> {
    s.parse().map(Operation::ResizeItem)
}

fn parse_rotate(s: &str) -> ToolResult<Operation> {
    s.parse().map(Operation::Rotate)
}

fn parse_translate(s: &str) -> ToolResult<Operation> {
    s.parse().map(Operation::Translate)
}

fn parse_combine(s: &str) -> ToolResult<Operation> {
    s.parse().map(Operation::Combine)
}

static TOOLS: [ToolEntry; 5] = [
    ToolEntry {
        name: "resize",
        value_pattern: resize::VALUE_PATTERN,
        parser: parse_resize,
    },
    ToolEntry {
        name: "resizeitem",
        value_pattern: resize_item::VALUE_PATTERN,
        parser: parse_resize_item,
    },
    ToolEntry {
        name: "rotate",
        value_pattern: rotate::VALUE_PATTERN,
        parser: parse_rotate,
    },
    ToolEntry {
        name: "translate",
        value_pattern: translate::VALUE_PATTERN,
        parser: parse_translate,
    },
    ToolEntry {
        name: "combine",
        value_pattern: combine::VALUE_PATTERN,
        parser: parse_combine,
    },
];

/// Returns all registered tools.
///
/// # Examples
/// ```
/// use modeltools::tools;
///
/// assert_eq!(tools::get_tools().len(), 5);
/// ```
pub fn get_tools() -> &'static [ToolEntry] {
    &TOOLS
}

/// Finds a tool by name, ignoring case.
pub fn find_tool(name: &str) -> Option<&'static ToolEntry> {
    TOOLS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
}

/// One formatted output document.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedModel {
    /// The variant name for combine outputs, `None` for the transformed input.
    pub variant: Option<String>,
    /// The formatted JSON text.
    pub text: String,
}

/// Parses `data`, applies `op` and formats every resulting model.
///
/// Nothing is returned unless every step succeeds.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if the input is not a usable model,
/// or the operator's error.
pub fn run(
    data: &[u8],
    op: &Operation,
    base_name: &str,
    options: &FormatOptions,
) -> ToolResult<Vec<RenderedModel>> {
    let document = shared::json::parse_document(data)?;

    let rendered = match op.apply(document, base_name)? {
        Outcome::Transformed(document) => vec![RenderedModel {
            variant: None,
            text: formatter::format_value(&document, options),
        }],
        Outcome::Variants(variants) => variants
            .into_iter()
            .map(|variant| RenderedModel {
                text: formatter::format_value(&variant.document, options),
                variant: Some(variant.name),
            })
            .collect(),
    };
    Ok(rendered)
}
