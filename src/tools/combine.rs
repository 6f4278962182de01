//! Provides the `combine` operator: generating model variants from optional parts.
//!
//! The arguments are an ordered list of groups, each a set of named partial
//! models. Every combination that picks one member per group is merged onto
//! the base model: textures are overlaid (later wins) and elements are
//! appended in order. Each combination is named by appending `_<member>` for
//! every chosen member to the base name.
//!
//! # Examples
//! ```
//! use serde_json::json;
//!
//! use modeltools::tools::combine::{combine, CombineArgs, Member};
//!
//! let base = json!({ "elements": [] });
//! let args = CombineArgs::new(vec![
//!     vec![Member::new("a", None), Member::new("b", None)],
//!     vec![Member::new("x", None)],
//! ]);
//! let variants = combine(&base, "door", &args).unwrap();
//! let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
//! assert_eq!(names, ["door_a_x", "door_b_x"]);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};

use super::shared::json::parse_document;
use super::{ToolError, ToolResult};

/// Argument grammar accepted by [`CombineArgs::from_str`].
pub const VALUE_PATTERN: &str = "<file>[,<file>...] [<file>[,<file>...] ...]";

/// One optional partial model within a group.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    /// The name appended to variant identifiers.
    pub name: String,
    /// The partial model, or `None` if it was absent or unreadable.
    pub document: Option<Value>,
}

impl Member {
    pub fn new(name: impl Into<String>, document: Option<Value>) -> Self {
        Self {
            name: name.into(),
            document,
        }
    }

    /// Loads a member from a model file, named after the file stem.
    ///
    /// Unreadable or unparsable files become a `None` placeholder.
    pub fn load(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let document = match std::fs::read(path) {
            Ok(data) => match parse_document(&data) {
                Ok(document) => Some(document),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "combine member is not a model"
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "combine member could not be read"
                );
                None
            }
        };

        Self { name, document }
    }
}

/// Arguments of the `combine` operator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombineArgs {
    pub groups: Vec<Vec<Member>>,
}

impl CombineArgs {
    pub fn new(groups: Vec<Vec<Member>>) -> Self {
        Self { groups }
    }

    /// Loads every member of the given path groups.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArgument`] if a group is empty or names the
    /// same member twice.
    pub fn load(paths: &[Vec<PathBuf>]) -> ToolResult<Self> {
        let mut groups = Vec::with_capacity(paths.len());
        for group in paths {
            let members: Vec<Member> = group.iter().map(|path| Member::load(path)).collect();
            check_group(&members)?;
            groups.push(members);
        }
        Ok(Self { groups })
    }

    /// Returns the number of variants the groups expand to.
    pub fn variant_count(&self) -> usize {
        self.groups.iter().map(Vec::len).product()
    }
}

impl FromStr for CombineArgs {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(&split_groups(s)?)
    }
}

fn check_group(members: &[Member]) -> ToolResult<()> {
    if members.is_empty() {
        return Err(ToolError::InvalidArgument("empty combine group".to_string()));
    }
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.name.as_str()) {
            return Err(ToolError::InvalidArgument(format!(
                "combine member `{}` appears twice in one group",
                member.name
            )));
        }
    }
    Ok(())
}

/// Splits a combine argument into groups of paths.
///
/// Groups are separated by spaces and members by commas; either separator
/// can be escaped with a backslash to make it part of a file name.
///
/// # Errors
/// Returns [`ToolError::InvalidArgument`] if a member is empty.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
///
/// use modeltools::tools::combine::split_groups;
///
/// let groups = split_groups(r"a.json,b.json my\ part.json").unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[1], [PathBuf::from("my part.json")]);
/// ```
pub fn split_groups(s: &str) -> ToolResult<Vec<Vec<PathBuf>>> {
    let mut groups = Vec::new();
    let mut group = Vec::new();
    let mut member = String::new();
    let mut chars = s.trim().chars();

    let finish_member = |member: &mut String, group: &mut Vec<PathBuf>| -> ToolResult<()> {
        if member.is_empty() {
            return Err(ToolError::InvalidArgument(format!(
                "empty combine member in `{s}`"
            )));
        }
        group.push(PathBuf::from(std::mem::take(member)));
        Ok(())
    };

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ (' ' | ',' | '\\')) => member.push(escaped),
                Some(other) => {
                    member.push('\\');
                    member.push(other);
                }
                None => member.push('\\'),
            },
            ',' => finish_member(&mut member, &mut group)?,
            ' ' => {
                // runs of spaces separate a single pair of groups
                if !member.is_empty() {
                    finish_member(&mut member, &mut group)?;
                    groups.push(std::mem::take(&mut group));
                }
            }
            _ => member.push(c),
        }
    }
    if !member.is_empty() || !group.is_empty() {
        finish_member(&mut member, &mut group)?;
        groups.push(group);
    }
    Ok(groups)
}

/// One merged output of [`combine`].
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    /// `<base>_<member>...`, one suffix per group.
    pub name: String,
    pub document: Value,
}

/// Expands `args` into every merged variant of `base`.
///
/// With no groups the result is a single variant equal to the base.
///
/// # Errors
/// Returns [`ToolError::MalformedDocument`] if the base is not an object or its
/// `textures`/`elements` have the wrong shape, and
/// [`ToolError::InvalidArgument`] for empty groups or duplicate member names.
pub fn combine(base: &Value, base_name: &str, args: &CombineArgs) -> ToolResult<Vec<Variant>> {
    let root = base
        .as_object()
        .ok_or_else(|| ToolError::MalformedDocument("model root is not an object".to_string()))?;
    let textures = textures_of(root)?;
    let elements = elements_of(root)?;

    for group in &args.groups {
        check_group(group)?;
    }

    let mut variants = Vec::with_capacity(args.variant_count());
    for choice in cartesian_product(&args.groups) {
        let mut name = base_name.to_string();
        let mut merged_textures = textures.clone();
        let mut merged_elements = elements.clone();

        for member in choice {
            name.push('_');
            name.push_str(&member.name);

            let Some(Value::Object(part)) = &member.document else {
                continue;
            };
            for (key, texture) in textures_of(part)? {
                merged_textures.insert(key, texture);
            }
            merged_elements.extend(elements_of(part)?);
        }

        tracing::debug!(
            %name,
            textures = merged_textures.len(),
            elements = merged_elements.len(),
            "built combine variant"
        );

        let mut document = root.clone();
        document.insert("elements".to_string(), Value::Array(merged_elements));
        document.insert("textures".to_string(), Value::Object(merged_textures));
        variants.push(Variant {
            name,
            document: Value::Object(document),
        });
    }
    Ok(variants)
}

fn textures_of(model: &Map<String, Value>) -> ToolResult<Map<String, Value>> {
    match model.get("textures") {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(textures)) => Ok(textures.clone()),
        Some(_) => Err(ToolError::MalformedDocument(
            "`textures` is not an object".to_string(),
        )),
    }
}

fn elements_of(model: &Map<String, Value>) -> ToolResult<Vec<Value>> {
    match model.get("elements") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(elements)) => Ok(elements.clone()),
        Some(_) => Err(ToolError::MalformedDocument(
            "`elements` is not an array".to_string(),
        )),
    }
}

/// Every way of picking one member from each group, first group varying slowest.
fn cartesian_product(groups: &[Vec<Member>]) -> Vec<Vec<&Member>> {
    groups.iter().fold(vec![Vec::new()], |acc, group| {
        acc.iter()
            .flat_map(|prefix| {
                group.iter().map(move |member| {
                    let mut choice = prefix.clone();
                    choice.push(member);
                    choice
                })
            })
            .collect()
    })
}
