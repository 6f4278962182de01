//! Provides geometric editing tools for cuboid block model JSON files.
//!
//! Block models (as used by Minecraft and compatible games) describe a shape
//! as axis-aligned boxes with textured faces. This crate resizes, rotates,
//! translates and combines such models while keeping their textures mapped,
//! then writes them back in a compact, hand-editable layout.
//!
//! # Build
//! ```text
//! cargo build --release
//! ```
//!
//! # Usage
//! ```text
//! modeltools --tool rotate --opt 90,y models/block/lamp.json
//! modeltools -t resize --opt "0.5;8,0,8" -s _small models/block/*.json
//! ```
//!
//! # Examples
//! ```
//! use modeltools::formatter::FormatOptions;
//! use modeltools::tools::{self, Operation};
//!
//! let model = br#"{ "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16] } ] }"#;
//! let op = Operation::parse("resize", "0.5").unwrap();
//! let out = tools::run(model, &op, "cube", &FormatOptions::default()).unwrap();
//! assert!(out[0].text.contains(r#""from": [ 4, 4, 4 ]"#));
//! ```

pub mod formatter;
pub mod runner;
pub mod tools;
