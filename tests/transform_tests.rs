//! Integration tests for the model operators and the formatter.
//!
//! Every test goes through the public pipeline: raw bytes in, formatted text
//! out, the same path the command-line tool takes.

use serde_json::{json, Value};

use modeltools::formatter::{self, FormatOptions};
use modeltools::tools::{self, Operation, Outcome, ToolError};

const LAMP: &str = r##"{
    "parent": "block/block",
    "textures": {
        "particle": "block/lamp",
        "side": "block/lamp_side"
    },
    "elements": [
        {
            "from": [ 4, 0, 4 ],
            "to": [ 12, 10, 12 ],
            "rotation": { "origin": [ 8, 0, 8 ], "axis": "y", "angle": 22.5 },
            "faces": {
                "down":  { "texture": "#side", "cullface": "down" },
                "up":    { "texture": "#side" },
                "north": { "uv": [ 4, 6, 12, 16 ], "texture": "#side" },
                "south": { "texture": "#side", "tintindex": 0 },
                "west":  { "texture": "#side" },
                "east":  { "texture": "#side" }
            }
        }
    ]
}"##;

fn run_one(tool: &str, args: &str, input: &str) -> Value {
    let op = Operation::parse(tool, args).unwrap();
    let out = tools::run(input.as_bytes(), &op, "lamp", &FormatOptions::default()).unwrap();
    assert_eq!(out.len(), 1);
    assert!(out[0].variant.is_none());
    serde_json::from_str(&out[0].text).unwrap()
}

// ===========================================================================
// Operator properties
// ===========================================================================

#[test]
fn test_resize_example() {
    let model = run_one(
        "resize",
        "0.5;8,8,8",
        r#"{ "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16] } ] }"#,
    );
    assert_eq!(model["elements"][0]["from"], json!([4, 4, 4]));
    assert_eq!(model["elements"][0]["to"], json!([12, 12, 12]));
}

#[test]
fn test_resize_infers_uvs_from_original_bounds() {
    let model = run_one("resize", "2", LAMP);
    let element = &model["elements"][0];
    assert_eq!(element["from"], json!([0, -8, 0]));
    assert_eq!(element["to"], json!([16, 12, 16]));
    assert_eq!(element["rotation"]["origin"], json!([8, -8, 8]));
    assert_eq!(element["faces"]["up"]["uv"], json!([4, 4, 12, 12]));
    assert_eq!(element["faces"]["east"]["uv"], json!([4, 0, 12, 10]));
    // explicit uv untouched
    assert_eq!(element["faces"]["north"]["uv"], json!([4, 6, 12, 16]));
}

#[test]
fn test_rotate_example_full_cube() {
    let model = run_one(
        "rotate",
        "90,y,8,8,8",
        r#"{ "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16] } ] }"#,
    );
    assert_eq!(model["elements"][0]["from"], json!([0, 0, 0]));
    assert_eq!(model["elements"][0]["to"], json!([16, 16, 16]));
}

#[test]
fn test_rotate_four_times_restores_geometry_and_faces() {
    let original: Value = serde_json::from_str(LAMP).unwrap();
    let mut text = LAMP.to_string();
    let op = Operation::parse("rotate", "90,x").unwrap();
    for _ in 0..4 {
        let out = tools::run(text.as_bytes(), &op, "lamp", &FormatOptions::default()).unwrap();
        text = out.into_iter().next().unwrap().text;
    }
    let model: Value = serde_json::from_str(&text).unwrap();
    let (before, after) = (&original["elements"][0], &model["elements"][0]);
    assert_eq!(after["from"], before["from"]);
    assert_eq!(after["to"], before["to"]);
    assert_eq!(after["rotation"], before["rotation"]);
    for face in ["down", "up", "north", "south", "west", "east"] {
        assert_eq!(after["faces"][face]["texture"], before["faces"][face]["texture"]);
        assert_eq!(after["faces"][face]["cullface"], before["faces"][face]["cullface"]);
        assert_eq!(after["faces"][face]["tintindex"], before["faces"][face]["tintindex"]);
    }
}

#[test]
fn test_rotate_180_about_z_remaps_cullface() {
    let model = run_one("rotate", "180,z", LAMP);
    let faces = &model["elements"][0]["faces"];
    // Z cycle: east -> north -> west -> south; down/up are parallel
    assert_eq!(faces["down"]["cullface"], json!("down"));
    assert_eq!(faces["down"]["rotation"], json!(180));
    assert_eq!(faces["up"]["rotation"], json!(180));
    // north's explicit uv content now sits on south
    assert_eq!(faces["south"]["uv"], json!([4, 6, 12, 16]));
    assert!(faces["north"].get("tintindex").is_some());
}

#[test]
fn test_rotate_rejects_bad_angle_before_reading_model() {
    assert!(matches!(
        Operation::parse("rotate", "45,y"),
        Err(ToolError::InvalidArgument(_))
    ));
}

#[test]
fn test_translate_round_trip() {
    let original: Value = serde_json::from_str(LAMP).unwrap();
    let there = run_one("translate", "1.5,-2,3", LAMP);
    let back = run_one("translate", "-1.5,2,-3", &there.to_string());
    assert_eq!(back["elements"][0]["from"], original["elements"][0]["from"]);
    assert_eq!(back["elements"][0]["to"], original["elements"][0]["to"]);
    assert_eq!(back["elements"][0]["rotation"], original["elements"][0]["rotation"]);
}

#[test]
fn test_resize_item_only_touches_display() {
    let model = run_one(
        "resizeitem",
        "2;firstperson_righthand",
        r#"{
            "parent": "item/handheld",
            "display": {
                "firstperson_righthand": { "rotation": [0, -90, 25], "translation": [1.13, 3.2, 1.13], "scale": [0.68, 0.68, 0.68] },
                "gui": { "scale": [1, 1, 1] }
            }
        }"#,
    );
    assert_eq!(
        model["display"]["firstperson_righthand"]["scale"],
        json!([1.36, 1.36, 1.36])
    );
    assert_eq!(model["display"]["gui"]["scale"], json!([1, 1, 1]));
}

#[test]
fn test_malformed_models_fail_cleanly() {
    let op = Operation::parse("translate", "1,1,1").unwrap();
    let options = FormatOptions::default();
    for input in [
        r#"{ "textures": {} }"#,
        r#"{ "elements": [ { "from": [0, 0], "to": [1, 1, 1] } ] }"#,
        r#"{ "elements": [ { "from": [0, 0, 0], "to": [1, 1, 1], "faces": { "up": 1 } } ] }"#,
        r#"{ "elements": "none" }"#,
        "not json",
    ] {
        assert!(
            matches!(
                tools::run(input.as_bytes(), &op, "m", &options),
                Err(ToolError::MalformedDocument(_))
            ),
            "accepted {input}"
        );
    }
}

#[test]
fn test_coordinate_overflow_fails_instead_of_writing_null() {
    let options = FormatOptions::default();
    let model = r#"{ "elements": [ { "from": [1e308, 0, 0], "to": [1, 1, 1] } ] }"#;
    for (tool, args) in [("resize", "1e10;0,0,0"), ("translate", "1.7e308,0,0")] {
        let op = Operation::parse(tool, args).unwrap();
        let result = tools::run(model.as_bytes(), &op, "m", &options);
        assert!(
            matches!(result, Err(ToolError::MalformedDocument(_))),
            "{tool} produced {result:?}"
        );
    }
}

// ===========================================================================
// Combine
// ===========================================================================

#[test]
fn test_combine_in_memory_variants() {
    use modeltools::tools::combine::{CombineArgs, Member};

    let part = |n: i64| json!({ "elements": [ { "from": [n, 0, 0], "to": [n + 1, 1, 1] } ] });
    let op = Operation::Combine(CombineArgs::new(vec![
        vec![Member::new("l", Some(part(0))), Member::new("r", Some(part(1)))],
        vec![
            Member::new("a", Some(part(2))),
            Member::new("b", Some(part(3))),
            Member::new("c", Some(part(4))),
        ],
    ]));

    let base: Value = serde_json::from_str(LAMP).unwrap();
    let outcome = op.apply(base, "lamp").unwrap();
    let Outcome::Variants(variants) = outcome else {
        panic!("combine did not produce variants");
    };
    assert_eq!(variants.len(), 6);
    for variant in &variants {
        assert_eq!(variant.document["elements"].as_array().unwrap().len(), 3);
        assert!(variant.name.starts_with("lamp_"));
    }
    assert_eq!(variants[0].name, "lamp_l_a");
    assert_eq!(variants[5].name, "lamp_r_c");
}

// ===========================================================================
// Formatter
// ===========================================================================

#[test]
fn test_formatter_is_idempotent_on_tool_output() {
    let op = Operation::parse("rotate", "270,y").unwrap();
    let out = tools::run(LAMP.as_bytes(), &op, "lamp", &FormatOptions::default()).unwrap();
    let text = &out[0].text;
    assert_eq!(&formatter::format(text, &FormatOptions::default()).unwrap(), text);
}

#[test]
fn test_formatter_preserves_already_formatted_input() {
    let expected = format!("{LAMP}\n");
    assert_eq!(
        formatter::format(LAMP, &FormatOptions::default()).unwrap(),
        expected
    );
}

#[test]
fn test_custom_indent() {
    let options = FormatOptions {
        indent: "\t".to_string(),
    };
    let text = formatter::format(r#"{"elements":[{"from":[0,0,0]}]}"#, &options).unwrap();
    assert_eq!(text, "{\n\t\"elements\": [\n\t\t{\n\t\t\t\"from\": [ 0, 0, 0 ]\n\t\t}\n\t]\n}\n");
}
