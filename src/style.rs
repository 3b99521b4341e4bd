//! Style normalizer: canonicalises the style fields of a raw element value.
//!
//! DESIGN
//! ======
//! Normalization runs on the JSON form of an element, once, on the single
//! write path (store updates, inserts, imports, loads). After it every style
//! field holds exactly one value from its enumerated domain, so typed readers
//! never see a missing field or a legacy alias such as `fontWeight: 700`.
//!
//! The function is total: non-object input (including `null`) is left alone,
//! unknown values collapse to the field default. It only touches style fields
//! and is idempotent.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use serde_json::{Map, Value};

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH_MM};

pub const FONT_WEIGHTS: &[&str] = &["normal", "bold"];
pub const FONT_STYLES: &[&str] = &["normal", "italic"];
pub const TEXT_DECORATIONS: &[&str] = &["none", "underline", "line-through"];
pub const TEXT_TRANSFORMS: &[&str] = &["none", "uppercase", "lowercase", "capitalize"];
pub const HORIZONTAL_ALIGNS: &[&str] = &["left", "center", "right", "justify"];
pub const VERTICAL_ALIGNS: &[&str] = &["start", "center", "end"];
pub const LINE_DIRECTIONS: &[&str] = &["horizontal", "vertical"];

/// Element types whose payload has no text style.
const UNSTYLED_TYPES: &[&str] = &["barcode", "qr", "line"];

/// Canonicalise every style field of `element` in place.
pub fn normalize_value(element: &mut Value) {
    let Some(map) = element.as_object_mut() else {
        return;
    };
    let kind = map.get("type").and_then(Value::as_str).unwrap_or_default().to_owned();

    if kind == "line" {
        normalize_line(map);
    } else if !UNSTYLED_TYPES.contains(&kind.as_str()) {
        normalize_text_style(map);
    }
}

/// Return a normalized copy of `element`.
#[must_use]
pub fn normalized(element: &Value) -> Value {
    let mut out = element.clone();
    normalize_value(&mut out);
    out
}

fn normalize_text_style(map: &mut Map<String, Value>) {
    let font_size = map
        .get("fontSize")
        .and_then(numeric)
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE);
    map.insert("fontSize".into(), Value::from(font_size));

    let weight = font_weight(map.get("fontWeight"));
    map.insert("fontWeight".into(), Value::from(weight));

    let style = match map.get("fontStyle").and_then(Value::as_str) {
        Some("italic" | "oblique") => "italic",
        _ => "normal",
    };
    map.insert("fontStyle".into(), Value::from(style));

    let decoration = one_of(map.get("textDecoration"), TEXT_DECORATIONS, "none");
    map.insert("textDecoration".into(), Value::from(decoration));

    let transform = one_of(map.get("textTransform"), TEXT_TRANSFORMS, "none");
    map.insert("textTransform".into(), Value::from(transform));

    // An explicit horizontalAlign wins; the legacy textAlign only fills a gap.
    let raw_align = map.get("horizontalAlign").filter(|v| !v.is_null()).or_else(|| map.get("textAlign"));
    let align = one_of(raw_align, HORIZONTAL_ALIGNS, "left");
    map.insert("horizontalAlign".into(), Value::from(align));
    map.insert("textAlign".into(), Value::from(align));

    let vertical = one_of(map.get("verticalAlign"), VERTICAL_ALIGNS, "start");
    map.insert("verticalAlign".into(), Value::from(vertical));

    normalize_color(map);
}

fn normalize_line(map: &mut Map<String, Value>) {
    let direction = one_of(map.get("direction"), LINE_DIRECTIONS, "horizontal");
    map.insert("direction".into(), Value::from(direction));

    let stroke = map
        .get("strokeWidth")
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(DEFAULT_STROKE_WIDTH_MM);
    map.insert("strokeWidth".into(), Value::from(stroke));

    normalize_color(map);
}

fn normalize_color(map: &mut Map<String, Value>) {
    let color = map
        .get("color")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COLOR)
        .to_owned();
    map.insert("color".into(), Value::String(color));
}

/// `700` and `"700"` are bold; `"bold"` stays bold; everything else is normal.
fn font_weight(raw: Option<&Value>) -> &'static str {
    match raw {
        Some(Value::String(s)) if s == "bold" || s.trim() == "700" => "bold",
        Some(Value::Number(n)) if n.as_f64() == Some(700.0) => "bold",
        _ => "normal",
    }
}

fn one_of(raw: Option<&Value>, allowed: &[&'static str], default: &'static str) -> &'static str {
    raw.and_then(Value::as_str)
        .and_then(|s| allowed.iter().copied().find(|a| *a == s))
        .unwrap_or(default)
}

/// Numbers, or strings that parse as numbers (`"14"`, `"9.5"`).
fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().map_or(None, Some),
        _ => None,
    }
}
