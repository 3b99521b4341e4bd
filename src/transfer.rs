//! Document import/export and shape validation.
//!
//! Export writes `{name, elements, canvas}` with element ids stripped. Import
//! validates the top-level shape, assigns fresh ids, and normalizes every
//! element. It builds a complete [`LabelDocument`] before returning, so a
//! failure never reaches the caller's state.

#[cfg(test)]
#[path = "transfer_test.rs"]
mod transfer_test;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::doc::{Canvas, Element, LabelDocument};
use crate::error::ErrorCode;
use crate::orient;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("\"elements\" must be an array")]
    ElementsNotArray,
    #[error("document has no \"canvas\"")]
    MissingCanvas,
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
    #[error("element {index} is invalid: {reason}")]
    InvalidElement { index: usize, reason: String },
}

impl ErrorCode for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_IMPORT_PARSE",
            Self::NotAnObject => "E_IMPORT_NOT_OBJECT",
            Self::ElementsNotArray => "E_IMPORT_ELEMENTS",
            Self::MissingCanvas => "E_IMPORT_NO_CANVAS",
            Self::InvalidCanvas(_) => "E_IMPORT_CANVAS",
            Self::InvalidElement { .. } => "E_IMPORT_ELEMENT",
        }
    }
}

/// Structured export of `doc`. Element ids are omitted.
#[must_use]
pub fn export_value(doc: &LabelDocument) -> Value {
    let elements: Vec<Value> = doc
        .elements
        .iter()
        .map(|e| {
            let mut v = e.to_value();
            if let Some(fields) = v.as_object_mut() {
                fields.remove("id");
            }
            v
        })
        .collect();
    json!({
        "name": doc.name,
        "elements": elements,
        "canvas": {
            "width": doc.canvas.width,
            "height": doc.canvas.height,
            "rotation": doc.canvas.rotation,
        },
    })
}

/// Pretty-printed JSON export.
///
/// # Errors
///
/// Returns the serializer error, which only occurs on writer failure.
pub fn export_json(doc: &LabelDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_value(doc))
}

/// Parse and validate a document from JSON text.
///
/// # Errors
///
/// See [`import_value`]; additionally `Parse` for malformed JSON.
pub fn import_json(text: &str, default_name: &str) -> Result<LabelDocument, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    import_value(value, default_name)
}

/// Validate a structured document and build it with fresh element ids.
///
/// `default_name` is used when the document carries no usable name.
///
/// # Errors
///
/// Fails when the value is not an object, `elements` is not an array,
/// `canvas` is missing or lacks numeric `width`/`height`, or an element does
/// not describe a valid element of a known type.
pub fn import_value(value: Value, default_name: &str) -> Result<LabelDocument, ImportError> {
    let Value::Object(mut root) = value else {
        return Err(ImportError::NotAnObject);
    };

    let raw_elements = match root.remove("elements") {
        Some(Value::Array(items)) => items,
        _ => return Err(ImportError::ElementsNotArray),
    };

    let canvas = match root.get("canvas") {
        None | Some(Value::Null) => return Err(ImportError::MissingCanvas),
        Some(Value::Object(c)) => parse_canvas(c)?,
        Some(_) => return Err(ImportError::InvalidCanvas("canvas must be an object".into())),
    };

    let elements = raw_elements
        .into_iter()
        .enumerate()
        .map(|(index, raw)| import_element(index, raw))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| warn!(error = %e, "import rejected"))?;

    let name = root
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(default_name)
        .to_owned();

    debug!(elements = elements.len(), width = canvas.width, height = canvas.height, "document imported");
    Ok(LabelDocument { id: None, name, canvas, elements })
}

fn parse_canvas(raw: &Map<String, Value>) -> Result<Canvas, ImportError> {
    let dimension = |field: &str| -> Result<f64, ImportError> {
        match raw.get(field).and_then(Value::as_f64) {
            Some(v) if v.is_finite() && v > 0.0 => Ok(v),
            Some(v) => Err(ImportError::InvalidCanvas(format!("{field} must be positive, got {v}"))),
            None => Err(ImportError::InvalidCanvas(format!("{field} must be a number"))),
        }
    };
    let width = dimension("width")?;
    let height = dimension("height")?;
    let rotation = match raw.get("rotation") {
        None | Some(Value::Null) => 0,
        Some(v) => {
            let angle = v.as_f64().ok_or_else(|| ImportError::InvalidCanvas("rotation must be a number".into()))?;
            orient::normalize_angle(angle).map_err(|e| ImportError::InvalidCanvas(e.to_string()))?
        }
    };
    Ok(Canvas { width, height, rotation: f64::from(rotation) })
}

fn import_element(index: usize, raw: Value) -> Result<Element, ImportError> {
    let Value::Object(mut fields) = raw else {
        return Err(ImportError::InvalidElement { index, reason: "element must be an object".into() });
    };
    fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    if fields.get("rotation").is_none_or(Value::is_null) {
        fields.insert("rotation".into(), json!(0));
    }
    Element::from_value(Value::Object(fields)).map_err(|e| ImportError::InvalidElement { index, reason: e.to_string() })
}
