#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::doc::{DateMode, ElementKind, ElementType, FontWeight, HorizontalAlign};

fn sample_doc() -> LabelDocument {
    let mut date = Element::new(ElementType::DateField);
    date.kind.set_key("Fecha".into());
    let mut qr = Element::new(ElementType::Qr);
    if let ElementKind::Qr(q) = &mut qr.kind {
        q.qr_content = "lote {{Fecha}}".into();
    }
    LabelDocument {
        id: None,
        name: "Queso".into(),
        canvas: Canvas { width: 100.0, height: 50.0, rotation: 90.0 },
        elements: vec![Element::new(ElementType::Text), date, qr, Element::new(ElementType::Line)],
    }
}

#[test]
fn export_strips_ids() {
    let value = export_value(&sample_doc());
    let elements = value["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 4);
    assert!(elements.iter().all(|e| e.get("id").is_none()));
    assert_eq!(value["canvas"]["rotation"], json!(90.0));
    assert_eq!(value["name"], "Queso");
}

#[test]
fn round_trip_keeps_content_with_fresh_ids() {
    let doc = sample_doc();
    let text = export_json(&doc).unwrap();
    let back = import_json(&text, "x").unwrap();

    assert_eq!(back.name, doc.name);
    assert_eq!(back.canvas, doc.canvas);
    assert_eq!(back.elements.len(), doc.elements.len());
    for (a, b) in doc.elements.iter().zip(&back.elements) {
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.rect(), b.rect());
    }
}

#[test]
fn import_normalizes_legacy_style() {
    let doc = import_value(
        json!({
            "name": "n",
            "canvas": {"width": 60, "height": 40},
            "elements": [{"type": "text", "x": 1, "y": 2, "width": 10, "height": 5, "text": "hola",
                          "fontWeight": 700, "textAlign": "center"}]
        }),
        "d",
    )
    .unwrap();
    let style = doc.elements[0].kind.style().unwrap();
    assert_eq!(style.font_weight, FontWeight::Bold);
    assert_eq!(style.horizontal_align, HorizontalAlign::Center);
    assert_eq!(doc.elements[0].rotation, 0.0);
    assert_eq!(doc.canvas.rotation, 0.0);
}

#[test]
fn import_ignores_incoming_ids() {
    let id = Uuid::new_v4();
    let doc = import_value(
        json!({
            "canvas": {"width": 60, "height": 40},
            "elements": [{"id": id.to_string(), "type": "qr", "x": 0, "y": 0, "width": 10, "height": 10}]
        }),
        "d",
    )
    .unwrap();
    assert_ne!(doc.elements[0].id, id);
}

#[test]
fn import_accepts_empty_elements_and_defaults_name() {
    let doc = import_value(json!({"name": "  ", "elements": [], "canvas": {"width": 10, "height": 10}}), "Nueva").unwrap();
    assert!(doc.elements.is_empty());
    assert_eq!(doc.name, "Nueva");
    assert!(doc.id.is_none());
}

#[test]
fn import_reads_lenient_day_offsets() {
    let doc = import_value(
        json!({
            "canvas": {"width": 60, "height": 40},
            "elements": [{"type": "dateField", "x": 0, "y": 0, "width": 10, "height": 5, "key": "Cad",
                          "dateMode": "fieldOffset", "fieldRef": "Fecha", "fieldOffsetDays": "30"}]
        }),
        "d",
    )
    .unwrap();
    let ElementKind::DateField(f) = &doc.elements[0].kind else {
        panic!("expected date field");
    };
    assert_eq!(f.date_mode, DateMode::FieldOffset);
    assert_eq!(f.field_offset_days, 30);
}

#[test]
fn rejects_non_object() {
    assert!(matches!(import_value(json!([1, 2]), "d"), Err(ImportError::NotAnObject)));
    assert!(matches!(import_json("not json", "d"), Err(ImportError::Parse(_))));
}

#[test]
fn rejects_non_array_elements() {
    let err = import_value(json!({"elements": {}, "canvas": {"width": 1, "height": 1}}), "d").unwrap_err();
    assert!(matches!(err, ImportError::ElementsNotArray));
}

#[test]
fn rejects_missing_or_null_elements() {
    let missing = import_json(r#"{"name": "x", "canvas": {"width": 10, "height": 10}}"#, "d");
    assert!(matches!(missing, Err(ImportError::ElementsNotArray)));
    let null = import_json(r#"{"name": "x", "elements": null, "canvas": {"width": 10, "height": 10}}"#, "d");
    assert!(matches!(null, Err(ImportError::ElementsNotArray)));
}

#[test]
fn rejects_bad_canvas() {
    assert!(matches!(import_value(json!({"elements": []}), "d"), Err(ImportError::MissingCanvas)));
    assert!(matches!(
        import_value(json!({"elements": [], "canvas": {"width": "10", "height": 5}}), "d"),
        Err(ImportError::InvalidCanvas(_))
    ));
    assert!(matches!(
        import_value(json!({"elements": [], "canvas": {"width": 10, "height": 5, "rotation": 45}}), "d"),
        Err(ImportError::InvalidCanvas(_))
    ));
}

#[test]
fn rejects_unknown_element_type_with_index() {
    let err = import_value(
        json!({
            "canvas": {"width": 60, "height": 40},
            "elements": [
                {"type": "text", "x": 0, "y": 0, "width": 10, "height": 5},
                {"type": "hologram", "x": 0, "y": 0, "width": 10, "height": 5}
            ]
        }),
        "d",
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::InvalidElement { index: 1, .. }));
    assert_eq!(err.error_code(), "E_IMPORT_ELEMENT");
}
