#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

const ALL_TYPES: [ElementType; 11] = [
    ElementType::Text,
    ElementType::Field,
    ElementType::ManualField,
    ElementType::SelectField,
    ElementType::CheckboxField,
    ElementType::DateField,
    ElementType::Barcode,
    ElementType::Qr,
    ElementType::Line,
    ElementType::SanitaryRegister,
    ElementType::Paragraph,
];

#[test]
fn new_elements_match_their_type() {
    for ty in ALL_TYPES {
        let el = Element::new(ty);
        assert_eq!(el.element_type(), ty);
        assert_eq!((el.x, el.y), (NEW_ELEMENT_POS_MM, NEW_ELEMENT_POS_MM));
        assert!(el.width >= MIN_ELEMENT_SIZE_MM && el.height >= MIN_ELEMENT_SIZE_MM);
        assert_eq!(el.rotation, 0.0);
    }
}

#[test]
fn wire_tag_matches_as_str() {
    for ty in ALL_TYPES {
        let value = Element::new(ty).to_value();
        assert_eq!(value["type"], ty.as_str());
        assert_eq!(serde_json::to_value(ty).unwrap(), ty.as_str());
    }
}

#[test]
fn every_default_survives_from_value() {
    for ty in ALL_TYPES {
        let el = Element::new(ty);
        assert_eq!(Element::from_value(el.to_value()).unwrap(), el, "{}", ty.as_str());
    }
}

#[test]
fn key_bearing_types() {
    let keyed: Vec<_> = ALL_TYPES.into_iter().filter(|t| t.is_key_bearing()).collect();
    assert_eq!(
        keyed,
        vec![ElementType::ManualField, ElementType::SelectField, ElementType::CheckboxField, ElementType::DateField]
    );
    for ty in ALL_TYPES {
        assert_eq!(ty.is_key_bearing(), ty.default_key_base().is_some());
    }
}

#[test]
fn set_key_only_on_key_bearing() {
    let mut manual = Element::new(ElementType::ManualField);
    assert!(manual.kind.set_key("Lote".into()));
    assert_eq!(manual.key(), Some("Lote"));

    let mut text = Element::new(ElementType::Text);
    assert!(!text.kind.set_key("Lote".into()));
    assert_eq!(text.key(), None);
}

#[test]
fn placeholder_text_kinds() {
    assert!(Element::new(ElementType::Paragraph).kind.placeholder_text().is_some());
    assert!(Element::new(ElementType::Qr).kind.placeholder_text().is_some());
    assert!(Element::new(ElementType::Barcode).kind.placeholder_text().is_some());
    assert!(Element::new(ElementType::Text).kind.placeholder_text().is_none());
}

#[test]
fn style_absent_for_graphics() {
    assert!(Element::new(ElementType::Line).kind.style().is_none());
    assert!(Element::new(ElementType::Qr).kind.style().is_none());
    assert!(Element::new(ElementType::DateField).kind.style().is_some());
}

#[test]
fn from_value_normalizes_and_sanitizes() {
    let el = Element::from_value(json!({
        "id": Uuid::new_v4(),
        "type": "text",
        "x": 5, "y": 5, "width": 0.5, "height": -3,
        "rotation": -90,
        "text": "hola",
        "fontWeight": "700",
        "fontStyle": "oblique",
    }))
    .unwrap();
    let style = el.kind.style().unwrap();
    assert_eq!(style.font_weight, FontWeight::Bold);
    assert_eq!(style.font_style, FontStyle::Italic);
    assert_eq!(style.vertical_align, VerticalAlign::Start);
    assert_eq!((el.width, el.height), (MIN_ELEMENT_SIZE_MM, MIN_ELEMENT_SIZE_MM));
    assert_eq!(el.rotation, 270.0);
}

#[test]
fn from_value_rejects_unknown_type() {
    let err = Element::from_value(json!({"id": Uuid::new_v4(), "type": "sticker", "x": 0, "y": 0, "width": 5, "height": 5}));
    assert!(err.is_err());
}

#[test]
fn line_has_no_text_style_on_the_wire() {
    let value = Element::new(ElementType::Line).to_value();
    assert!(value.get("fontSize").is_none());
    assert_eq!(value["strokeWidth"], json!(0.1));
    assert_eq!(value["direction"], "horizontal");
}

#[test]
fn day_offsets_are_lenient() {
    for (raw, expected) in [(json!(3), 3), (json!(2.6), 3), (json!("-7"), -7), (json!("x"), 0), (json!(null), 0)] {
        let el = Element::from_value(json!({
            "id": Uuid::new_v4(),
            "type": "dateField",
            "x": 0, "y": 0, "width": 10, "height": 5,
            "dateMode": "systemOffset",
            "systemOffsetDays": raw,
        }))
        .unwrap();
        let ElementKind::DateField(f) = &el.kind else { panic!("date field expected") };
        assert_eq!(f.system_offset_days, expected);
        assert_eq!(f.date_mode, DateMode::SystemOffset);
    }
}

#[test]
fn document_id_is_optional_on_the_wire() {
    let doc = LabelDocument { id: None, name: "n".into(), canvas: Canvas::new(10.0, 5.0), elements: Vec::new() };
    let value = serde_json::to_value(&doc).unwrap();
    assert!(value.get("id").is_none());
    let back: LabelDocument = serde_json::from_value(json!({"name": "n", "canvas": {"width": 10, "height": 5}, "elements": []}))
        .unwrap();
    assert_eq!(back, doc);
}
