//! Document model: label elements, their styles, the canvas, and the document.
//!
//! An [`Element`] is a shared geometry base (`x`, `y`, `width`, `height`,
//! `rotation`, all in millimeters/degrees) plus an [`ElementKind`] payload that
//! is tagged on the wire by `"type"`. Only the fields legal for a kind exist on
//! its variant. Text-bearing kinds carry a [`TextStyle`]; lines carry their own
//! stroke properties.
//!
//! Typed values here are always canonical. Raw JSON coming from storage, import
//! or partial updates is canonicalised by [`crate::style::normalize_value`]
//! before it is deserialized (see [`Element::from_value`]).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH_MM, MIN_ELEMENT_SIZE_MM, NEW_ELEMENT_POS_MM};
use crate::style;
use crate::viewport::Rect;

/// Unique identifier for an element. Assigned locally, never trusted from input.
pub type ElementId = Uuid;

/// Identifier of a persisted label.
pub type LabelId = Uuid;

// =============================================================
// Style enums
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// How a date field produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateMode {
    /// `sample` is used verbatim.
    #[default]
    Manual,
    /// Today, shifted by `systemOffsetDays`.
    System,
    /// Same as `System`; kept distinct because editors present it differently.
    SystemOffset,
    /// Another date field's value, shifted by `fieldOffsetDays`.
    FieldOffset,
}

/// Typography shared by every text-bearing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub horizontal_align: HorizontalAlign,
    /// Legacy mirror of `horizontal_align`; older readers still look here.
    pub text_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            horizontal_align: HorizontalAlign::Left,
            text_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Start,
            color: DEFAULT_COLOR.to_owned(),
        }
    }
}

// =============================================================
// Element payloads
// =============================================================

/// Static text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextElement {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Text bound to a catalog path such as `product.name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundField {
    pub field: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Free value typed by the operator at print time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualField {
    pub key: String,
    pub sample: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Value picked from a fixed option list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectField {
    pub key: String,
    pub sample: String,
    pub options: Vec<String>,
    #[serde(flatten)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxField {
    pub key: String,
    pub content: String,
    pub checked: bool,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// A date, either fixed, relative to today, or relative to another date field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateField {
    pub key: String,
    pub sample: String,
    pub date_mode: DateMode,
    #[serde(deserialize_with = "deserialize_days")]
    pub system_offset_days: i64,
    /// Key of the date field this one is computed from (`fieldOffset` only).
    pub field_ref: String,
    #[serde(deserialize_with = "deserialize_days")]
    pub field_offset_days: i64,
    #[serde(flatten)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Barcode {
    pub barcode_content: String,
    /// Symbology name passed through to the renderer, e.g. `CODE128`.
    pub format: String,
}

impl Default for Barcode {
    fn default() -> Self {
        Self { barcode_content: String::new(), format: "CODE128".to_owned() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrCode {
    pub qr_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Line {
    pub direction: LineDirection,
    pub stroke_width: f64,
    pub color: String,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            direction: LineDirection::Horizontal,
            stroke_width: DEFAULT_STROKE_WIDTH_MM,
            color: DEFAULT_COLOR.to_owned(),
        }
    }
}

/// Oval health-registry stamp: country code, registry number, suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SanitaryRegister {
    pub country_code: String,
    pub registry_number: String,
    pub suffix: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Rich paragraph stored as HTML; may contain `{{key}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub html: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Kind-specific payload of an element, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Text(TextElement),
    Field(BoundField),
    ManualField(ManualField),
    SelectField(SelectField),
    CheckboxField(CheckboxField),
    DateField(DateField),
    Barcode(Barcode),
    Qr(QrCode),
    Line(Line),
    SanitaryRegister(SanitaryRegister),
    Paragraph(Paragraph),
}

/// Payload-free discriminant of [`ElementKind`], used to request new elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Text,
    Field,
    ManualField,
    SelectField,
    CheckboxField,
    DateField,
    Barcode,
    Qr,
    Line,
    SanitaryRegister,
    Paragraph,
}

impl ElementType {
    /// Wire name of the type, as it appears in the `"type"` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Field => "field",
            Self::ManualField => "manualField",
            Self::SelectField => "selectField",
            Self::CheckboxField => "checkboxField",
            Self::DateField => "dateField",
            Self::Barcode => "barcode",
            Self::Qr => "qr",
            Self::Line => "line",
            Self::SanitaryRegister => "sanitaryRegister",
            Self::Paragraph => "paragraph",
        }
    }

    /// Whether elements of this type carry a document-unique `key`.
    #[must_use]
    pub fn is_key_bearing(self) -> bool {
        matches!(self, Self::ManualField | Self::SelectField | Self::CheckboxField | Self::DateField)
    }

    /// Base used when generating a fresh key for a new element of this type.
    #[must_use]
    pub fn default_key_base(self) -> Option<&'static str> {
        match self {
            Self::ManualField => Some("Campo"),
            Self::SelectField => Some("Opcion"),
            Self::CheckboxField => Some("Casilla"),
            Self::DateField => Some("Fecha"),
            _ => None,
        }
    }

    /// Starter payload and size for a freshly added element.
    #[must_use]
    pub fn defaults(self) -> (ElementKind, f64, f64) {
        match self {
            Self::Text => (ElementKind::Text(TextElement { text: "Texto".to_owned(), ..Default::default() }), 40.0, 8.0),
            Self::Field => (
                ElementKind::Field(BoundField { field: "product.name".to_owned(), ..Default::default() }),
                40.0,
                8.0,
            ),
            Self::ManualField => (ElementKind::ManualField(ManualField::default()), 40.0, 8.0),
            Self::SelectField => (
                ElementKind::SelectField(SelectField {
                    options: vec!["Opcion 1".to_owned(), "Opcion 2".to_owned()],
                    ..Default::default()
                }),
                40.0,
                8.0,
            ),
            Self::CheckboxField => (
                ElementKind::CheckboxField(CheckboxField { content: "Casilla".to_owned(), ..Default::default() }),
                30.0,
                6.0,
            ),
            Self::DateField => (
                ElementKind::DateField(DateField { date_mode: DateMode::System, ..Default::default() }),
                30.0,
                6.0,
            ),
            Self::Barcode => (
                ElementKind::Barcode(Barcode { barcode_content: "123456789012".to_owned(), ..Default::default() }),
                50.0,
                15.0,
            ),
            Self::Qr => (ElementKind::Qr(QrCode { qr_content: "https://".to_owned() }), 20.0, 20.0),
            Self::Line => (ElementKind::Line(Line::default()), 50.0, MIN_ELEMENT_SIZE_MM),
            Self::SanitaryRegister => (
                ElementKind::SanitaryRegister(SanitaryRegister {
                    country_code: "ES".to_owned(),
                    registry_number: "00.00000/X".to_owned(),
                    suffix: "CE".to_owned(),
                    style: TextStyle::default(),
                }),
                25.0,
                15.0,
            ),
            Self::Paragraph => (
                ElementKind::Paragraph(Paragraph { html: "<p>Texto</p>".to_owned(), ..Default::default() }),
                60.0,
                20.0,
            ),
        }
    }
}

impl ElementKind {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Field(_) => ElementType::Field,
            Self::ManualField(_) => ElementType::ManualField,
            Self::SelectField(_) => ElementType::SelectField,
            Self::CheckboxField(_) => ElementType::CheckboxField,
            Self::DateField(_) => ElementType::DateField,
            Self::Barcode(_) => ElementType::Barcode,
            Self::Qr(_) => ElementType::Qr,
            Self::Line(_) => ElementType::Line,
            Self::SanitaryRegister(_) => ElementType::SanitaryRegister,
            Self::Paragraph(_) => ElementType::Paragraph,
        }
    }

    /// The document-unique key of a key-bearing element.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ManualField(f) => Some(&f.key),
            Self::SelectField(f) => Some(&f.key),
            Self::CheckboxField(f) => Some(&f.key),
            Self::DateField(f) => Some(&f.key),
            _ => None,
        }
    }

    /// Replace the key of a key-bearing element. Returns false for other kinds.
    pub fn set_key(&mut self, key: String) -> bool {
        match self {
            Self::ManualField(f) => f.key = key,
            Self::SelectField(f) => f.key = key,
            Self::CheckboxField(f) => f.key = key,
            Self::DateField(f) => f.key = key,
            _ => return false,
        }
        true
    }

    /// Text style, for text-bearing kinds.
    #[must_use]
    pub fn style(&self) -> Option<&TextStyle> {
        match self {
            Self::Text(e) => Some(&e.style),
            Self::Field(e) => Some(&e.style),
            Self::ManualField(e) => Some(&e.style),
            Self::SelectField(e) => Some(&e.style),
            Self::CheckboxField(e) => Some(&e.style),
            Self::DateField(e) => Some(&e.style),
            Self::SanitaryRegister(e) => Some(&e.style),
            Self::Paragraph(e) => Some(&e.style),
            Self::Barcode(_) | Self::Qr(_) | Self::Line(_) => None,
        }
    }

    /// Free-text content that may reference other fields via `{{key}}`.
    #[must_use]
    pub fn placeholder_text(&self) -> Option<&str> {
        match self {
            Self::Paragraph(p) => Some(&p.html),
            Self::Qr(q) => Some(&q.qr_content),
            Self::Barcode(b) => Some(&b.barcode_content),
            _ => None,
        }
    }

    /// Mutable access to the placeholder-bearing content, if any.
    pub fn placeholder_text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Paragraph(p) => Some(&mut p.html),
            Self::Qr(q) => Some(&mut q.qr_content),
            Self::Barcode(b) => Some(&mut b.barcode_content),
            _ => None,
        }
    }
}

// =============================================================
// Element
// =============================================================

/// One placeable item on the label canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Element-local clockwise rotation in degrees, `0..360`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Build a new element of `ty` with its starter payload and a fresh id.
    #[must_use]
    pub fn new(ty: ElementType) -> Self {
        let (kind, width, height) = ty.defaults();
        Self {
            id: Uuid::new_v4(),
            x: NEW_ELEMENT_POS_MM,
            y: NEW_ELEMENT_POS_MM,
            width,
            height,
            rotation: 0.0,
            kind,
        }
    }

    /// Canonicalise and deserialize a raw JSON element.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the value is not an object, carries an
    /// unknown `type`, or has fields of the wrong shape.
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        style::normalize_value(&mut value);
        let mut element: Self = serde_json::from_value(value)?;
        element.sanitize_geometry();
        Ok(element)
    }

    /// Serialize to the wire representation.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        // Plain structs with string keys always serialize.
        serde_json::to_value(self).unwrap_or_default()
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.kind.key()
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Floor the size at the minimum and wrap rotation into `0..360`.
    pub fn sanitize_geometry(&mut self) {
        if !self.width.is_finite() || self.width < MIN_ELEMENT_SIZE_MM {
            self.width = MIN_ELEMENT_SIZE_MM;
        }
        if !self.height.is_finite() || self.height < MIN_ELEMENT_SIZE_MM {
            self.height = MIN_ELEMENT_SIZE_MM;
        }
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        self.rotation = if self.rotation.is_finite() { self.rotation.rem_euclid(360.0) } else { 0.0 };
    }
}

// =============================================================
// Canvas and document
// =============================================================

/// The label's page area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in millimeters.
    pub width: f64,
    /// Height in millimeters.
    pub height: f64,
    /// Orientation in degrees: 0, 90, 180 or 270.
    #[serde(default)]
    pub rotation: f64,
}

impl Canvas {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, rotation: 0.0 }
    }
}

/// A whole label: canvas plus elements in z-order (last is front-most).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    /// Persisted id; `None` for an unsaved draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LabelId>,
    pub name: String,
    pub canvas: Canvas,
    pub elements: Vec<Element>,
}

/// Accept integer day offsets written as floats or numeric strings.
fn deserialize_days<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Int(i64),
        Float(f64),
        Text(String),
        Null,
    }

    #[allow(clippy::cast_possible_truncation)]
    let days = match Days::deserialize(deserializer)? {
        Days::Int(n) => n,
        Days::Float(f) if f.is_finite() => f.round() as i64,
        Days::Float(_) => 0,
        Days::Text(s) => s.trim().parse::<i64>().unwrap_or(0),
        Days::Null => 0,
    };
    Ok(days)
}
