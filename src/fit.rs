//! Auto-fit: size a text element to its resolved content.
//!
//! Measurement is delegated to a [`TextMeasurer`] (an offscreen canvas in a
//! browser host). The measured pixel box is converted to millimeters, grown
//! by [`FIT_MARGIN_MM`] on each axis, floored at [`FIT_MIN_SIZE_MM`], and
//! written through the store's update gateway.

#[cfg(test)]
#[path = "fit_test.rs"]
mod fit_test;

use serde_json::json;
use tracing::debug;

use crate::consts::{FIT_MARGIN_MM, FIT_MIN_SIZE_MM, PX_PER_MM};
use crate::doc::{Canvas, ElementId, ElementKind, FontWeight, TextStyle};
use crate::error::ErrorCode;
use crate::geometry::clamp_rect;
use crate::store::{ElementPatch, ElementStore, StoreError};
use crate::viewport::Rect;

#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("element {0} has no text to fit")]
    NotText(ElementId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for FitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::NotText(_) => "E_NOT_TEXT",
            Self::Store(e) => e.error_code(),
        }
    }
}

/// Pixel footprint of rendered text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width_px: f64,
    pub height_px: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextSize;
}

/// Fixed-advance measurer: every glyph is `advance` × font size wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6, line_height: 1.2 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, style: &TextStyle) -> TextSize {
        let weight = if style.font_weight == FontWeight::Bold { 1.1 } else { 1.0 };
        let lines: Vec<&str> = text.lines().collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        TextSize {
            width_px: widest as f64 * style.font_size * self.advance * weight,
            height_px: lines.len().max(1) as f64 * style.font_size * self.line_height,
        }
    }
}

/// Width and height in millimeters for a measured box.
#[must_use]
pub fn fitted_size(size: TextSize) -> (f64, f64) {
    let to_mm = |px: f64| (px / PX_PER_MM + FIT_MARGIN_MM).max(FIT_MIN_SIZE_MM);
    (to_mm(size.width_px), to_mm(size.height_px))
}

/// Visible text of paragraph HTML: block ends and `<br>` become newlines,
/// other tags are dropped.
#[must_use]
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            rest = &rest[open..];
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        if tag.starts_with("br") || tag == "/p" || tag == "/div" {
            out.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out.trim_end_matches('\n').to_owned()
}

/// Resize element `id` to fit `text` and return its new box.
///
/// The box keeps its top-left unless it would leave the canvas.
///
/// # Errors
///
/// `NotFound` for an unknown id, `NotText` for kinds without a text style,
/// `Store` if the update is rejected.
pub fn auto_fit(
    store: &mut ElementStore,
    canvas: &Canvas,
    id: &ElementId,
    text: &str,
    measurer: &dyn TextMeasurer,
) -> Result<Rect, FitError> {
    let element = store.get(id).ok_or(FitError::NotFound(*id))?;
    let style = element.kind.style().ok_or(FitError::NotText(*id))?;
    let visible = match &element.kind {
        ElementKind::Paragraph(_) => plain_text(text),
        _ => text.to_owned(),
    };

    let (width, height) = fitted_size(measurer.measure(&visible, style));
    let rect = clamp_rect(Rect::new(element.x, element.y, width, height), canvas);

    let mut patch = ElementPatch::new();
    patch.insert("x".into(), json!(rect.x));
    patch.insert("y".into(), json!(rect.y));
    patch.insert("width".into(), json!(rect.width));
    patch.insert("height".into(), json!(rect.height));
    store.update(id, &patch)?;

    debug!(%id, width = rect.width, height = rect.height, "element auto-fitted");
    Ok(rect)
}
