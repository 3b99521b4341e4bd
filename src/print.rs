//! Print preparation.
//!
//! Before a label goes to the print collaborator every field is resolved and
//! the canvas is sized in pixels. Labels with manual fields need an explicit
//! value-entry step first: [`prepare`] refuses to build a job without them,
//! and the supplied values replace each field's sample for this job only.

#[cfg(test)]
#[path = "print_test.rs"]
mod print_test;

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::consts::MM_PER_INCH;
use crate::doc::{Canvas, Element, ElementId, ElementKind, ElementType};
use crate::error::ErrorCode;
use crate::resolve::{self, ResolveContext, ResolvedValues};
use crate::viewport::Rect;

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("values required for manual fields: {}", .0.join(", "))]
    ManualValuesRequired(Vec<String>),
    #[error("print target failed: {0}")]
    Target(String),
}

impl ErrorCode for PrintError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ManualValuesRequired(_) => "E_MANUAL_VALUES_REQUIRED",
            Self::Target(_) => "E_PRINT_TARGET",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Target(_))
    }
}

/// One element as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub rect: Rect,
    pub rotation: f64,
    /// Final text with placeholders substituted. `None` for lines.
    pub content: Option<String>,
}

/// Everything the print collaborator needs for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintJob {
    pub width_px: f64,
    pub height_px: f64,
    pub values: ResolvedValues,
    pub elements: Vec<PrintElement>,
}

/// Renders a prepared job into a host target such as a print frame.
pub trait PrintTarget {
    /// # Errors
    ///
    /// Returns `PrintError::Target` when the host cannot render.
    fn render(&mut self, target_id: &str, job: &PrintJob) -> Result<(), PrintError>;
}

/// Keys of manual fields, in document order, without duplicates or blanks.
#[must_use]
pub fn manual_keys(elements: &[Element]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for element in elements {
        if let ElementKind::ManualField(f) = &element.kind {
            if !f.key.is_empty() && !out.contains(&f.key) {
                out.push(f.key.clone());
            }
        }
    }
    out
}

/// Millimeters to pixels at `dpi`.
#[must_use]
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm / MM_PER_INCH * dpi
}

/// Build a print job.
///
/// `manual_values` must be supplied when the label has manual fields. A key
/// absent from it keeps the field's sample.
///
/// # Errors
///
/// `ManualValuesRequired` with the keys to ask for when manual fields exist
/// and no values were supplied.
pub fn prepare(
    elements: &[Element],
    canvas: &Canvas,
    ctx: &ResolveContext<'_>,
    manual_values: Option<&HashMap<String, String>>,
    dpi: f64,
) -> Result<PrintJob, PrintError> {
    let manual = manual_keys(elements);
    let overrides = match (manual.is_empty(), manual_values) {
        (true, _) => ctx.overrides.clone(),
        (false, None) => return Err(PrintError::ManualValuesRequired(manual)),
        (false, Some(values)) => {
            let mut merged = ctx.overrides.clone();
            for key in &manual {
                if let Some(v) = values.get(key) {
                    merged.insert(key.clone(), v.clone());
                }
            }
            merged
        }
    };

    let job_ctx = ResolveContext { catalog: ctx.catalog, overrides: &overrides, today: ctx.today };
    let resolution = resolve::resolve(elements, &job_ctx);
    let printed = elements
        .iter()
        .map(|e| PrintElement {
            id: e.id,
            element_type: e.element_type(),
            rect: e.rect(),
            rotation: e.rotation,
            content: resolution.element_text.get(&e.id).cloned(),
        })
        .collect();

    debug!(elements = elements.len(), manual = manual.len(), dpi, "print job prepared");
    Ok(PrintJob {
        width_px: mm_to_px(canvas.width, dpi),
        height_px: mm_to_px(canvas.height, dpi),
        values: resolution.values,
        elements: printed,
    })
}
