//! Canvas orientation: rotate the whole label in 90° steps.
//!
//! Every element is remapped with a fixed affine rule keyed on the angle
//! difference. 90° and 270° swap the canvas width and height; the formulas use
//! the pre-swap dimensions. The transform is computed into a fresh element list
//! and handed back whole, so callers swap it in as one step.

#[cfg(test)]
#[path = "orient_test.rs"]
mod orient_test;

use crate::doc::{Canvas, Element};
use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum OrientError {
    #[error("canvas rotation must be a multiple of 90 degrees, got {0}")]
    UnsupportedAngle(f64),
}

impl ErrorCode for OrientError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedAngle(_) => "E_UNSUPPORTED_ANGLE",
        }
    }
}

/// Normalize an angle to one of 0, 90, 180, 270.
///
/// # Errors
///
/// Returns `UnsupportedAngle` for anything that is not a multiple of 90°.
pub fn normalize_angle(angle: f64) -> Result<u16, OrientError> {
    if !angle.is_finite() {
        return Err(OrientError::UnsupportedAngle(angle));
    }
    let wrapped = angle.rem_euclid(360.0);
    let turns = (wrapped / 90.0).round();
    if (wrapped - turns * 90.0).abs() > 1e-6 {
        return Err(OrientError::UnsupportedAngle(angle));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let degrees = ((turns as u16) * 90) % 360;
    Ok(degrees)
}

/// Remap one element for a canvas turn of `diff` degrees (90, 180 or 270).
#[must_use]
pub fn rotate_element(element: &Element, diff: u16, canvas: &Canvas) -> Element {
    let mut out = element.clone();
    let (x, y, w, h) = (element.x, element.y, element.width, element.height);
    match diff {
        90 => {
            out.x = canvas.height - y - h;
            out.y = x;
            out.width = h;
            out.height = w;
        }
        180 => {
            out.x = canvas.width - x - w;
            out.y = canvas.height - y - h;
        }
        270 => {
            out.x = y;
            out.y = canvas.width - x - w;
            out.width = h;
            out.height = w;
        }
        _ => return out,
    }
    out.rotation = (element.rotation + f64::from(diff)).rem_euclid(360.0);
    out
}

/// Compute the canvas and elements after turning the canvas to `new_angle`.
///
/// Returns `Ok(None)` when the canvas is already at that angle.
///
/// # Errors
///
/// Returns `UnsupportedAngle` when either angle is not a multiple of 90°.
pub fn rotate_layout(canvas: &Canvas, elements: &[Element], new_angle: f64) -> Result<Option<(Canvas, Vec<Element>)>, OrientError> {
    let target = normalize_angle(new_angle)?;
    let current = normalize_angle(canvas.rotation)?;
    let diff = (target + 360 - current) % 360;
    if diff == 0 {
        return Ok(None);
    }

    let rotated = elements.iter().map(|e| rotate_element(e, diff, canvas)).collect();
    let (width, height) = if diff == 180 { (canvas.width, canvas.height) } else { (canvas.height, canvas.width) };
    let next = Canvas { width, height, rotation: f64::from(target) };
    Ok(Some((next, rotated)))
}
