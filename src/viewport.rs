#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::PX_PER_MM;

/// A point in either screen (CSS pixel) or canvas (millimeter) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in canvas millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// Zoom state of the label canvas.
///
/// Pointer positions arrive in CSS pixels relative to the canvas origin.
/// `zoom` is a scale factor (1.0 = 96 DPI, no zoom).
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (CSS pixels) to canvas millimeters.
    #[must_use]
    pub fn screen_to_mm(&self, screen: Point) -> Point {
        Point { x: self.px_to_mm(screen.x), y: self.px_to_mm(screen.y) }
    }

    /// Convert a canvas point in millimeters to screen pixels.
    #[must_use]
    pub fn mm_to_screen(&self, mm: Point) -> Point {
        Point { x: mm.x * PX_PER_MM * self.zoom, y: mm.y * PX_PER_MM * self.zoom }
    }

    /// Convert a screen-space distance (pixels) to millimeters.
    #[must_use]
    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / (PX_PER_MM * self.zoom)
    }
}
