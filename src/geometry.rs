//! Drag and corner-resize math in canvas millimeters.
//!
//! All results are clamped so the element stays fully on the canvas and never
//! shrinks below [`MIN_ELEMENT_SIZE_MM`]. Clamping is silent. Resizing works on
//! canvas axes regardless of the element's own rotation.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::MIN_ELEMENT_SIZE_MM;
use crate::doc::Canvas;
use crate::viewport::{Point, Rect};

/// Resize handle position on an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// Whether dragging this corner moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this corner moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// Location of this corner on `rect`.
    #[must_use]
    pub fn point_on(self, rect: &Rect) -> Point {
        let x = if self.moves_left() { rect.x } else { rect.x + rect.width };
        let y = if self.moves_top() { rect.y } else { rect.y + rect.height };
        Point::new(x, y)
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Clamp `v` into `[0, max]`, preferring 0 when the range is empty.
fn clamp_axis(v: f64, max: f64) -> f64 {
    v.min(max).max(0.0)
}

/// Keep a box of `width` × `height` at `(x, y)` inside the canvas.
#[must_use]
pub fn clamp_position(x: f64, y: f64, width: f64, height: f64, canvas: &Canvas) -> Point {
    Point::new(clamp_axis(x, canvas.width - width), clamp_axis(y, canvas.height - height))
}

/// Clamp a whole rect into the canvas, shrinking it if it is larger.
#[must_use]
pub fn clamp_rect(rect: Rect, canvas: &Canvas) -> Rect {
    let width = rect.width.min(canvas.width).max(MIN_ELEMENT_SIZE_MM);
    let height = rect.height.min(canvas.height).max(MIN_ELEMENT_SIZE_MM);
    let pos = clamp_position(rect.x, rect.y, width, height, canvas);
    Rect::new(pos.x, pos.y, width, height)
}

/// New top-left for a drag: the pointer minus the grab offset, clamped.
#[must_use]
pub fn drag_to(pointer: Point, grab_offset: Point, width: f64, height: f64, canvas: &Canvas) -> Point {
    clamp_position(pointer.x - grab_offset.x, pointer.y - grab_offset.y, width, height, canvas)
}

/// Resize `orig` by dragging `corner` by `delta`, keeping the opposite corner fixed.
#[must_use]
pub fn resize(corner: Corner, orig: Rect, delta: Point, canvas: &Canvas) -> Rect {
    let (x, width) = if corner.moves_left() {
        let right = orig.x + orig.width;
        let width = (orig.width - delta.x).max(MIN_ELEMENT_SIZE_MM).min(right.max(MIN_ELEMENT_SIZE_MM));
        (right - width, width)
    } else {
        let room = (canvas.width - orig.x).max(MIN_ELEMENT_SIZE_MM);
        (orig.x, (orig.width + delta.x).max(MIN_ELEMENT_SIZE_MM).min(room))
    };
    let (y, height) = if corner.moves_top() {
        let bottom = orig.y + orig.height;
        let height = (orig.height - delta.y).max(MIN_ELEMENT_SIZE_MM).min(bottom.max(MIN_ELEMENT_SIZE_MM));
        (bottom - height, height)
    } else {
        let room = (canvas.height - orig.y).max(MIN_ELEMENT_SIZE_MM);
        (orig.y, (orig.height + delta.y).max(MIN_ELEMENT_SIZE_MM).min(room))
    };
    let pos = clamp_position(x, y, width, height, canvas);
    Rect::new(pos.x, pos.y, width, height)
}
