//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `GestureState` is the active pointer gesture tracked between pointer-down
//! and pointer-up. It is the only place gesture context lives; the editor
//! transitions it on each pointer event:
//!
//! ```text
//! Idle ──down on element──▶ PointerDown ──move ≥ 3px──▶ Dragging | Resizing
//!   ▲                            │                              │
//!   └──────────── up (click: deselect if it was selected) ◀─────┘ up (commit)
//! ```

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geometry::Corner;
use crate::viewport::{Point, Rect};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"ArrowUp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// What the pointer grabbed at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grab {
    /// The element body; `offset` is pointer minus element origin, in mm.
    Body { offset: Point },
    /// A resize handle of the selected element.
    Handle { corner: Corner, start: Point, orig: Rect },
}

/// State of the current pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pressed on an element but not yet past the drag threshold.
    PointerDown {
        id: ElementId,
        /// Screen-space press position, for the threshold check.
        origin: Point,
        /// Whether `id` was already selected before this press.
        was_selected: bool,
        grab: Grab,
    },
    /// Moving an element.
    Dragging { id: ElementId, offset: Point },
    /// Resizing an element by one corner.
    Resizing {
        id: ElementId,
        corner: Corner,
        /// Pointer position in mm when the press started.
        start: Point,
        /// Element box when the press started.
        orig: Rect,
    },
}

impl GestureState {
    /// Whether a pointer capture is held (pointer-move/up listeners attached).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Element the gesture is acting on, if any.
    #[must_use]
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            Self::Idle => None,
            Self::PointerDown { id, .. } | Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
        }
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    pub selected_id: Option<ElementId>,
}
