//! Shared numeric constants for the label editor.

// ── Units ───────────────────────────────────────────────────────

/// CSS pixels per inch used for both pointer input and print sizing.
pub const DEFAULT_DPI: f64 = 96.0;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// CSS pixels per millimeter at [`DEFAULT_DPI`] and zoom 1.0.
pub const PX_PER_MM: f64 = DEFAULT_DPI / MM_PER_INCH;

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an element may have, in millimeters (10px at 96 DPI).
pub const MIN_ELEMENT_SIZE_MM: f64 = 2.65;

/// Pointer travel in screen pixels (either axis) that promotes a press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Position offset applied to both axes when duplicating an element.
pub const DUPLICATE_OFFSET_MM: f64 = 10.0;

/// Where freshly added elements are placed.
pub const NEW_ELEMENT_POS_MM: f64 = 10.0;

/// Keyboard nudge step, and the larger step used while Shift is held.
pub const NUDGE_STEP_MM: f64 = 1.0;
pub const NUDGE_STEP_LARGE_MM: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around resize handles.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

// ── Style ───────────────────────────────────────────────────────

/// Stroke width for lines whose stored width is missing or not positive.
pub const DEFAULT_STROKE_WIDTH_MM: f64 = 0.1;

/// Font size used when an element carries none.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Text color used when an element carries none.
pub const DEFAULT_COLOR: &str = "#000000";

// ── Auto-fit ────────────────────────────────────────────────────

/// Margin added on each measured axis.
pub const FIT_MARGIN_MM: f64 = 1.0;

/// Floor for auto-fitted width and height.
pub const FIT_MIN_SIZE_MM: f64 = 5.0;
