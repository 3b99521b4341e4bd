//! The label editor: document state plus the interaction controller.
//!
//! DESIGN
//! ======
//! `Editor` owns the element store, canvas, selection and gesture state. Hosts
//! forward pointer and keyboard events and receive a list of [`Action`]s to
//! apply (re-render, capture or release the pointer, change the cursor).
//! Every geometric change goes through [`ElementStore::update`], so
//! normalization and key maintenance apply to interactive edits too.
//!
//! Whole-document operations (rotate, import, load) compute the new state
//! first and swap it in afterwards, so a failure leaves the editor untouched.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use serde_json::json;
use time::Date;
use tracing::{debug, info, warn};

use crate::catalog::FieldCatalog;
use crate::config::EditorConfig;
use crate::consts::{DRAG_THRESHOLD_PX, NUDGE_STEP_LARGE_MM, NUDGE_STEP_MM};
use crate::doc::{Canvas, Element, ElementId, ElementType, LabelDocument, LabelId};
use crate::error::{ErrorCode, Notice};
use crate::fit::{self, FitError, TextMeasurer};
use crate::geometry::{self, clamp_rect};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, GestureState, Grab, Key, Modifiers, UiState};
use crate::orient::{self, OrientError};
use crate::persist::{self, LabelRecord, LabelRepository, PersistError, SaveError, SaveRequest};
use crate::print::{self, PrintError, PrintJob};
use crate::resolve::{self, ResolveContext, Resolution};
use crate::store::{ElementPatch, ElementStore, StoreError, UpdateOutcome};
use crate::transfer::{self, ImportError};
use crate::viewport::{Point, Rect, Viewport};

/// Effects returned from editor handlers for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementAdded(ElementId),
    ElementUpdated(ElementId),
    ElementRemoved(ElementId),
    SelectionChanged(Option<ElementId>),
    /// The whole document was replaced (import, load, rotate, new).
    DocumentReplaced,
    /// Attach pointer-move/up listeners for the active gesture.
    CapturePointer,
    /// Detach them again.
    ReleasePointer,
    SetCursor(&'static str),
    RenderNeeded,
}

/// Editor state for one open label.
#[derive(Debug)]
pub struct Editor {
    pub store: ElementStore,
    pub canvas: Canvas,
    pub name: String,
    /// Persisted id; `None` until the first successful save.
    pub label_id: Option<LabelId>,
    pub ui: UiState,
    pub gesture: GestureState,
    pub viewport: Viewport,
    pub catalog: FieldCatalog,
    config: EditorConfig,
    saving: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor holding a new, empty label.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::new(),
            canvas: config.canvas(),
            name: config.default_name.clone(),
            label_id: None,
            ui: UiState::default(),
            gesture: GestureState::Idle,
            viewport: Viewport::default(),
            catalog: FieldCatalog::builtin(),
            config,
            saving: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    /// Whether a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Snapshot of the open label.
    #[must_use]
    pub fn document(&self) -> LabelDocument {
        LabelDocument {
            id: self.label_id,
            name: self.name.clone(),
            canvas: self.canvas,
            elements: self.store.elements().to_vec(),
        }
    }

    // --- Element operations ---

    /// Add an element of `ty` with its defaults and select it.
    pub fn add(&mut self, ty: ElementType) -> ElementId {
        let el = self.store.add(ty);
        let (id, rect) = (el.id, el.rect());
        self.clamp_into_canvas(&id, rect);
        self.ui.selected_id = Some(id);
        id
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        if self.ui.selected_id == Some(*id) {
            self.ui.selected_id = None;
        }
        if self.gesture.element_id() == Some(*id) {
            self.gesture = GestureState::Idle;
        }
        true
    }

    /// Apply a partial update. Selection is not changed.
    ///
    /// # Errors
    ///
    /// See [`ElementStore::update`].
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<UpdateOutcome, StoreError> {
        self.store.update(id, patch)
    }

    /// Duplicate an element, keep the copy on the canvas, and select it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn duplicate(&mut self, id: &ElementId) -> Result<ElementId, StoreError> {
        let copy = self.store.duplicate(id)?;
        let (copy_id, rect) = (copy.id, copy.rect());
        self.clamp_into_canvas(&copy_id, rect);
        self.ui.selected_id = Some(copy_id);
        Ok(copy_id)
    }

    /// Set or clear the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.ui.selected_id = id.filter(|i| self.store.get(i).is_some());
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        self.store.bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        self.store.send_to_back(id)
    }

    // --- Pointer input ---

    /// Handle a pointer press at a screen position (CSS px).
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.gesture.is_active() {
            actions.extend(self.cancel_gesture());
        }

        let mm = self.viewport.screen_to_mm(screen_pt);
        let Some(hit) = hit_test(mm, &self.store, &self.viewport, self.ui.selected_id) else {
            if self.ui.selected_id.take().is_some() {
                actions.push(Action::SelectionChanged(None));
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };
        let Some(element) = self.store.get(&hit.element_id) else {
            return actions;
        };

        let id = element.id;
        let was_selected = self.ui.selected_id == Some(id);
        let grab = match hit.part {
            HitPart::Body => Grab::Body { offset: Point::new(mm.x - element.x, mm.y - element.y) },
            HitPart::ResizeHandle(corner) => {
                actions.push(Action::SetCursor(corner.cursor()));
                Grab::Handle { corner, start: mm, orig: element.rect() }
            }
        };
        if !was_selected {
            self.ui.selected_id = Some(id);
            actions.push(Action::SelectionChanged(Some(id)));
            actions.push(Action::RenderNeeded);
        }
        self.gesture = GestureState::PointerDown { id, origin: screen_pt, was_selected, grab };
        actions.push(Action::CapturePointer);
        actions
    }

    /// Handle pointer movement.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if let GestureState::PointerDown { id, origin, grab, .. } = self.gesture {
            let (dx, dy) = (screen_pt.x - origin.x, screen_pt.y - origin.y);
            if dx.abs() < DRAG_THRESHOLD_PX && dy.abs() < DRAG_THRESHOLD_PX {
                return Vec::new();
            }
            self.gesture = match grab {
                Grab::Body { offset } => GestureState::Dragging { id, offset },
                Grab::Handle { corner, start, orig } => GestureState::Resizing { id, corner, start, orig },
            };
            self.ui.selected_id = Some(id);
            debug!(%id, "gesture promoted");
        }

        let mm = self.viewport.screen_to_mm(screen_pt);
        match self.gesture {
            GestureState::Idle => self.hover_cursor(mm),
            GestureState::PointerDown { .. } => Vec::new(),
            GestureState::Dragging { id, offset } => {
                let Some(el) = self.store.get(&id) else {
                    return self.cancel_gesture();
                };
                let pos = geometry::drag_to(mm, offset, el.width, el.height, &self.canvas);
                let rect = Rect::new(pos.x, pos.y, el.width, el.height);
                self.apply_rect(&id, rect)
            }
            GestureState::Resizing { id, corner, start, orig } => {
                let delta = Point::new(mm.x - start.x, mm.y - start.y);
                let rect = geometry::resize(corner, orig, delta, &self.canvas);
                self.apply_rect(&id, rect)
            }
        }
    }

    /// Handle pointer release. The release position counts as a final move.
    ///
    /// A press on an already selected element that never crossed the drag
    /// threshold is a click, and clicking a selected element deselects it.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.gesture.is_active() {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(screen_pt, modifiers);

        if let GestureState::PointerDown { was_selected: true, grab: Grab::Body { .. }, .. } = self.gesture {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
            actions.push(Action::RenderNeeded);
        }
        self.gesture = GestureState::Idle;
        actions.push(Action::ReleasePointer);
        actions.push(Action::SetCursor("default"));
        actions
    }

    /// Abandon the current gesture. Changes already applied are kept.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        if !self.gesture.is_active() {
            return Vec::new();
        }
        self.gesture = GestureState::Idle;
        vec![Action::ReleasePointer, Action::SetCursor("default")]
    }

    fn hover_cursor(&self, mm: Point) -> Vec<Action> {
        let cursor = match hit_test(mm, &self.store, &self.viewport, self.ui.selected_id) {
            Some(hit) => match hit.part {
                HitPart::Body => "move",
                HitPart::ResizeHandle(corner) => corner.cursor(),
            },
            None => "default",
        };
        vec![Action::SetCursor(cursor)]
    }

    // --- Keyboard input ---

    /// Handle a key press: delete, escape, and arrow nudging.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        let step = if modifiers.shift { NUDGE_STEP_LARGE_MM } else { NUDGE_STEP_MM };
        let (dx, dy) = match key.0.as_str() {
            "Delete" | "Backspace" => {
                let mut actions = self.cancel_gesture();
                if self.remove(&id) {
                    actions.extend([Action::ElementRemoved(id), Action::SelectionChanged(None), Action::RenderNeeded]);
                }
                return actions;
            }
            "Escape" => {
                let mut actions = self.cancel_gesture();
                self.ui.selected_id = None;
                actions.extend([Action::SelectionChanged(None), Action::RenderNeeded]);
                return actions;
            }
            "ArrowLeft" => (-step, 0.0),
            "ArrowRight" => (step, 0.0),
            "ArrowUp" => (0.0, -step),
            "ArrowDown" => (0.0, step),
            _ => return Vec::new(),
        };
        let Some(el) = self.store.get(&id) else {
            return Vec::new();
        };
        let pos = geometry::clamp_position(el.x + dx, el.y + dy, el.width, el.height, &self.canvas);
        let rect = Rect::new(pos.x, pos.y, el.width, el.height);
        self.apply_rect(&id, rect)
    }

    // --- Canvas ---

    /// Turn the canvas to `angle` degrees, remapping every element in one step.
    ///
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// `UnsupportedAngle` for angles that are not multiples of 90°.
    pub fn rotate_canvas_to(&mut self, angle: f64) -> Result<bool, OrientError> {
        let Some((canvas, elements)) = orient::rotate_layout(&self.canvas, self.store.elements(), angle)? else {
            return Ok(false);
        };
        self.gesture = GestureState::Idle;
        self.store.replace_all(elements);
        info!(from = self.canvas.rotation, to = canvas.rotation, elements = self.store.len(), "canvas rotated");
        self.canvas = canvas;
        Ok(true)
    }

    /// Resize the canvas and pull every element back inside it.
    ///
    /// Non-positive or non-finite sizes are ignored and return false.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            warn!(width, height, "ignoring invalid canvas size");
            return false;
        }
        let canvas = Canvas { width, height, rotation: self.canvas.rotation };
        let elements = self
            .store
            .elements()
            .iter()
            .map(|e| {
                let mut e = e.clone();
                e.set_rect(clamp_rect(e.rect(), &canvas));
                e
            })
            .collect();
        self.store.replace_all(elements);
        self.canvas = canvas;
        true
    }

    // --- Document lifecycle ---

    /// Start a fresh, unsaved label from the configured defaults.
    pub fn new_label(&mut self) {
        self.replace_document(LabelDocument {
            id: None,
            name: self.config.default_name.clone(),
            canvas: self.config.canvas(),
            elements: Vec::new(),
        });
    }

    /// Remove every element, keeping canvas, name and id.
    pub fn clear(&mut self) {
        self.store.clear();
        self.ui.selected_id = None;
        self.gesture = GestureState::Idle;
    }

    /// Export the open label as JSON, without element ids.
    ///
    /// # Errors
    ///
    /// Propagates the serializer error.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        transfer::export_json(&self.document())
    }

    /// Replace elements, canvas and name from an exported document.
    /// The persisted id is kept, so saving updates the same label.
    ///
    /// # Errors
    ///
    /// Any [`ImportError`]; the editor is unchanged on failure.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let mut doc = transfer::import_json(text, &self.config.default_name)?;
        doc.id = self.label_id;
        self.replace_document(doc);
        Ok(())
    }

    /// Open a stored label.
    ///
    /// # Errors
    ///
    /// Any [`ImportError`] from the stored format; the editor is unchanged.
    pub fn load_record(&mut self, record: &LabelRecord) -> Result<(), ImportError> {
        let mut doc = transfer::import_json(&record.format, &self.config.default_name)?;
        doc.id = Some(record.id);
        if !record.name.trim().is_empty() {
            doc.name.clone_from(&record.name);
        }
        info!(id = %record.id, name = %doc.name, elements = doc.elements.len(), "label loaded");
        self.replace_document(doc);
        Ok(())
    }

    fn replace_document(&mut self, doc: LabelDocument) {
        self.store.replace_all(doc.elements);
        self.canvas = doc.canvas;
        self.name = doc.name;
        self.label_id = doc.id;
        self.ui.selected_id = None;
        self.gesture = GestureState::Idle;
    }

    // --- Resolution, print and auto-fit ---

    /// Resolve every field for preview, as of today.
    #[must_use]
    pub fn resolve(&self, overrides: &HashMap<String, String>) -> Resolution {
        self.resolve_at(overrides, resolve::today())
    }

    #[must_use]
    pub fn resolve_at(&self, overrides: &HashMap<String, String>, today: Date) -> Resolution {
        let ctx = ResolveContext { catalog: &self.catalog, overrides, today };
        resolve::resolve(self.store.elements(), &ctx)
    }

    /// Build a print job. See [`print::prepare`].
    ///
    /// # Errors
    ///
    /// `ManualValuesRequired` when manual fields exist and no values were given.
    pub fn prepare_print(&self, manual_values: Option<&HashMap<String, String>>) -> Result<PrintJob, PrintError> {
        let overrides = HashMap::new();
        let ctx = ResolveContext { catalog: &self.catalog, overrides: &overrides, today: resolve::today() };
        print::prepare(self.store.elements(), &self.canvas, &ctx, manual_values, self.config.print_dpi)
    }

    /// Fit an element's box to its resolved text.
    ///
    /// # Errors
    ///
    /// See [`fit::auto_fit`].
    pub fn auto_fit(&mut self, id: &ElementId, measurer: &dyn TextMeasurer) -> Result<Rect, FitError> {
        if self.store.get(id).is_none() {
            return Err(FitError::NotFound(*id));
        }
        let text = self.resolve(&HashMap::new()).element_text.remove(id).ok_or(FitError::NotText(*id))?;
        fit::auto_fit(&mut self.store, &self.canvas, id, &text, measurer)
    }

    // --- Save lifecycle ---

    /// Validate the label and mark a save as in flight.
    ///
    /// # Errors
    ///
    /// `SaveInFlight` while another save is pending, otherwise any validation
    /// failure from [`persist::validate_for_save`].
    pub fn begin_save(&mut self) -> Result<SaveRequest, SaveError> {
        if self.saving {
            return Err(SaveError::SaveInFlight);
        }
        persist::validate_for_save(&self.name, self.store.elements())?;
        let mut doc = self.document();
        doc.name = doc.name.trim().to_owned();
        let format = transfer::export_json(&doc)?;
        self.saving = true;
        debug!(id = ?self.label_id, "save started");
        Ok(SaveRequest { id: self.label_id, name: doc.name, format })
    }

    /// Record the outcome of a save started with [`Self::begin_save`].
    pub fn finish_save(&mut self, result: Result<LabelRecord, PersistError>) -> Notice {
        self.saving = false;
        match result {
            Ok(record) => {
                self.label_id = Some(record.id);
                Notice::success("LABEL_SAVED", format!("label \"{}\" saved", record.name))
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "save failed; document kept");
                Notice::from_error(&e)
            }
        }
    }

    /// Validate, save through `repo`, and report the outcome.
    pub async fn save(&mut self, repo: &dyn LabelRepository, token: &str) -> Notice {
        let request = match self.begin_save() {
            Ok(r) => r,
            Err(e) => return Notice::from_error(&e),
        };
        let result = persist::save(repo, &request, token).await;
        self.finish_save(result)
    }

    /// Delete the open label from `repo` and start a new one.
    pub async fn delete(&mut self, repo: &dyn LabelRepository, token: &str) -> Notice {
        let Some(id) = self.label_id else {
            self.new_label();
            return Notice::info("LABEL_DISCARDED", "unsaved label discarded");
        };
        match repo.delete_label(id, token).await {
            Ok(()) => {
                info!(%id, "label deleted");
                self.new_label();
                Notice::success("LABEL_DELETED", "label deleted")
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed; document kept");
                Notice::from_error(&e)
            }
        }
    }

    // --- Helpers ---

    /// Write a new box for `id` through the store and report it.
    fn apply_rect(&mut self, id: &ElementId, rect: Rect) -> Vec<Action> {
        if self.store.get(id).is_some_and(|e| e.rect() == rect) {
            return Vec::new();
        }
        let mut patch = ElementPatch::new();
        patch.insert("x".into(), json!(rect.x));
        patch.insert("y".into(), json!(rect.y));
        patch.insert("width".into(), json!(rect.width));
        patch.insert("height".into(), json!(rect.height));
        match self.store.update(id, &patch) {
            Ok(_) => vec![Action::ElementUpdated(*id), Action::RenderNeeded],
            Err(e) => {
                warn!(%id, error = %e, "geometry update rejected");
                let mut actions = self.cancel_gesture();
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    fn clamp_into_canvas(&mut self, id: &ElementId, rect: Rect) {
        let clamped = clamp_rect(rect, &self.canvas);
        if clamped != rect {
            self.apply_rect(id, clamped);
        }
    }
}
