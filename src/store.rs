//! Element store: the ordered, in-memory source of truth for a label.
//!
//! DESIGN
//! ======
//! Elements live in a `Vec` whose order is the z-order (last = front-most).
//! [`ElementStore::update`] is the single mutation gateway for existing
//! elements: the patch is merged onto the element's wire form, the result is
//! normalized and re-typed, and a key change is validated and cascaded into
//! every placeholder before anything is written. Every check runs before the
//! first write, so a rejected update leaves the store untouched.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::consts::DUPLICATE_OFFSET_MM;
use crate::doc::{Element, ElementId, ElementType};
use crate::error::ErrorCode;
use crate::keys;

/// Flat partial update: present keys overwrite, `null` values delete.
pub type ElementPatch = Map<String, Value>;

/// Fields a patch may never change.
const IMMUTABLE_FIELDS: &[&str] = &["id", "type"];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("key already in use: {0}")]
    DuplicateKey(String),
    #[error("invalid update for element {id}: {reason}")]
    InvalidPatch { id: ElementId, reason: String },
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::DuplicateKey(_) => "E_DUPLICATE_KEY",
            Self::InvalidPatch { .. } => "E_INVALID_PATCH",
        }
    }
}

/// What an accepted update did beyond replacing the element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// `(old, new)` when the element's key changed.
    pub renamed: Option<(String, String)>,
    /// Number of other elements whose placeholders were rewritten.
    pub cascaded: usize,
}

/// Ordered store of label elements.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Create an element of `ty` with its defaults and append it front-most.
    ///
    /// Key-bearing types receive a key that does not collide with any
    /// existing one.
    pub fn add(&mut self, ty: ElementType) -> &Element {
        let mut element = Element::new(ty);
        if let Some(base) = ty.default_key_base() {
            let key = keys::unique_key(base, &keys::existing_keys(&self.elements, None));
            element.kind.set_key(key);
        }
        debug!(id = %element.id, kind = ty.as_str(), "element added");
        self.push(element)
    }

    /// Append an element as-is after geometry sanitising.
    pub fn insert(&mut self, mut element: Element) -> &Element {
        element.sanitize_geometry();
        self.push(element)
    }

    fn push(&mut self, element: Element) -> &Element {
        let idx = self.elements.len();
        self.elements.push(element);
        &self.elements[idx]
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let idx = self.index_of(id)?;
        let removed = self.elements.remove(idx);
        debug!(%id, "element removed");
        Some(removed)
    }

    /// Merge `patch` onto the element `id` and store the normalized result.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `InvalidPatch` when the merged value no
    /// longer describes a valid element, `DuplicateKey` when the patch sets a
    /// key another key-bearing element already uses.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<UpdateOutcome, StoreError> {
        let idx = self.index_of(id).ok_or(StoreError::NotFound(*id))?;
        let current = &self.elements[idx];

        let mut value = current.to_value();
        let Some(fields) = value.as_object_mut() else {
            return Err(StoreError::InvalidPatch { id: *id, reason: "element is not an object".into() });
        };
        for (k, v) in patch {
            if IMMUTABLE_FIELDS.contains(&k.as_str()) {
                warn!(%id, field = %k, "ignoring patch of immutable field");
                continue;
            }
            if v.is_null() {
                fields.remove(k);
            } else {
                fields.insert(k.clone(), v.clone());
            }
        }

        let next = Element::from_value(value).map_err(|e| StoreError::InvalidPatch { id: *id, reason: e.to_string() })?;

        let old_key = current.key().unwrap_or_default().to_owned();
        let new_key = next.key().unwrap_or_default().to_owned();
        let key_changed = old_key != new_key;
        if key_changed && !new_key.is_empty() && keys::existing_keys(&self.elements, Some(current)).contains(new_key.as_str())
        {
            return Err(StoreError::DuplicateKey(new_key));
        }

        self.elements[idx] = next;

        let mut outcome = UpdateOutcome::default();
        if key_changed {
            outcome.cascaded = keys::cascade_rename(&mut self.elements, &old_key, &new_key);
            if !old_key.is_empty() && !new_key.is_empty() {
                info!(%id, old = %old_key, new = %new_key, cascaded = outcome.cascaded, "key renamed");
            }
            outcome.renamed = Some((old_key, new_key));
        }
        Ok(outcome)
    }

    /// Clone `id` with a position offset and, for key-bearing elements, a
    /// fresh non-colliding key. The copy is appended front-most.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not in the store.
    pub fn duplicate(&mut self, id: &ElementId) -> Result<&Element, StoreError> {
        let source = self.get(id).ok_or(StoreError::NotFound(*id))?;
        let mut copy = source.clone();
        copy.id = uuid::Uuid::new_v4();
        copy.x += DUPLICATE_OFFSET_MM;
        copy.y += DUPLICATE_OFFSET_MM;
        if let Some(key) = source.key().filter(|k| !k.is_empty()) {
            let fresh = keys::duplicate_key(key, &keys::existing_keys(&self.elements, None));
            copy.kind.set_key(fresh);
        }
        debug!(source = %id, copy = %copy.id, "element duplicated");
        Ok(self.push(copy))
    }

    /// Replace every element in one step.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Move an element to the top of the z-order. Returns false if absent.
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let el = self.elements.remove(idx);
        self.elements.push(el);
        true
    }

    /// Move an element to the bottom of the z-order. Returns false if absent.
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let el = self.elements.remove(idx);
        self.elements.insert(0, el);
        true
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// All elements in z-order (back to front).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }
}
