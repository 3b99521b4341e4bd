//! Persistence boundary: the label repository collaborator and save checks.
//!
//! The editor never talks to storage directly. It validates and serializes the
//! document ([`validate_for_save`], `Editor::begin_save`), hands a
//! [`SaveRequest`] to a [`LabelRepository`], and folds the outcome back in.
//! [`MemoryRepository`] is the in-process implementation used by tests and the
//! CLI.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::doc::{Element, LabelId};
use crate::error::ErrorCode;
use crate::keys;

/// A stored label as the backend returns it. `format` is the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: LabelId,
    pub name: String,
    pub format: String,
}

/// Payload for one save call. `id` is `None` for a first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub id: Option<LabelId>,
    pub name: String,
    pub format: String,
}

// =============================================================
// Errors
// =============================================================

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("label name must not be empty")]
    EmptyName,
    #[error("element {index} needs a key")]
    EmptyKey { index: usize },
    #[error("duplicate keys: {}", .0.join(", "))]
    DuplicateKeys(Vec<String>),
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error("failed to encode label: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ErrorCode for SaveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "E_EMPTY_NAME",
            Self::EmptyKey { .. } => "E_EMPTY_KEY",
            Self::DuplicateKeys(_) => "E_DUPLICATE_KEYS",
            Self::SaveInFlight => "E_SAVE_IN_FLIGHT",
            Self::Encode(_) => "E_ENCODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::SaveInFlight)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("label not found: {0}")]
    NotFound(LabelId),
    #[error("not authorized")]
    Unauthorized,
    #[error("storage error: {0}")]
    Backend(String),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_LABEL_NOT_FOUND",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Backend(_) => "E_BACKEND",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

// =============================================================
// Validation
// =============================================================

/// Check that a label can be saved.
///
/// # Errors
///
/// `EmptyName` for a blank name, `EmptyKey` for a key-bearing element without
/// a key, `DuplicateKeys` when two elements share a key.
pub fn validate_for_save(name: &str, elements: &[Element]) -> Result<(), SaveError> {
    if name.trim().is_empty() {
        return Err(SaveError::EmptyName);
    }
    if let Some(index) =
        elements.iter().position(|e| e.element_type().is_key_bearing() && e.key().is_none_or(|k| k.trim().is_empty()))
    {
        return Err(SaveError::EmptyKey { index });
    }
    let dupes = keys::duplicate_keys(elements);
    if !dupes.is_empty() {
        return Err(SaveError::DuplicateKeys(dupes.into_keys().collect()));
    }
    Ok(())
}

// =============================================================
// Repository
// =============================================================

/// Storage collaborator for labels.
#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn create_label(&self, name: &str, format: &str, token: &str) -> Result<LabelRecord, PersistError>;

    async fn update_label(&self, id: LabelId, name: &str, format: &str, token: &str) -> Result<LabelRecord, PersistError>;

    async fn delete_label(&self, id: LabelId, token: &str) -> Result<(), PersistError>;

    async fn get_label(&self, id: LabelId, token: &str) -> Result<LabelRecord, PersistError>;
}

/// Create or update depending on whether the request carries an id.
///
/// # Errors
///
/// Propagates the repository error.
pub async fn save(repo: &dyn LabelRepository, request: &SaveRequest, token: &str) -> Result<LabelRecord, PersistError> {
    let result = match request.id {
        Some(id) => repo.update_label(id, &request.name, &request.format, token).await,
        None => repo.create_label(&request.name, &request.format, token).await,
    };
    match &result {
        Ok(record) => info!(id = %record.id, name = %record.name, "label saved"),
        Err(e) => warn!(error = %e, "label save failed"),
    }
    result
}

/// In-memory repository guarded by a single bearer token.
#[derive(Debug)]
pub struct MemoryRepository {
    token: String,
    labels: RwLock<HashMap<LabelId, LabelRecord>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), labels: RwLock::new(HashMap::new()) }
    }

    /// Number of stored labels.
    pub async fn len(&self) -> usize {
        self.labels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.labels.read().await.is_empty()
    }

    fn authorize(&self, token: &str) -> Result<(), PersistError> {
        if token == self.token { Ok(()) } else { Err(PersistError::Unauthorized) }
    }
}

#[async_trait]
impl LabelRepository for MemoryRepository {
    async fn create_label(&self, name: &str, format: &str, token: &str) -> Result<LabelRecord, PersistError> {
        self.authorize(token)?;
        let record = LabelRecord { id: Uuid::new_v4(), name: name.to_owned(), format: format.to_owned() };
        self.labels.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_label(&self, id: LabelId, name: &str, format: &str, token: &str) -> Result<LabelRecord, PersistError> {
        self.authorize(token)?;
        let mut labels = self.labels.write().await;
        let record = labels.get_mut(&id).ok_or(PersistError::NotFound(id))?;
        record.name = name.to_owned();
        record.format = format.to_owned();
        Ok(record.clone())
    }

    async fn delete_label(&self, id: LabelId, token: &str) -> Result<(), PersistError> {
        self.authorize(token)?;
        match self.labels.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(PersistError::NotFound(id)),
        }
    }

    async fn get_label(&self, id: LabelId, token: &str) -> Result<LabelRecord, PersistError> {
        self.authorize(token)?;
        self.labels.read().await.get(&id).cloned().ok_or(PersistError::NotFound(id))
    }
}
