//! Field catalog: the read-only table of bindable data paths.
//!
//! Each entry maps a dotted path (`product.name`) to a display label and an
//! example value used for previews when no override is supplied.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

const BUILTIN: &[(&str, &str, &str)] = &[
    ("product.name", "Nombre del producto", "Queso curado"),
    ("product.description", "Descripcion", "Queso de oveja curado 12 meses"),
    ("product.ingredients", "Ingredientes", "Leche cruda de oveja, sal, cuajo"),
    ("product.weight", "Peso neto", "500 g"),
    ("product.ean", "EAN", "8412345678905"),
    ("product.storage", "Conservacion", "Conservar entre 2 y 8 C"),
    ("company.name", "Empresa", "Queseria Ejemplo S.L."),
    ("company.address", "Direccion", "Calle Mayor 1, Madrid"),
    ("company.cif", "CIF", "B12345678"),
    ("batch.lot", "Lote", "L-2024-001"),
];

impl FieldCatalog {
    /// The catalog shipped with the editor.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(path, label, example)| {
                ((*path).to_owned(), CatalogEntry { label: (*label).to_owned(), example: (*example).to_owned() })
            })
            .collect();
        Self { entries }
    }

    /// Parse a catalog from a JSON object of `{ path: { label, example } }`.
    ///
    /// # Errors
    ///
    /// Returns the serde error for malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, label: impl Into<String>, example: impl Into<String>) {
        self.entries.insert(path.into(), CatalogEntry { label: label.into(), example: example.into() });
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&CatalogEntry> {
        self.entries.get(path)
    }

    /// Example value for `path`, if the path is known.
    #[must_use]
    pub fn example(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|e| e.example.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
