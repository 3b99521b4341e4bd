use super::*;

#[test]
fn builtin_has_product_name() {
    let catalog = FieldCatalog::builtin();
    assert_eq!(catalog.example("product.name"), Some("Queso curado"));
    assert_eq!(catalog.get("product.name").map(|e| e.label.as_str()), Some("Nombre del producto"));
    assert!(catalog.example("product.unknown").is_none());
}

#[test]
fn builtin_paths_are_sorted_and_unique() {
    let catalog = FieldCatalog::builtin();
    assert_eq!(catalog.len(), BUILTIN.len());
    let paths: Vec<&str> = catalog.iter().map(|(p, _)| p).collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    assert_eq!(paths, sorted);
}

#[test]
fn from_json_reads_entries() {
    let catalog = FieldCatalog::from_json(r#"{"a.b": {"label": "AB", "example": "x"}}"#).unwrap();
    assert_eq!(catalog.example("a.b"), Some("x"));
}

#[test]
fn from_json_rejects_wrong_shape() {
    assert!(FieldCatalog::from_json(r#"{"a.b": "x"}"#).is_err());
}

#[test]
fn insert_replaces() {
    let mut catalog = FieldCatalog::default();
    assert!(catalog.is_empty());
    catalog.insert("p", "P", "1");
    catalog.insert("p", "P", "2");
    assert_eq!(catalog.example("p"), Some("2"));
}
