#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = EditorConfig::from_lookup(|_| None);
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.canvas_width_mm, 100.0);
    assert_eq!(cfg.canvas_height_mm, 50.0);
    assert_eq!(cfg.print_dpi, 96.0);
    assert_eq!(cfg.default_name, "Nueva etiqueta");
}

#[test]
fn values_are_read() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("LABEL_CANVAS_WIDTH_MM", "62"),
        ("LABEL_CANVAS_HEIGHT_MM", " 29.5 "),
        ("LABEL_PRINT_DPI", "300"),
        ("LABEL_DEFAULT_NAME", "Etiqueta"),
    ]));
    assert_eq!(cfg.canvas(), Canvas::new(62.0, 29.5));
    assert_eq!(cfg.print_dpi, 300.0);
    assert_eq!(cfg.default_name, "Etiqueta");
}

#[test]
fn invalid_values_fall_back() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("LABEL_CANVAS_WIDTH_MM", "wide"),
        ("LABEL_CANVAS_HEIGHT_MM", "-5"),
        ("LABEL_PRINT_DPI", "0"),
        ("LABEL_DEFAULT_NAME", "   "),
    ]));
    assert_eq!(cfg, EditorConfig::default());
}

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse(&|_: &str| None, "ANY", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_invalid_returns_default() {
    let val: usize = env_parse(&lookup_from(&[("K", "notanumber")]), "K", 7);
    assert_eq!(val, 7);
}
