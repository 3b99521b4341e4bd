#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Element, ElementType};

struct Fixed(TextSize);

impl TextMeasurer for Fixed {
    fn measure(&self, _text: &str, _style: &TextStyle) -> TextSize {
        self.0
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fitted_size_adds_margin() {
    let (w, h) = fitted_size(TextSize { width_px: PX_PER_MM * 30.0, height_px: PX_PER_MM * 6.0 });
    assert!(close(w, 31.0));
    assert!(close(h, 7.0));
}

#[test]
fn fitted_size_has_floor() {
    assert_eq!(fitted_size(TextSize { width_px: 0.0, height_px: 1.0 }), (5.0, 5.0));
}

#[test]
fn monospace_measures_widest_line() {
    let style = TextStyle::default();
    let size = MonospaceMeasurer::default().measure("ab\nabcd", &style);
    assert!(close(size.width_px, 4.0 * 12.0 * 0.6));
    assert!(close(size.height_px, 2.0 * 12.0 * 1.2));
}

#[test]
fn monospace_empty_text_has_one_line() {
    let size = MonospaceMeasurer::default().measure("", &TextStyle::default());
    assert_eq!(size.width_px, 0.0);
    assert!(close(size.height_px, 12.0 * 1.2));
}

#[test]
fn plain_text_strips_tags() {
    assert_eq!(plain_text("<p>Lote <b>7</b></p><p>Fin</p>"), "Lote 7\nFin");
    assert_eq!(plain_text("a<br/>b"), "a\nb");
    assert_eq!(plain_text("a < b"), "a < b");
}

#[test]
fn auto_fit_updates_size_through_store() {
    let mut store = ElementStore::new();
    let id = store.add(ElementType::Text).id;
    let measurer = Fixed(TextSize { width_px: PX_PER_MM * 20.0, height_px: PX_PER_MM * 3.0 });
    let rect = auto_fit(&mut store, &Canvas::new(100.0, 50.0), &id, "Texto", &measurer).unwrap();

    let el = store.get(&id).unwrap();
    assert!(close(el.width, 21.0));
    assert!(close(el.height, 5.0));
    assert_eq!((el.x, el.y), (10.0, 10.0));
    assert_eq!(rect, el.rect());
}

#[test]
fn auto_fit_stays_on_canvas() {
    let mut store = ElementStore::new();
    let mut el = Element::new(ElementType::Text);
    el.x = 80.0;
    let id = store.insert(el).id;
    let measurer = Fixed(TextSize { width_px: PX_PER_MM * 40.0, height_px: PX_PER_MM * 3.0 });
    let rect = auto_fit(&mut store, &Canvas::new(100.0, 50.0), &id, "x", &measurer).unwrap();
    assert!(rect.x + rect.width <= 100.0);
    assert!(close(rect.width, 41.0));
}

#[test]
fn auto_fit_rejects_non_text() {
    let mut store = ElementStore::new();
    let id = store.add(ElementType::Line).id;
    let err = auto_fit(&mut store, &Canvas::new(100.0, 50.0), &id, "", &MonospaceMeasurer::default()).unwrap_err();
    assert!(matches!(err, FitError::NotText(x) if x == id));
}

#[test]
fn auto_fit_unknown_id() {
    let mut store = ElementStore::new();
    let id = uuid::Uuid::new_v4();
    let err = auto_fit(&mut store, &Canvas::new(10.0, 10.0), &id, "", &MonospaceMeasurer::default()).unwrap_err();
    assert_eq!(err.error_code(), "E_ELEMENT_NOT_FOUND");
}
