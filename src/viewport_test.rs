#![allow(clippy::float_cmp)]

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_zoom_is_identity() {
    assert_eq!(Viewport::default().zoom, 1.0);
}

#[test]
fn screen_to_mm_at_unit_zoom() {
    let vp = Viewport::default();
    let mm = vp.screen_to_mm(Point::new(96.0, 48.0));
    assert!(approx(mm.x, 25.4));
    assert!(approx(mm.y, 12.7));
}

#[test]
fn screen_to_mm_divides_by_zoom() {
    let vp = Viewport { zoom: 2.0 };
    let mm = vp.screen_to_mm(Point::new(96.0, 0.0));
    assert!(approx(mm.x, 12.7));
}

#[test]
fn mm_to_screen_inverts_screen_to_mm() {
    let vp = Viewport { zoom: 1.5 };
    let screen = Point::new(123.0, 45.0);
    let back = vp.mm_to_screen(vp.screen_to_mm(screen));
    assert!(approx(back.x, screen.x));
    assert!(approx(back.y, screen.y));
}

#[test]
fn rect_contains_edges() {
    let r = Rect::new(10.0, 10.0, 5.0, 5.0);
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(15.0, 15.0)));
    assert!(!r.contains(Point::new(15.1, 12.0)));
    assert!(!r.contains(Point::new(9.9, 12.0)));
}
