#![allow(clippy::float_cmp)]

use super::*;

const EPS: f64 = 1e-9;

fn canvas() -> Canvas {
    Canvas::new(100.0, 50.0)
}

fn assert_on_canvas(r: &Rect, c: &Canvas) {
    assert!(r.x >= -EPS, "x {r:?}");
    assert!(r.y >= -EPS, "y {r:?}");
    assert!(r.x + r.width <= c.width + EPS, "right {r:?}");
    assert!(r.y + r.height <= c.height + EPS, "bottom {r:?}");
    assert!(r.width >= MIN_ELEMENT_SIZE_MM - EPS, "width {r:?}");
    assert!(r.height >= MIN_ELEMENT_SIZE_MM - EPS, "height {r:?}");
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_subtracts_grab_offset() {
    let p = drag_to(Point::new(30.0, 20.0), Point::new(5.0, 2.0), 10.0, 10.0, &canvas());
    assert_eq!(p, Point::new(25.0, 18.0));
}

#[test]
fn drag_clamps_to_canvas() {
    let c = canvas();
    assert_eq!(drag_to(Point::new(-20.0, -5.0), Point::new(0.0, 0.0), 10.0, 10.0, &c), Point::new(0.0, 0.0));
    assert_eq!(drag_to(Point::new(500.0, 500.0), Point::new(0.0, 0.0), 10.0, 10.0, &c), Point::new(90.0, 40.0));
}

#[test]
fn drag_oversized_element_pins_to_origin() {
    let p = drag_to(Point::new(50.0, 20.0), Point::new(0.0, 0.0), 150.0, 10.0, &canvas());
    assert_eq!(p.x, 0.0);
}

// =============================================================
// Resize
// =============================================================

#[test]
fn se_grows_width_and_height() {
    let r = resize(Corner::Se, Rect::new(10.0, 10.0, 20.0, 10.0), Point::new(5.0, 3.0), &canvas());
    assert_eq!(r, Rect::new(10.0, 10.0, 25.0, 13.0));
}

#[test]
fn nw_moves_origin_and_shrinks() {
    let r = resize(Corner::Nw, Rect::new(10.0, 10.0, 20.0, 10.0), Point::new(4.0, 2.0), &canvas());
    assert_eq!(r, Rect::new(14.0, 12.0, 16.0, 8.0));
}

#[test]
fn ne_keeps_bottom_left_fixed() {
    let orig = Rect::new(10.0, 10.0, 20.0, 10.0);
    let r = resize(Corner::Ne, orig, Point::new(5.0, -4.0), &canvas());
    assert_eq!(r.x, 10.0);
    assert_eq!(r.y + r.height, 20.0);
    assert_eq!(r.width, 25.0);
    assert_eq!(r.height, 14.0);
}

#[test]
fn sw_keeps_top_right_fixed() {
    let orig = Rect::new(10.0, 10.0, 20.0, 10.0);
    let r = resize(Corner::Sw, orig, Point::new(-5.0, 4.0), &canvas());
    assert_eq!(r.x + r.width, 30.0);
    assert_eq!(r.y, 10.0);
    assert_eq!(r.width, 25.0);
    assert_eq!(r.height, 14.0);
}

#[test]
fn shrinking_past_anchor_floors_without_moving_anchor() {
    let orig = Rect::new(10.0, 10.0, 20.0, 10.0);
    let r = resize(Corner::Nw, orig, Point::new(100.0, 100.0), &canvas());
    assert_eq!(r.width, MIN_ELEMENT_SIZE_MM);
    assert_eq!(r.height, MIN_ELEMENT_SIZE_MM);
    assert!((r.x + r.width - 30.0).abs() < EPS);
    assert!((r.y + r.height - 20.0).abs() < EPS);
}

#[test]
fn growing_past_canvas_edge_stops_at_edge() {
    let c = canvas();
    let r = resize(Corner::Se, Rect::new(80.0, 40.0, 10.0, 5.0), Point::new(100.0, 100.0), &c);
    assert_eq!(r, Rect::new(80.0, 40.0, 20.0, 10.0));
    let r = resize(Corner::Nw, Rect::new(5.0, 5.0, 10.0, 5.0), Point::new(-100.0, -100.0), &c);
    assert_eq!(r, Rect::new(0.0, 0.0, 15.0, 10.0));
}

#[test]
fn random_gesture_sequences_stay_on_canvas() {
    let c = canvas();
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        #[allow(clippy::cast_precision_loss)]
        let unit = (seed >> 11) as f64 / (1u64 << 53) as f64;
        unit * 240.0 - 120.0
    };
    let mut rect = Rect::new(10.0, 10.0, 20.0, 10.0);
    for step in 0..2000 {
        if step % 3 == 0 {
            let p = drag_to(Point::new(next(), next()), Point::new(1.0, 1.0), rect.width, rect.height, &c);
            rect.x = p.x;
            rect.y = p.y;
        } else {
            let corner = Corner::ALL[step % 4];
            rect = resize(corner, rect, Point::new(next(), next()), &c);
        }
        assert_on_canvas(&rect, &c);
    }
}

#[test]
fn clamp_rect_shrinks_oversized() {
    let r = clamp_rect(Rect::new(90.0, 45.0, 200.0, 8.0), &canvas());
    assert_eq!(r, Rect::new(0.0, 42.0, 100.0, 8.0));
}

#[test]
fn corner_points_and_cursors() {
    let r = Rect::new(1.0, 2.0, 10.0, 20.0);
    assert_eq!(Corner::Nw.point_on(&r), Point::new(1.0, 2.0));
    assert_eq!(Corner::Se.point_on(&r), Point::new(11.0, 22.0));
    assert_eq!(Corner::Ne.cursor(), "nesw-resize");
    assert_eq!(Corner::Se.cursor(), "nwse-resize");
}
