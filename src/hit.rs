#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::ElementId;
use crate::geometry::Corner;
use crate::store::ElementStore;
use crate::viewport::{Point, Viewport};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Test which element (if any) is under `mm_pt`.
///
/// Resize handles of the selected element are checked first, then element
/// bodies from front to back. Bodies are tested on their axis-aligned box.
#[must_use]
pub fn hit_test(mm_pt: Point, store: &ElementStore, viewport: &Viewport, selected: Option<ElementId>) -> Option<Hit> {
    if let Some(sel) = selected.and_then(|id| store.get(&id)) {
        let radius = viewport.px_to_mm(HANDLE_RADIUS_PX);
        let rect = sel.rect();
        for corner in Corner::ALL {
            let c = corner.point_on(&rect);
            if (mm_pt.x - c.x).abs() <= radius && (mm_pt.y - c.y).abs() <= radius {
                return Some(Hit { element_id: sel.id, part: HitPart::ResizeHandle(corner) });
            }
        }
    }

    store
        .elements()
        .iter()
        .rev()
        .find(|e| e.rect().contains(mm_pt))
        .map(|e| Hit { element_id: e.id, part: HitPart::Body })
}
