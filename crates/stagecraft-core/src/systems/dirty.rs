//! Screen-space dirty region tracking.

use crate::types::Rect;

/// Accumulates the screen areas that changed since the last paint.
///
/// Overlapping rectangles are merged on insertion, so the list stays small
/// when many actors move inside the same area.
#[derive(Clone, Debug)]
pub struct DirtyRegions {
    rects: Vec<Rect>,
    enabled: bool,
}

impl Default for DirtyRegions {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DirtyRegions {
    pub fn new(enabled: bool) -> Self {
        Self {
            rects: Vec::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn add(&mut self, rect: Rect) {
        if !self.enabled || rect.is_empty() {
            return;
        }
        let mut merged = rect;
        // Keep merging until no stored rect overlaps the growing union.
        loop {
            let Some(index) = self.rects.iter().position(|r| r.intersects(&merged)) else {
                break;
            };
            merged = merged.union(&self.rects.swap_remove(index));
        }
        self.rects.push(merged);
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn take(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.rects)
    }
}
