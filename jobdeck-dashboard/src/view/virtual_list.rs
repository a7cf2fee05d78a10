//! Windowed rendering for large result sets
//!
//! With fixed row heights the visible slice follows directly from the scroll
//! offset, so only those rows (plus a little overscan) are materialized.

use std::ops::Range;

/// The slice of rows to draw for a given scroll position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualWindow {
    /// First row intersecting the viewport
    pub first_visible: usize,
    /// First row to render, overscan included
    pub start: usize,
    /// One past the last row to render, overscan included
    pub end: usize,
    pub row_height: u32,
    /// Scroll offset after clamping to the scrollable range
    pub scroll_offset: u32,
    /// Height of the whole list, as if every row were drawn
    pub content_height: u64,
}

impl VirtualWindow {
    pub fn compute(
        item_count: usize,
        row_height: u32,
        viewport_height: u32,
        scroll_offset: u32,
        overscan: usize,
    ) -> Self {
        let row_height = row_height.max(1);
        let content_height = item_count as u64 * u64::from(row_height);
        let max_offset = content_height.saturating_sub(u64::from(viewport_height));
        let scroll_offset = u64::from(scroll_offset).min(max_offset) as u32;

        let first_visible = ((scroll_offset / row_height) as usize).min(item_count);
        // One past the row holding the viewport's bottom pixel
        let bottom = u64::from(scroll_offset) + u64::from(viewport_height.max(1)) - 1;
        let last_visible = ((bottom / u64::from(row_height)) as usize + 1).min(item_count);

        Self {
            first_visible,
            start: first_visible.saturating_sub(overscan),
            end: (last_visible + overscan).min(item_count),
            row_height,
            scroll_offset,
            content_height,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Pixel offset of a row from the top of the list
    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.row_height)
    }
}
