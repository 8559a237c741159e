//! Scroll arithmetic for the fixed-row-height result list.
//!
//! Only rows in `visible_range` (visible rows plus overscan) are laid out.
//! The list height is `min(page_size, row_count) * row_height`, so the
//! viewport always shows whole rows.

use std::ops::Range;

/// How `scroll_to_item` positions the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Scroll the minimum distance needed to show the row.
    Auto,
    /// Like `Auto` when the row is within a viewport of the current
    /// position, otherwise center it.
    Smart,
}

/// Scroll state of a uniform-height row list.
#[derive(Debug, Clone)]
pub struct VirtualList {
    /// Distance from the top of the content to the top of the viewport.
    scroll_offset_px: f32,
    /// Viewport height in pixels.
    height_px: f32,
    row_height: f32,
    overscan: usize,
}

impl VirtualList {
    pub fn new(row_height: f32, overscan: usize) -> Self {
        Self {
            scroll_offset_px: 0.0,
            height_px: 0.0,
            row_height,
            overscan,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn scroll_offset_px(&self) -> f32 {
        self.scroll_offset_px
    }

    pub fn height_px(&self) -> f32 {
        self.height_px
    }

    /// Height of a list showing at most `page_size` rows.
    pub fn list_height(&self, page_size: usize, row_count: usize) -> f32 {
        page_size.min(row_count) as f32 * self.row_height
    }

    /// Resize the viewport and re-clamp the scroll offset.
    pub fn update_size(&mut self, height_px: f32, row_count: usize) {
        self.height_px = height_px.max(0.0);
        self.set_scroll_offset_px(self.scroll_offset_px, row_count);
    }

    /// Set the scroll offset, clamped to `[0, content - viewport]`.
    pub fn set_scroll_offset_px(&mut self, px: f32, row_count: usize) {
        let max_offset = self.max_offset(row_count);
        self.scroll_offset_px = px.clamp(0.0, max_offset);
    }

    pub fn reset(&mut self) {
        self.scroll_offset_px = 0.0;
    }

    fn content_height(&self, row_count: usize) -> f32 {
        row_count as f32 * self.row_height
    }

    fn max_offset(&self, row_count: usize) -> f32 {
        (self.content_height(row_count) - self.height_px).max(0.0)
    }

    /// Rows to lay out: those intersecting the viewport, widened by the
    /// overscan on both sides.
    pub fn visible_range(&self, row_count: usize) -> Range<usize> {
        if row_count == 0 || self.row_height <= 0.0 {
            return 0..0;
        }
        let first = (self.scroll_offset_px / self.row_height).floor() as usize;
        let bottom = self.scroll_offset_px + self.height_px;
        let last = ((bottom / self.row_height).ceil() as usize).max(first + 1);

        let start = first.saturating_sub(self.overscan);
        let end = (last + self.overscan).min(row_count);
        start.min(end)..end
    }

    /// Scroll so that `index` is in view.
    ///
    /// Returns `true` if the offset changed.
    pub fn scroll_to_item(&mut self, index: usize, align: Align, row_count: usize) -> bool {
        if row_count == 0 {
            return false;
        }
        let index = index.min(row_count - 1);
        let old = self.scroll_offset_px;

        let row_top = index as f32 * self.row_height;
        // Offset that puts the row at the top, and at the bottom
        let top_aligned = row_top.min(self.max_offset(row_count)).max(0.0);
        let bottom_aligned = (row_top - self.height_px + self.row_height).max(0.0);

        let near = self.scroll_offset_px >= bottom_aligned - self.height_px
            && self.scroll_offset_px <= top_aligned + self.height_px;

        let target = match align {
            Align::Smart if !near => {
                let middle = (bottom_aligned + (top_aligned - bottom_aligned) / 2.0).round();
                let last_offset = self.max_offset(row_count);
                if middle < (self.height_px / 2.0).ceil() {
                    0.0
                } else if middle > last_offset + (self.height_px / 2.0).floor() {
                    last_offset
                } else {
                    middle
                }
            }
            _ => {
                if self.scroll_offset_px >= bottom_aligned && self.scroll_offset_px <= top_aligned {
                    self.scroll_offset_px
                } else if self.scroll_offset_px < bottom_aligned {
                    bottom_aligned
                } else {
                    top_aligned
                }
            }
        };

        self.set_scroll_offset_px(target, row_count);
        self.scroll_offset_px != old
    }

    /// Row under a y coordinate relative to the top of the viewport.
    pub fn row_at(&self, y: f32, row_count: usize) -> Option<usize> {
        if y < 0.0 || y >= self.height_px || self.row_height <= 0.0 {
            return None;
        }
        let row = ((self.scroll_offset_px + y) / self.row_height).floor() as usize;
        (row < row_count).then_some(row)
    }

    /// Top of `row` relative to the top of the viewport.
    pub fn row_offset(&self, row: usize) -> f32 {
        row as f32 * self.row_height - self.scroll_offset_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(rows: usize, count: usize) -> VirtualList {
        let mut list = VirtualList::new(31.0, 4);
        let height = list.list_height(rows, count);
        list.update_size(height, count);
        list
    }

    #[test]
    fn test_list_height() {
        let list = VirtualList::new(31.0, 4);
        assert_eq!(list.list_height(7, 3), 93.0);
        assert_eq!(list.list_height(7, 20), 217.0);
        assert_eq!(list.list_height(7, 0), 0.0);
    }

    #[test]
    fn test_visible_range_with_overscan() {
        let mut list = list(7, 100);
        assert_eq!(list.visible_range(100), 0..11);

        list.scroll_to_item(50, Align::Auto, 100);
        let range = list.visible_range(100);
        assert!(range.contains(&50));
        assert_eq!(range.start, 44 - 4);
        assert_eq!(range.end, 51 + 4);

        assert_eq!(list.visible_range(0), 0..0);
    }

    #[test]
    fn test_auto_scrolls_minimum() {
        let mut list = list(7, 100);
        // Already visible
        assert!(!list.scroll_to_item(6, Align::Auto, 100));

        // One past the bottom brings it to the bottom edge
        assert!(list.scroll_to_item(7, Align::Auto, 100));
        assert_eq!(list.scroll_offset_px(), 31.0);

        // Back to the top
        assert!(list.scroll_to_item(0, Align::Auto, 100));
        assert_eq!(list.scroll_offset_px(), 0.0);
    }

    #[test]
    fn test_smart_centers_far_rows() {
        let mut list = list(7, 100);
        list.scroll_to_item(50, Align::Smart, 100);
        let first = list.scroll_offset_px() / 31.0;
        assert!((46.0..=48.0).contains(&first));

        // Near rows behave like Auto
        let before = list.scroll_offset_px();
        list.scroll_to_item(first as usize + 7, Align::Smart, 100);
        assert_eq!(list.scroll_offset_px(), before + 31.0);
    }

    #[test]
    fn test_scroll_clamped_at_end() {
        let mut list = list(7, 10);
        list.scroll_to_item(9, Align::Smart, 10);
        assert_eq!(list.scroll_offset_px(), 3.0 * 31.0);
        assert_eq!(list.visible_range(10).end, 10);
    }

    #[test]
    fn test_row_at() {
        let mut list = list(7, 100);
        assert_eq!(list.row_at(0.0, 100), Some(0));
        assert_eq!(list.row_at(40.0, 100), Some(1));
        assert_eq!(list.row_at(-1.0, 100), None);
        assert_eq!(list.row_at(217.0, 100), None);

        list.scroll_to_item(20, Align::Auto, 100);
        assert_eq!(list.row_at(0.0, 100), Some(14));
        assert_eq!(list.row_offset(14), 0.0);
    }
}
