//! Viewport windowing over the flat row list.
//!
//! The window is the only part of the flat list that ever reaches the
//! rendering backend. Its size depends on viewport height and row
//! height alone, so scene cost is bounded no matter how many rows the
//! flatten produced.

/// Overscan factor applied to the viewport height before slicing, so
/// that moderate scrolls land inside already-rendered rows.
pub const OVERSCAN: f32 = 1.5;

/// A clamped slice of the flat row list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSlice {
    /// Index of the first row in the slice.
    pub start: usize,
    /// Row capacity of the overscanned viewport.
    pub rows: usize,
    /// Rows actually covered; `len <= rows` near the end of the list.
    pub len: usize,
}

impl WindowSlice {
    /// The flat-list index range covered by the slice.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Computes the visible slice for the given scroll state.
///
/// `scroll_offset` is the distance scrolled past the top of the tree in
/// scene units; negative values (rubber-banding) clamp to zero. The
/// slice never extends past `flat_len`.
pub fn window(flat_len: usize, scroll_offset: f32, viewport: f32, row_height: f32) -> WindowSlice {
    let rows = ((viewport * OVERSCAN / row_height).ceil() as usize) + 1;
    let start = ((scroll_offset.max(0.0) / row_height).floor() as usize).min(flat_len);
    let len = rows.min(flat_len - start);
    WindowSlice { start, rows, len }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_stays_within_flat_list() {
        let slice = window(100, 0.0, 200.0, 20.0);
        assert_eq!(slice.start, 0);
        assert_eq!(slice.rows, 16);
        assert_eq!(slice.len, 16);
        assert!(slice.range().end <= 100);
    }

    #[test]
    fn test_negative_scroll_clamps_to_top() {
        let slice = window(100, -500.0, 200.0, 20.0);
        assert_eq!(slice.start, 0);
    }

    #[test]
    fn test_scroll_past_end_yields_empty_slice() {
        let slice = window(10, 10_000.0, 200.0, 20.0);
        assert_eq!(slice.start, 10);
        assert_eq!(slice.len, 0);
        assert!(slice.range().is_empty());
    }

    #[test]
    fn test_short_list_truncates_len_but_not_rows() {
        let slice = window(3, 0.0, 200.0, 20.0);
        assert_eq!(slice.rows, 16);
        assert_eq!(slice.len, 3);
    }

    #[test]
    fn test_window_size_is_independent_of_node_count() {
        // A 10-row viewport over a 1000-row list stays within the
        // overscan bound of 16 rows wherever it is scrolled.
        for scroll in [0.0, 777.0, 10_000.0, 19_999.0] {
            let slice = window(1000, scroll, 200.0, 20.0);
            assert!(slice.len <= 16, "len {} at scroll {scroll}", slice.len);
        }
    }

    #[test]
    fn test_mid_scroll_positions_start_on_row_boundary() {
        // 130 units past the top of 20px rows puts row 6 first.
        let slice = window(1000, 130.0, 200.0, 20.0);
        assert_eq!(slice.start, 6);
    }
}
