/// Cursor over a list whose length can change between frames (the filter
/// decides how many items are visible).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub(crate) index: usize,
}

impl Selection {
    pub(crate) fn move_by(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.index = 0;
            return;
        }
        let last = len as isize - 1;
        let new = (self.index as isize + offset).clamp(0, last);
        self.index = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.index = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.index = len.saturating_sub(1);
    }

    /// Index clamped to the current length; `None` for an empty list.
    pub(crate) fn current(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.index.min(len - 1))
        }
    }
}

/// First item to draw so that `selected` stays inside a window of
/// `capacity` items.
pub(crate) fn scroll_start(selected: usize, capacity: usize, len: usize) -> usize {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_is_clamped() {
        let mut selection = Selection::default();
        selection.move_by(-3, 4);
        assert_eq!(selection.index, 0);
        selection.move_by(10, 4);
        assert_eq!(selection.index, 3);
        selection.move_by(1, 0);
        assert_eq!(selection.index, 0);
    }

    #[test]
    fn current_follows_shrinking_lists() {
        let mut selection = Selection::default();
        selection.select_last(10);
        assert_eq!(selection.current(10), Some(9));
        assert_eq!(selection.current(3), Some(2));
        assert_eq!(selection.current(0), None);
    }

    #[test]
    fn scroll_window_keeps_selection_visible() {
        assert_eq!(scroll_start(0, 3, 10), 0);
        assert_eq!(scroll_start(4, 3, 10), 2);
        assert_eq!(scroll_start(9, 3, 10), 7);
        assert_eq!(scroll_start(1, 5, 2), 0);
    }
}
