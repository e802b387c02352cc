//! Index based selection models used by the grid for rows and columns.

use std::collections::BTreeSet;

use crate::domain::SelectionMode;

/// Selected indices of one axis of the grid.
#[derive(Debug, Clone, Default)]
pub struct ListSelection {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
    lead: Option<usize>,
}

impl ListSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Changing the mode drops the current selection.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        self.mode = mode;
        self.clear()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn min(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn lead(&self) -> Option<usize> {
        self.lead
    }

    /// Replace the selection with `anchor..=lead` (in either direction).
    pub fn set_interval(&mut self, anchor: usize, lead: usize) -> bool {
        let next: BTreeSet<usize> = match self.mode {
            SelectionMode::Single => BTreeSet::from([lead]),
            _ => span(anchor, lead).collect(),
        };
        self.replace(next, anchor, lead)
    }

    /// Extend the selection by `anchor..=lead`. Modes that cannot hold more
    /// than one interval behave like [`ListSelection::set_interval`].
    pub fn add_interval(&mut self, anchor: usize, lead: usize) -> bool {
        match self.mode {
            SelectionMode::MultipleInterval => {
                let mut next = self.selected.clone();
                next.extend(span(anchor, lead));
                self.replace(next, anchor, lead)
            }
            _ => self.set_interval(anchor, lead),
        }
    }

    /// Deselect `first..=last`. Cost follows the selection, not the range.
    pub fn remove_interval(&mut self, first: usize, last: usize) -> bool {
        let doomed: Vec<usize> = self.selected.range(span(first, last)).copied().collect();
        let mut next = self.selected.clone();
        for idx in &doomed {
            next.remove(idx);
        }
        let (anchor, lead) = (self.anchor.unwrap_or(first), self.lead.unwrap_or(last));
        self.replace(next, anchor, lead)
    }

    /// Select `0..len`, only honoured in multiple interval mode.
    pub fn select_all(&mut self, len: usize) -> bool {
        if len == 0 || self.mode != SelectionMode::MultipleInterval {
            return false;
        }
        self.set_interval(0, len - 1)
    }

    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        self.lead = None;
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Account for the removal of `first..=last` from the underlying list.
    pub fn remove_indices(&mut self, first: usize, last: usize) -> bool {
        let (first, last) = (first.min(last), first.max(last));
        let removed = (last - first).saturating_add(1);
        let shift = |idx: usize| {
            if idx > last {
                Some(idx.saturating_sub(removed))
            } else if idx >= first {
                None
            } else {
                Some(idx)
            }
        };
        let next: BTreeSet<usize> = self.selected.iter().filter_map(|&idx| shift(idx)).collect();
        let changed = next != self.selected;
        self.selected = next;
        self.anchor = self.anchor.and_then(shift);
        self.lead = self.lead.and_then(shift);
        changed
    }

    /// Account for `first..=last` being inserted into the underlying list.
    pub fn insert_indices(&mut self, first: usize, last: usize) -> bool {
        let (first, last) = (first.min(last), first.max(last));
        let added = (last - first).saturating_add(1);
        let shift = |idx: usize| {
            if idx >= first {
                idx.saturating_add(added)
            } else {
                idx
            }
        };
        let next: BTreeSet<usize> = self.selected.iter().map(|&idx| shift(idx)).collect();
        let changed = next != self.selected;
        self.selected = next;
        self.anchor = self.anchor.map(shift);
        self.lead = self.lead.map(shift);
        changed
    }

    /// Drop every index at or beyond `len`.
    pub fn truncate(&mut self, len: usize) -> bool {
        let next: BTreeSet<usize> = self.selected.range(..len).copied().collect();
        let changed = next.len() != self.selected.len();
        self.selected = next;
        self.anchor = self.anchor.filter(|&idx| idx < len);
        self.lead = self.lead.filter(|&idx| idx < len);
        changed
    }

    fn replace(&mut self, next: BTreeSet<usize>, anchor: usize, lead: usize) -> bool {
        self.anchor = Some(anchor);
        self.lead = Some(lead);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }
}

fn span(a: usize, b: usize) -> std::ops::RangeInclusive<usize> {
    a.min(b)..=a.max(b)
}

/// Row and column selection of the grid.
#[derive(Debug, Clone)]
pub struct GridSelection {
    pub rows: ListSelection,
    pub columns: ListSelection,
    pub row_selection_allowed: bool,
    pub column_selection_allowed: bool,
}

impl GridSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            rows: ListSelection::new(mode),
            columns: ListSelection::new(mode),
            row_selection_allowed: true,
            column_selection_allowed: false,
        }
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        let rows = self.rows.set_mode(mode);
        let columns = self.columns.set_mode(mode);
        rows || columns
    }

    pub fn is_cell_selected(&self, row: usize, column: usize) -> bool {
        match (self.row_selection_allowed, self.column_selection_allowed) {
            (true, false) => self.rows.is_selected(row),
            (false, true) => self.columns.is_selected(column),
            (true, true) => self.rows.is_selected(row) && self.columns.is_selected(column),
            (false, false) => false,
        }
    }

    pub fn clear(&mut self) -> bool {
        let rows = self.rows.clear();
        let columns = self.columns.clear();
        rows || columns
    }
}
