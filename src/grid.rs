//! The terminal grid a [`TableView`](crate::view::TableView) delegates to.
//!
//! It keeps what only matters while the table is on screen: selection,
//! resolved column widths, the scroll offset and the geometry of the last
//! rendered frame, which is needed to map mouse positions back to rows.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::trace;

use crate::domain::SelectionMode;
use crate::selection::GridSelection;

const SCROLL_STEP: usize = 3;

/// Pointer gestures, translated from raw mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press { row: usize, extend: bool, toggle: bool },
    Drag { row: usize },
    Release,
    Scroll { down: bool },
}

#[derive(Debug, Clone)]
pub struct Grid {
    pub selection: GridSelection,
    pub column_widths: Vec<u32>,
    pub offset: usize,
    pub adjusting: bool,
    pub dirty: bool,
    /// Set when the lead row moved and has not been brought into view yet.
    pub lead_moved: bool,
    area: Rect,
    header_lines: u16,
    row_lines: u16,
}

impl Grid {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            selection: GridSelection::new(mode),
            column_widths: Vec::new(),
            offset: 0,
            adjusting: false,
            dirty: true,
            lead_moved: false,
            area: Rect::default(),
            header_lines: 0,
            row_lines: 1,
        }
    }

    /// Remember the geometry of the frame being rendered.
    pub fn set_frame(&mut self, area: Rect, header_lines: u16, row_lines: u16) {
        self.area = area;
        self.header_lines = header_lines;
        self.row_lines = row_lines.max(1);
    }

    pub fn header_lines(&self) -> u16 {
        self.header_lines
    }

    pub fn row_lines(&self) -> u16 {
        self.row_lines
    }

    /// Number of rows that fit below the header of the last frame.
    pub fn visible_rows(&self) -> usize {
        let body = self.area.height.saturating_sub(self.header_lines);
        (body / self.row_lines) as usize
    }

    /// Row under screen line `y`, if any.
    pub fn row_at(&self, column: u16, y: u16, row_count: usize) -> Option<usize> {
        let body_top = self.area.y + self.header_lines;
        let inside = column >= self.area.x
            && column < self.area.x + self.area.width
            && y >= body_top
            && y < self.area.y + self.area.height;
        if !inside {
            return None;
        }
        let row = self.offset + ((y - body_top) / self.row_lines) as usize;
        (row < row_count).then_some(row)
    }

    /// Scroll so that `row` is inside the visible window.
    pub fn scroll_to(&mut self, row: usize) {
        let visible = self.visible_rows().max(1);
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + visible {
            self.offset = row + 1 - visible;
        }
    }

    /// Scroll the lead row into view, once per lead change. Offsets set by
    /// the scroll wheel survive until the lead moves again.
    pub fn reveal_lead(&mut self, row_count: usize) {
        if !std::mem::take(&mut self.lead_moved) {
            return;
        }
        if let Some(lead) = self.selection.rows.lead().filter(|&l| l < row_count) {
            self.scroll_to(lead);
        }
    }

    pub fn clamp_offset(&mut self, row_count: usize) {
        let visible = self.visible_rows().max(1);
        self.offset = self.offset.min(row_count.saturating_sub(visible));
    }

    pub fn scroll(&mut self, down: bool, row_count: usize) {
        self.offset = if down {
            self.offset + SCROLL_STEP
        } else {
            self.offset.saturating_sub(SCROLL_STEP)
        };
        self.clamp_offset(row_count);
        self.dirty = true;
    }

    /// Apply a navigation key to the row selection. Returns whether the
    /// selection changed.
    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize) -> bool {
        if row_count == 0 {
            return false;
        }
        let last = row_count - 1;
        let lead = self.selection.rows.lead().map(|l| l.min(last));
        let page = self.visible_rows().max(1);
        let target = match key.code {
            KeyCode::Up => lead.map(|l| l.saturating_sub(1)).unwrap_or(0),
            KeyCode::Down => lead.map(|l| (l + 1).min(last)).unwrap_or(0),
            KeyCode::PageUp => lead.map(|l| l.saturating_sub(page)).unwrap_or(0),
            KeyCode::PageDown => lead.map(|l| (l + page).min(last)).unwrap_or(0),
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.selection.rows.select_all(row_count);
            }
            KeyCode::Esc => return self.selection.clear(),
            _ => return false,
        };
        trace!("Key {:?} moves lead {lead:?} -> {target}", key.code);
        let changed = if key.modifiers.contains(KeyModifiers::SHIFT) {
            let anchor = self.selection.rows.anchor().unwrap_or(target).min(last);
            self.selection.rows.set_interval(anchor, target)
        } else {
            self.selection.rows.set_interval(target, target)
        };
        self.scroll_to(target);
        self.dirty = true;
        changed
    }

    pub fn pointer_action(&self, event: MouseEvent, row_count: usize) -> Option<PointerAction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let row = self.row_at(event.column, event.row, row_count)?;
                Some(PointerAction::Press {
                    row,
                    extend: event.modifiers.contains(KeyModifiers::SHIFT),
                    toggle: event.modifiers.contains(KeyModifiers::CONTROL),
                })
            }
            MouseEventKind::Drag(MouseButton::Left) if self.adjusting => {
                let row = self.row_at(event.column, event.row, row_count)?;
                Some(PointerAction::Drag { row })
            }
            MouseEventKind::Up(MouseButton::Left) if self.adjusting => Some(PointerAction::Release),
            MouseEventKind::ScrollDown => Some(PointerAction::Scroll { down: true }),
            MouseEventKind::ScrollUp => Some(PointerAction::Scroll { down: false }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_frame() -> Grid {
        let mut grid = Grid::new(SelectionMode::MultipleInterval);
        // 1 header line, 5 body lines
        grid.set_frame(Rect::new(0, 0, 20, 6), 1, 1);
        grid
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn rows_under_the_header_map_to_indices() {
        let mut grid = grid_with_frame();
        assert_eq!(grid.visible_rows(), 5);
        assert_eq!(grid.row_at(3, 0, 10), None);
        assert_eq!(grid.row_at(3, 1, 10), Some(0));
        assert_eq!(grid.row_at(3, 5, 10), Some(4));
        assert_eq!(grid.row_at(3, 5, 3), None);
        grid.offset = 4;
        assert_eq!(grid.row_at(3, 2, 10), Some(5));
        assert_eq!(grid.row_at(25, 2, 10), None);
    }

    #[test]
    fn arrow_keys_move_and_scroll() {
        let mut grid = grid_with_frame();
        assert!(grid.handle_key(key(KeyCode::Down, KeyModifiers::NONE), 10));
        assert_eq!(grid.selection.rows.indices(), vec![0]);
        assert!(grid.handle_key(key(KeyCode::End, KeyModifiers::NONE), 10));
        assert_eq!(grid.selection.rows.indices(), vec![9]);
        assert_eq!(grid.offset, 5);
        assert!(grid.handle_key(key(KeyCode::Up, KeyModifiers::SHIFT), 10));
        assert_eq!(grid.selection.rows.indices(), vec![8, 9]);
        assert!(!grid.handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), 10));
        assert!(grid.handle_key(key(KeyCode::Esc, KeyModifiers::NONE), 10));
        assert!(grid.selection.rows.is_empty());
    }

    #[test]
    fn drag_is_only_reported_while_adjusting() {
        let mut grid = grid_with_frame();
        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 1,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(grid.pointer_action(drag, 10), None);
        grid.adjusting = true;
        assert_eq!(grid.pointer_action(drag, 10), Some(PointerAction::Drag { row: 2 }));
    }

    #[test]
    fn frame_geometry_is_remembered() {
        let mut grid = Grid::new(SelectionMode::Single);
        grid.set_frame(Rect::new(2, 1, 30, 10), 1, 0);
        assert_eq!(grid.header_lines(), 1);
        assert_eq!(grid.row_lines(), 1);
        grid.set_frame(Rect::new(2, 1, 30, 10), 0, 3);
        assert_eq!(grid.row_lines(), 3);
        assert_eq!(grid.visible_rows(), 3);
    }

    #[test]
    fn lead_is_revealed_once() {
        let mut grid = grid_with_frame();
        grid.selection.rows.set_interval(8, 8);
        grid.lead_moved = true;
        grid.reveal_lead(10);
        assert_eq!(grid.offset, 4);
        assert!(!grid.lead_moved);

        grid.scroll(false, 10);
        grid.reveal_lead(10);
        assert_eq!(grid.offset, 1);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut grid = grid_with_frame();
        grid.scroll(true, 6);
        assert_eq!(grid.offset, 1);
        grid.scroll(false, 6);
        assert_eq!(grid.offset, 0);
    }
}
