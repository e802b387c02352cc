//! The externally visible table widget.
//!
//! [`TableView`] combines a [`TableModel`], the terminal [`Grid`] it renders
//! through and the presentation policy around them: font driven row height,
//! column width distribution, vertical sizing, header visibility and the
//! synthesis of [`SelectionEvent`]s.
//!
//! Visual changes are not applied inline. They are queued on the view's UI
//! queue and take effect on the next [`TableView::dispatch_pending`], after
//! whatever layout work was already pending. Consecutive changes collapse into
//! a single resize pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use tracing::{debug, trace};

use crate::domain::{
    Alignment, CellGeometry, SelectionMode, Size, SizingPolicy, TableOptions,
};
use crate::font::Font;
use crate::grid::{Grid, PointerAction};
use crate::layout::{distribute_column_widths, preferred_viewport_height};
use crate::model::{TableModel, TableModelEvent};
use crate::queue::{UiHandle, UiQueue, run_pending, ui_queue};
use crate::row_model::{RowModel, ValueKind};
use crate::supplier::{DataSupplier, VecSupplier};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A settled selection change, with the selected records resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent<T> {
    pub source: ViewId,
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
    pub records: Vec<T>,
}

type SelectionListener<T> = Box<dyn FnMut(&SelectionEvent<T>)>;

/// Presentation state of one column, rebuilt whenever the structure changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewColumn {
    pub name: Option<String>,
    pub kind: ValueKind,
    pub alignment: Alignment,
    pub preferred_width: u32,
}

pub struct TableView<T> {
    id: ViewId,
    model: TableModel<T>,
    grid: Option<Grid>,
    columns: Vec<ViewColumn>,
    selection_mode: SelectionMode,
    column_weights: Vec<f64>,
    viewport_width: u32,
    max_visible_rows: usize,
    sizing_policy: SizingPolicy,
    header_visible: bool,
    font: Font,
    header_font: Font,
    row_margin: u32,
    row_height: u32,
    header_height: u32,
    cell_geometry: CellGeometry,
    listeners: Vec<SelectionListener<T>>,
    selection_dirty: bool,
    resize_pending: bool,
    layout_passes: usize,
    handle: UiHandle<TableView<T>>,
    queue: UiQueue<TableView<T>>,
}

impl<T: Clone + 'static> TableView<T> {
    /// Unconfigured table showing the placeholder schema without rows.
    pub fn new(options: TableOptions) -> Self {
        Self::with_model(TableModel::placeholder(), options)
    }

    pub fn with_row_model(row_model: impl RowModel<T> + 'static, options: TableOptions) -> Self {
        Self::with_model(TableModel::with_row_model(row_model), options)
    }

    pub fn with_model(model: TableModel<T>, options: TableOptions) -> Self {
        let (handle, queue) = ui_queue();
        let mut view = Self {
            id: ViewId::next(),
            model,
            grid: Some(Grid::new(options.selection_mode)),
            columns: Vec::new(),
            selection_mode: options.selection_mode,
            column_weights: options.column_weights,
            viewport_width: 0,
            max_visible_rows: options.max_visible_rows,
            sizing_policy: options.sizing_policy,
            header_visible: !options.hide_header,
            header_font: options.font.to_bold(),
            font: options.font,
            row_margin: options.row_margin,
            row_height: 0,
            header_height: 0,
            cell_geometry: options.cell_geometry,
            listeners: Vec::new(),
            selection_dirty: false,
            resize_pending: false,
            layout_passes: 0,
            handle,
            queue,
        };
        view.derive_font_metrics();
        view.rebuild_columns();
        // Events raised while the model was built stand for the initial state.
        view.model.take_events();
        view.schedule_resize();
        debug!(
            "Created table view {:?} with {} columns, {} rows",
            view.id,
            view.model.column_count(),
            view.model.row_count()
        );
        view
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn model(&self) -> &TableModel<T> {
        &self.model
    }

    /// Mutable access to the model, e.g. to raise fine grained change hints.
    /// The view reacts on the next [`TableView::dispatch_pending`].
    pub fn model_mut(&mut self) -> &mut TableModel<T> {
        &mut self.model
    }

    pub fn row_count(&self) -> usize {
        self.model.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.model.column_count()
    }

    pub fn columns(&self) -> &[ViewColumn] {
        &self.columns
    }

    // ------------------------------ data ------------------------------ //

    pub fn set_data(&mut self, records: Vec<T>) {
        self.set_data_supplier(VecSupplier::new(records));
    }

    /// Install records shared with the caller, or a private copy of them.
    pub fn set_shared_data(&mut self, records: Arc<Vec<T>>, copy: bool) {
        self.set_data_supplier(VecSupplier::from_shared(records, copy));
    }

    pub fn set_data_supplier(&mut self, supplier: impl DataSupplier<T> + 'static) {
        self.model.set_data_supplier(Box::new(supplier));
        self.process_model_events();
    }

    pub fn set_row_model(&mut self, row_model: impl RowModel<T> + 'static) {
        self.model.set_row_model(Box::new(row_model));
        self.process_model_events();
    }

    // ----------------------------- sizing ----------------------------- //

    /// Store per-column width weights and recompute column widths on the
    /// UI queue.
    pub fn set_column_size_percentages(&mut self, weights: Vec<f64>) {
        self.column_weights = weights;
        self.handle.invoke_later(|view| view.apply_column_widths());
    }

    pub fn column_size_percentages(&self) -> &[f64] {
        &self.column_weights
    }

    /// Width in pixels the columns are distributed over.
    pub fn set_viewport_width(&mut self, width: u32) {
        if self.viewport_width != width {
            trace!("Viewport width {} -> {width}", self.viewport_width);
            self.viewport_width = width;
            self.apply_column_widths();
        }
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Resolved width of every column in pixels.
    pub fn column_widths(&self) -> Vec<u32> {
        self.grid
            .as_ref()
            .map(|grid| grid.column_widths.clone())
            .unwrap_or_default()
    }

    pub fn set_maximum_visible_rows(&mut self, rows: usize) {
        self.max_visible_rows = rows;
        self.schedule_resize();
    }

    pub fn maximum_visible_rows(&self) -> usize {
        self.max_visible_rows
    }

    pub fn set_vertical_size_policy(&mut self, policy: SizingPolicy) {
        self.sizing_policy = policy;
        self.schedule_resize();
    }

    pub fn vertical_size_policy(&self) -> SizingPolicy {
        self.sizing_policy
    }

    /// Size the scroll viewport asks for, in pixels.
    pub fn preferred_viewport_size(&self) -> Size {
        let rows = self.model.row_count();
        let natural_height = self
            .row_height
            .saturating_mul(rows.min(u32::MAX as usize) as u32);
        let natural_width: u32 = self.columns.iter().map(|c| c.preferred_width).sum();
        Size {
            width: natural_width,
            height: preferred_viewport_height(
                self.sizing_policy,
                self.row_height,
                rows,
                self.max_visible_rows,
                natural_height,
            ),
        }
    }

    // ------------------------------ font ------------------------------ //

    /// Change the font. Row and header height follow the font metrics; the
    /// layout is refreshed on the UI queue.
    pub fn set_font(&mut self, font: Font) {
        self.header_font = font.to_bold();
        self.font = font;
        self.derive_font_metrics();
        self.schedule_resize();
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn header_font(&self) -> &Font {
        &self.header_font
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Override the row height. The next font change recomputes it.
    pub fn set_row_height(&mut self, height: u32) {
        self.row_height = height.max(1);
        self.schedule_resize();
    }

    pub fn header_height(&self) -> u32 {
        self.header_height
    }

    pub fn set_row_margin(&mut self, margin: u32) {
        self.row_margin = margin;
        self.derive_font_metrics();
        self.schedule_resize();
    }

    pub fn cell_geometry(&self) -> CellGeometry {
        self.cell_geometry
    }

    fn derive_font_metrics(&mut self) {
        self.row_height = self.font.line_height() + self.row_margin;
        self.header_height = self.header_font.line_height();
        trace!(
            "Font {:?}: row height {}, header height {}",
            self.font, self.row_height, self.header_height
        );
    }

    // ----------------------------- header ----------------------------- //

    pub fn set_header_visible(&mut self, visible: bool) {
        self.handle.invoke_later(move |view| {
            view.header_visible = visible;
            view.schedule_resize();
        });
    }

    pub fn is_header_visible(&self) -> bool {
        self.header_visible
    }

    // ---------------------------- selection --------------------------- //

    pub fn add_selection_listener(&mut self, listener: impl FnMut(&SelectionEvent<T>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
        self.mutate_selection(|selection, _| selection.set_mode(mode));
    }

    pub fn set_row_selection_allowed(&mut self, allowed: bool) {
        if let Some(grid) = self.grid.as_mut() {
            grid.selection.row_selection_allowed = allowed;
        }
    }

    pub fn set_column_selection_allowed(&mut self, allowed: bool) {
        if let Some(grid) = self.grid.as_mut() {
            grid.selection.column_selection_allowed = allowed;
        }
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.with_grid(Vec::new(), |grid| grid.selection.rows.indices())
    }

    /// Lowest selected row.
    pub fn selected_row(&self) -> Option<usize> {
        self.with_grid(None, |grid| grid.selection.rows.min())
    }

    pub fn selected_row_count(&self) -> usize {
        self.with_grid(0, |grid| grid.selection.rows.len())
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.with_grid(false, |grid| grid.selection.rows.is_selected(row))
    }

    pub fn selected_columns(&self) -> Vec<usize> {
        self.with_grid(Vec::new(), |grid| grid.selection.columns.indices())
    }

    pub fn is_column_selected(&self, column: usize) -> bool {
        self.with_grid(false, |grid| grid.selection.columns.is_selected(column))
    }

    pub fn is_cell_selected(&self, row: usize, column: usize) -> bool {
        self.with_grid(false, |grid| grid.selection.is_cell_selected(row, column))
    }

    pub fn set_row_selection_interval(&mut self, anchor: usize, lead: usize) {
        self.mutate_selection(|selection, rows| {
            rows > anchor.max(lead) && selection.rows.set_interval(anchor, lead)
        });
    }

    pub fn add_row_selection_interval(&mut self, anchor: usize, lead: usize) {
        self.mutate_selection(|selection, rows| {
            rows > anchor.max(lead) && selection.rows.add_interval(anchor, lead)
        });
    }

    pub fn remove_row_selection_interval(&mut self, first: usize, last: usize) {
        self.mutate_selection(|selection, _| selection.rows.remove_interval(first, last));
    }

    pub fn set_column_selection_interval(&mut self, anchor: usize, lead: usize) {
        let columns = self.model.column_count();
        self.mutate_selection(|selection, _| {
            columns > anchor.max(lead) && selection.columns.set_interval(anchor, lead)
        });
    }

    pub fn add_column_selection_interval(&mut self, anchor: usize, lead: usize) {
        let columns = self.model.column_count();
        self.mutate_selection(|selection, _| {
            columns > anchor.max(lead) && selection.columns.add_interval(anchor, lead)
        });
    }

    pub fn select_all(&mut self) {
        let columns = self.model.column_count();
        self.mutate_selection(|selection, rows| {
            let rows_changed = selection.rows.select_all(rows);
            let columns_changed = selection.columns.select_all(columns);
            rows_changed || columns_changed
        });
    }

    pub fn clear_selection(&mut self) {
        self.mutate_selection(|selection, _| selection.clear());
    }

    /// Mark the start or the end of a selection gesture. While adjusting,
    /// selection changes are collected and reported once the gesture ends.
    pub fn set_value_is_adjusting(&mut self, adjusting: bool) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        grid.adjusting = adjusting;
        if !adjusting && self.selection_dirty {
            self.fire_selection();
        }
    }

    pub fn value_is_adjusting(&self) -> bool {
        self.with_grid(false, |grid| grid.adjusting)
    }

    /// Records behind the selected rows, in ascending row order.
    pub fn selected_records(&self) -> Vec<T> {
        self.selected_rows()
            .into_iter()
            .filter_map(|row| self.model.record(row).ok().cloned())
            .collect()
    }

    fn with_grid<R>(&self, default: R, f: impl FnOnce(&Grid) -> R) -> R {
        self.grid.as_ref().map(f).unwrap_or(default)
    }

    fn mutate_selection(
        &mut self,
        f: impl FnOnce(&mut crate::selection::GridSelection, usize) -> bool,
    ) {
        let rows = self.model.row_count();
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        if f(&mut grid.selection, rows) {
            grid.dirty = true;
            grid.lead_moved = true;
            self.selection_changed();
        }
    }

    fn selection_changed(&mut self) {
        if self.value_is_adjusting() {
            self.selection_dirty = true;
        } else {
            self.fire_selection();
        }
    }

    fn fire_selection(&mut self) {
        self.selection_dirty = false;
        let event = SelectionEvent {
            source: self.id,
            rows: self.selected_rows(),
            columns: self.selected_columns(),
            records: self.selected_records(),
        };
        debug!(
            "Selection on {:?}: rows {:?}, columns {:?}",
            self.id, event.rows, event.columns
        );
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ------------------------------ input ----------------------------- //

    /// Feed a key press to the grid. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let rows = self.model.row_count();
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        if grid.handle_key(key, rows) {
            self.selection_changed();
            return true;
        }
        false
    }

    /// Feed a mouse event to the grid. Returns whether it was consumed.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        let rows = self.model.row_count();
        let Some(action) = self
            .grid
            .as_ref()
            .and_then(|grid| grid.pointer_action(event, rows))
        else {
            return false;
        };
        trace!("Pointer action {action:?}");
        match action {
            PointerAction::Press { row, extend, toggle } => {
                self.set_value_is_adjusting(true);
                let anchor = self
                    .with_grid(None, |grid| grid.selection.rows.anchor())
                    .filter(|_| extend)
                    .unwrap_or(row);
                if toggle && self.is_row_selected(row) {
                    self.remove_row_selection_interval(row, row);
                } else if toggle {
                    self.add_row_selection_interval(row, row);
                } else {
                    self.set_row_selection_interval(anchor, row);
                }
            }
            PointerAction::Drag { row } => {
                let anchor = self
                    .with_grid(None, |grid| grid.selection.rows.anchor())
                    .unwrap_or(row);
                self.set_row_selection_interval(anchor, row);
                if let Some(grid) = self.grid.as_mut() {
                    grid.scroll_to(row);
                }
            }
            PointerAction::Release => self.set_value_is_adjusting(false),
            PointerAction::Scroll { down } => {
                if let Some(grid) = self.grid.as_mut() {
                    grid.scroll(down, rows);
                }
            }
        }
        true
    }

    // ------------------------- model and layout ------------------------ //

    /// Handle for changing the view from other threads. Every call is
    /// queued and applied by the next [`TableView::dispatch_pending`].
    pub fn handle(&self) -> TableHandle<T> {
        TableHandle {
            inner: self.handle.clone(),
        }
    }

    /// Apply model notifications and run queued UI work. Must be called on
    /// the thread that created the view, typically once per frame.
    pub fn dispatch_pending(&mut self) -> usize {
        self.process_model_events();
        let tasks = self.queue.receiver();
        let on_ui_thread = self.queue.is_ui_thread();
        run_pending(&tasks, on_ui_thread, self)
    }

    /// Whether the grid needs to be drawn again.
    pub fn needs_repaint(&self) -> bool {
        self.with_grid(false, |grid| grid.dirty)
    }

    /// Number of resize passes run so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Release the grid. Accessors fall back to empty defaults afterwards.
    pub fn dispose(&mut self) {
        debug!("Disposing table view {:?}", self.id);
        self.grid = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.grid.is_none()
    }

    pub(crate) fn grid_mut(&mut self) -> Option<&mut Grid> {
        self.grid.as_mut()
    }

    /// Bring columns and selection in line with model changes made since
    /// the last call.
    pub(crate) fn process_model_events(&mut self) {
        for event in self.model.take_events() {
            trace!("View {:?} handles {event:?}", self.id);
            let rows = self.model.row_count();
            match event {
                TableModelEvent::DataChanged => {
                    if let Some(grid) = self.grid.as_mut() {
                        grid.offset = 0;
                    }
                    self.mutate_selection(|selection, _| selection.rows.clear());
                    self.schedule_resize();
                }
                TableModelEvent::StructureChanged => {
                    self.rebuild_columns();
                    self.mutate_selection(|selection, _| selection.clear());
                    self.schedule_resize();
                }
                TableModelEvent::RowsDeleted { first, last } => {
                    self.mutate_selection(|selection, rows| {
                        let shifted = selection.rows.remove_indices(first, last);
                        selection.rows.truncate(rows) || shifted
                    });
                    self.schedule_resize();
                }
                TableModelEvent::RowsInserted { first, last } => {
                    self.mutate_selection(|selection, _| selection.rows.insert_indices(first, last));
                    self.schedule_resize();
                }
                TableModelEvent::CellUpdated { .. } | TableModelEvent::RowsUpdated { .. } => {
                    if let Some(grid) = self.grid.as_mut() {
                        grid.dirty = true;
                    }
                }
            }
            if let Some(grid) = self.grid.as_mut() {
                grid.clamp_offset(rows);
            }
        }
    }

    fn rebuild_columns(&mut self) {
        let count = self.model.column_count();
        self.columns = (0..count)
            .map(|column| ViewColumn {
                name: self.model.column_name(column).map(str::to_string),
                kind: self.model.column_kind(column),
                alignment: self.model.column_alignment(column),
                preferred_width: 0,
            })
            .collect();
        debug!("Rebuilt {count} columns for view {:?}", self.id);
        self.apply_column_widths();
    }

    fn apply_column_widths(&mut self) {
        let widths =
            distribute_column_widths(self.viewport_width, &self.column_weights, self.columns.len());
        for (column, width) in self.columns.iter_mut().zip(widths.iter()) {
            column.preferred_width = *width;
        }
        if let Some(grid) = self.grid.as_mut() {
            grid.column_widths = widths;
            grid.dirty = true;
        }
    }

    /// Queue one resize pass, unless one is queued already.
    fn schedule_resize(&mut self) {
        if self.resize_pending {
            return;
        }
        self.resize_pending = true;
        self.handle.invoke_later(|view| view.revalidate());
    }

    fn revalidate(&mut self) {
        self.resize_pending = false;
        self.layout_passes += 1;
        self.apply_column_widths();
        let rows = self.model.row_count();
        if let Some(grid) = self.grid.as_mut() {
            grid.clamp_offset(rows);
            grid.lead_moved = grid.selection.rows.lead().is_some();
        }
        trace!(
            "Resize pass {} of {:?}: preferred {:?}",
            self.layout_passes,
            self.id,
            self.preferred_viewport_size()
        );
    }
}

/// Thread safe handle of a [`TableView`]. All setters are queued.
pub struct TableHandle<T> {
    inner: UiHandle<TableView<T>>,
}

impl<T> Clone for TableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> TableHandle<T> {
    pub fn is_ui_thread(&self) -> bool {
        self.inner.is_ui_thread()
    }

    pub fn invoke_later(&self, task: impl FnOnce(&mut TableView<T>) + Send + 'static) {
        self.inner.invoke_later(task);
    }

    pub fn set_font(&self, font: Font) {
        self.invoke_later(move |view| view.set_font(font));
    }

    pub fn set_column_size_percentages(&self, weights: Vec<f64>) {
        self.invoke_later(move |view| view.set_column_size_percentages(weights));
    }

    pub fn set_header_visible(&self, visible: bool) {
        self.invoke_later(move |view| view.set_header_visible(visible));
    }

    pub fn set_maximum_visible_rows(&self, rows: usize) {
        self.invoke_later(move |view| view.set_maximum_visible_rows(rows));
    }

    pub fn set_vertical_size_policy(&self, policy: SizingPolicy) {
        self.invoke_later(move |view| view.set_vertical_size_policy(policy));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ratatui::crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::layout::Rect;

    use super::*;
    use crate::row_model::{ColumnRowModel, ColumnSpec};

    fn letter_model() -> ColumnRowModel<String> {
        ColumnRowModel::new(vec![
            ColumnSpec::text("Letter", |s: &String| s.clone()),
            ColumnSpec::new("Code", ValueKind::Integer, |s: &String| {
                s.chars().next().map(|c| c as i64)
            }),
            ColumnSpec::text("Lower", |s: &String| s.to_lowercase()),
        ])
    }

    fn letters(n: usize) -> Vec<String> {
        ('A'..='Z').take(n).map(|c| c.to_string()).collect()
    }

    fn view_with(n: usize) -> TableView<String> {
        let mut view = TableView::with_row_model(letter_model(), TableOptions::default());
        view.set_data(letters(n));
        view.dispatch_pending();
        view
    }

    fn recorder(view: &mut TableView<String>) -> Rc<RefCell<Vec<SelectionEvent<String>>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        view.add_selection_listener(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn unconfigured_view_shows_placeholder_schema() {
        let view: TableView<String> = TableView::new(TableOptions::default());
        assert_eq!(view.column_count(), 2);
        assert_eq!(view.row_count(), 0);
        assert_eq!(view.columns()[0].name.as_deref(), Some("Name"));
    }

    #[test]
    fn selection_event_resolves_records() {
        let mut view = view_with(5);
        let events = recorder(&mut view);

        view.set_row_selection_interval(1, 1);
        view.add_row_selection_interval(3, 3);

        let events = events.borrow();
        let last = events.last().unwrap();
        assert_eq!(last.source, view.id());
        assert_eq!(last.rows, vec![1, 3]);
        assert_eq!(last.records, vec!["B".to_string(), "D".to_string()]);
        assert_eq!(view.selected_records(), vec!["B".to_string(), "D".to_string()]);
    }

    #[test]
    fn adjusting_selection_fires_once_when_settled() {
        let mut view = view_with(5);
        let events = recorder(&mut view);

        view.set_value_is_adjusting(true);
        view.set_row_selection_interval(0, 0);
        view.set_row_selection_interval(0, 1);
        view.set_row_selection_interval(0, 2);
        assert!(events.borrow().is_empty());
        view.set_value_is_adjusting(false);

        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].rows, vec![0, 1, 2]);
    }

    #[test]
    fn mouse_drag_reports_after_release() {
        let mut view = view_with(8);
        let events = recorder(&mut view);
        if let Some(grid) = view.grid_mut() {
            grid.set_frame(Rect::new(0, 0, 30, 10), 1, 1);
        }
        let mouse = |kind, row| MouseEvent {
            kind,
            column: 2,
            row,
            modifiers: KeyModifiers::NONE,
        };

        assert!(view.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2)));
        assert!(view.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 3)));
        assert!(view.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 4)));
        assert!(events.borrow().is_empty());
        assert!(view.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 4)));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].rows, vec![1, 2, 3]);
        assert_eq!(events[0].records, vec!["B", "C", "D"]);
    }

    #[test]
    fn keys_move_the_selection() {
        let mut view = view_with(3);
        let events = recorder(&mut view);
        assert!(view.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        assert!(view.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)));
        assert_eq!(view.selected_rows(), vec![0, 1]);
        assert_eq!(events.borrow().len(), 2);
        assert!(!view.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)));
    }

    #[test]
    fn replacing_data_refreshes_rows_and_clears_selection() {
        let mut view = view_with(5);
        view.set_row_selection_interval(4, 4);
        let events = recorder(&mut view);

        view.set_data(letters(2));

        assert_eq!(view.row_count(), 2);
        assert!(view.selected_rows().is_empty());
        assert_eq!(events.borrow().len(), 1);
        assert!(events.borrow()[0].records.is_empty());
    }

    #[test]
    fn shared_data_is_installed_without_copy() {
        let mut view: TableView<String> = TableView::with_row_model(letter_model(), TableOptions::default());
        let records = Arc::new(letters(4));
        view.set_shared_data(records.clone(), false);
        assert_eq!(view.row_count(), 4);
        assert_eq!(Arc::strong_count(&records), 2);
        view.set_shared_data(records.clone(), true);
        assert_eq!(Arc::strong_count(&records), 1);
    }

    #[test]
    fn new_row_model_rebuilds_columns() {
        let mut view = view_with(4);
        view.set_viewport_width(900);
        view.set_column_selection_allowed(true);
        view.set_column_selection_interval(2, 2);
        assert_eq!(view.columns().len(), 3);

        view.set_row_model(ColumnRowModel::new(vec![ColumnSpec::text(
            "Only",
            |s: &String| s.repeat(2),
        )]));
        view.dispatch_pending();

        assert_eq!(view.column_count(), 1);
        assert_eq!(view.columns().len(), 1);
        assert_eq!(view.columns()[0].name.as_deref(), Some("Only"));
        assert_eq!(view.column_widths(), vec![900]);
        assert!(view.selected_columns().is_empty());
    }

    #[test]
    fn column_weights_apply_on_dispatch() {
        let mut view = view_with(2);
        view.set_viewport_width(1000);
        view.set_column_size_percentages(vec![0.5, 0.3]);
        assert_eq!(view.column_widths(), vec![333, 333, 333]);
        view.dispatch_pending();
        assert_eq!(view.column_widths(), vec![500, 300, 200]);
        assert_eq!(view.preferred_viewport_size().width, 1000);
    }

    #[test]
    fn sizing_policies() {
        let mut view = view_with(4);
        view.set_row_height(20);
        view.set_maximum_visible_rows(10);

        view.set_vertical_size_policy(SizingPolicy::FitsRows);
        assert_eq!(view.preferred_viewport_size().height, 80);
        view.set_data(letters(25));
        assert_eq!(view.preferred_viewport_size().height, 200);

        view.set_vertical_size_policy(SizingPolicy::Fixed);
        view.set_data(letters(3));
        assert_eq!(view.preferred_viewport_size().height, 200);

        view.set_vertical_size_policy(SizingPolicy::None);
        assert_eq!(view.preferred_viewport_size().height, 60);
    }

    #[test]
    fn set_font_is_idempotent() {
        let mut view = view_with(1);
        let font = Font::new("Iosevka", 20);
        view.set_font(font.clone());
        let once = (view.row_height(), view.header_height());
        view.set_font(font.clone());
        view.dispatch_pending();
        assert_eq!((view.row_height(), view.header_height()), once);
        assert_eq!(once, (16 + 4 + 4 + 1, 16 + 4 + 4));
        assert!(view.header_font().bold);
        assert_eq!(view.font(), &font);
    }

    #[test]
    fn resize_passes_are_coalesced() {
        let mut view = view_with(1);
        let before = view.layout_passes();
        view.set_font(Font::new("a", 10));
        view.set_maximum_visible_rows(3);
        view.set_vertical_size_policy(SizingPolicy::Fixed);
        view.dispatch_pending();
        assert_eq!(view.layout_passes(), before + 1);
    }

    #[test]
    fn header_visibility_is_deferred() {
        let mut view = view_with(1);
        assert!(view.is_header_visible());
        view.set_header_visible(false);
        assert!(view.is_header_visible());
        view.dispatch_pending();
        assert!(!view.is_header_visible());
    }

    #[test]
    fn handle_posts_from_other_threads() {
        let mut view = view_with(3);
        let handle = view.handle();
        std::thread::spawn(move || {
            assert!(!handle.is_ui_thread());
            handle.set_font(Font::new("remote", 15));
            handle.set_maximum_visible_rows(7);
        })
        .join()
        .unwrap();

        assert_eq!(view.font().family, "monospace");
        view.dispatch_pending();
        assert_eq!(view.font().family, "remote");
        assert_eq!(view.maximum_visible_rows(), 7);
    }

    #[test]
    fn rows_deleted_hint_shifts_selection() {
        let mut view = view_with(5);
        view.set_row_selection_interval(3, 4);
        let events = recorder(&mut view);

        view.set_data(letters(3));
        assert!(view.selected_rows().is_empty());

        view.set_row_selection_interval(2, 2);
        view.model_mut().fire_rows_deleted(0, 0);
        view.dispatch_pending();
        assert_eq!(view.selected_rows(), vec![1]);
        assert_eq!(events.borrow().len(), 3);
    }

    #[test]
    fn disposed_view_returns_defaults() {
        let mut view = view_with(3);
        view.set_row_selection_interval(0, 1);
        view.dispose();
        assert!(view.is_disposed());
        assert!(view.selected_rows().is_empty());
        assert_eq!(view.selected_row(), None);
        assert_eq!(view.selected_row_count(), 0);
        assert!(!view.is_row_selected(0));
        assert!(view.column_widths().is_empty());
        view.set_row_selection_interval(0, 2);
        assert!(view.selected_records().is_empty());
        assert!(!view.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
    }

    #[test]
    fn rows_inserted_hint_shifts_selection() {
        let mut view = view_with(6);
        view.set_row_selection_interval(1, 2);
        let events = recorder(&mut view);

        view.model_mut().fire_rows_inserted(0, 1);
        view.dispatch_pending();

        assert_eq!(view.selected_rows(), vec![3, 4]);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].records, vec!["D", "E"]);
    }

    #[test]
    fn selection_mode_change_clears_selection() {
        let mut view = view_with(5);
        view.set_row_selection_interval(0, 2);
        let events = recorder(&mut view);

        view.set_selection_mode(SelectionMode::Single);

        assert_eq!(view.selection_mode(), SelectionMode::Single);
        assert!(view.selected_rows().is_empty());
        assert_eq!(events.borrow().len(), 1);
        view.set_row_selection_interval(0, 3);
        assert_eq!(view.selected_rows(), vec![3]);
    }

    #[test]
    fn handle_posts_weights_and_header_from_other_threads() {
        let mut view = view_with(2);
        view.set_viewport_width(1000);
        let handle = view.handle();
        std::thread::spawn(move || {
            handle.set_column_size_percentages(vec![0.2]);
            handle.set_header_visible(false);
        })
        .join()
        .unwrap();

        assert_eq!(view.column_size_percentages(), &[] as &[f64]);
        assert!(view.is_header_visible());
        view.dispatch_pending();
        assert_eq!(view.column_size_percentages(), &[0.2]);
        assert_eq!(view.column_widths(), vec![200, 400, 400]);
        assert!(!view.is_header_visible());
    }

    #[test]
    fn removing_a_huge_interval_deselects_rows() {
        let mut view = view_with(5);
        view.set_row_selection_interval(1, 2);
        view.remove_row_selection_interval(0, usize::MAX);
        assert!(view.selected_rows().is_empty());
    }

    #[test]
    fn row_margin_adds_to_row_height() {
        let mut view = view_with(1);
        let base = view.row_height();
        view.set_row_margin(5);
        assert_eq!(view.row_height(), base + 4);
        assert_eq!(view.header_height(), base - 1);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut view = view_with(2);
        view.set_row_selection_interval(0, 5);
        assert!(view.selected_rows().is_empty());
    }
}
