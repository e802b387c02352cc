//! Grid contract of a table: a [`RowModel`] applied to the records of a
//! [`DataSupplier`].

use std::fmt;

use tracing::{debug, trace};

use crate::domain::{Alignment, DataGridError};
use crate::row_model::{CellValue, PlaceholderRowModel, RowModel, ValueKind};
use crate::supplier::{DataSupplier, EmptySupplier};

/// Change notifications raised by a [`TableModel`].
///
/// Row ranges are inclusive. `DataChanged` can always stand in for any of
/// the finer grained variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableModelEvent {
    DataChanged,
    StructureChanged,
    CellUpdated { row: usize, column: usize },
    RowsUpdated { first: usize, last: usize },
    RowsInserted { first: usize, last: usize },
    RowsDeleted { first: usize, last: usize },
}

type ModelListener = Box<dyn FnMut(&TableModelEvent)>;

pub struct TableModel<T> {
    row_model: Box<dyn RowModel<T>>,
    supplier: Box<dyn DataSupplier<T>>,
    listeners: Vec<ModelListener>,
    pending: Vec<TableModelEvent>,
}

impl<T> fmt::Debug for TableModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableModel")
            .field("rows", &self.row_count())
            .field("columns", &self.column_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: 'static> TableModel<T> {
    pub fn new(
        row_model: impl RowModel<T> + 'static,
        supplier: impl DataSupplier<T> + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(row_model), Box::new(supplier))
    }

    pub fn from_boxed(row_model: Box<dyn RowModel<T>>, supplier: Box<dyn DataSupplier<T>>) -> Self {
        Self {
            row_model,
            supplier,
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Model with the two column placeholder schema and no records.
    pub fn placeholder() -> Self {
        Self::new(PlaceholderRowModel, EmptySupplier)
    }

    pub fn with_row_model(row_model: impl RowModel<T> + 'static) -> Self {
        Self::new(row_model, EmptySupplier)
    }
}

impl<T> TableModel<T> {
    pub fn row_count(&self) -> usize {
        self.supplier.size()
    }

    pub fn column_count(&self) -> usize {
        self.row_model.column_count()
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.row_model.column_name(column)
    }

    pub fn column_kind(&self, column: usize) -> ValueKind {
        self.row_model.value_kind(column)
    }

    pub fn column_alignment(&self, column: usize) -> Alignment {
        self.row_model.alignment(column)
    }

    pub fn is_cell_editable(&self, row: usize, column: usize) -> bool {
        row < self.row_count() && self.row_model.is_editable(column)
    }

    pub fn record(&self, row: usize) -> Result<&T, DataGridError> {
        self.supplier.get(row)
    }

    pub fn try_value_at(&self, row: usize, column: usize) -> Result<CellValue, DataGridError> {
        let record = self.supplier.get(row)?;
        Ok(self.row_model.value(record, column))
    }

    /// Value of the cell at `row`/`column`.
    ///
    /// # Panics
    /// If either index is outside the grid.
    pub fn value_at(&self, row: usize, column: usize) -> CellValue {
        match self.try_value_at(row, column) {
            Ok(value) => value,
            Err(e) => panic!("invalid cell ({row}, {column}): {e}"),
        }
    }

    pub fn supplier(&self) -> &dyn DataSupplier<T> {
        self.supplier.as_ref()
    }

    pub fn row_model(&self) -> &dyn RowModel<T> {
        self.row_model.as_ref()
    }

    /// Swap the records in one step. Listeners see a single `DataChanged`.
    pub fn set_data_supplier(&mut self, supplier: Box<dyn DataSupplier<T>>) {
        debug!(
            "Replacing data supplier: {} -> {} rows",
            self.supplier.size(),
            supplier.size()
        );
        self.supplier = supplier;
        self.fire(TableModelEvent::DataChanged);
    }

    pub fn set_row_model(&mut self, row_model: Box<dyn RowModel<T>>) {
        debug!(
            "Replacing row model: {} -> {} columns",
            self.row_model.column_count(),
            row_model.column_count()
        );
        self.row_model = row_model;
        self.fire(TableModelEvent::StructureChanged);
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&TableModelEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn fire_data_changed(&mut self) {
        self.fire(TableModelEvent::DataChanged);
    }

    pub fn fire_structure_changed(&mut self) {
        self.fire(TableModelEvent::StructureChanged);
    }

    pub fn fire_cell_updated(&mut self, row: usize, column: usize) {
        self.fire(TableModelEvent::CellUpdated { row, column });
    }

    pub fn fire_rows_updated(&mut self, first: usize, last: usize) {
        self.fire(TableModelEvent::RowsUpdated { first, last });
    }

    pub fn fire_rows_inserted(&mut self, first: usize, last: usize) {
        self.fire(TableModelEvent::RowsInserted { first, last });
    }

    pub fn fire_rows_deleted(&mut self, first: usize, last: usize) {
        self.fire(TableModelEvent::RowsDeleted { first, last });
    }

    fn fire(&mut self, event: TableModelEvent) {
        trace!("Model event {event:?} to {} listeners", self.listeners.len());
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
        self.pending.push(event);
    }

    /// Events raised since the last call, oldest first.
    pub(crate) fn take_events(&mut self) -> Vec<TableModelEvent> {
        std::mem::take(&mut self.pending)
    }
}
