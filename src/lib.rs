//! A generic, model driven data table for ratatui.
//!
//! Records come from a [`DataSupplier`], a [`RowModel`] turns them into
//! cells, a [`TableModel`] binds both into a grid and the [`TableView`]
//! widget takes care of sizing, selection and rendering.
//!
//! ```no_run
//! use datagrid::{ColumnRowModel, ColumnSpec, TableOptions, TableView, ValueKind};
//!
//! let row_model = ColumnRowModel::new(vec![
//!     ColumnSpec::text("Name", |p: &(String, i64)| p.0.clone()),
//!     ColumnSpec::new("Age", ValueKind::Integer, |p: &(String, i64)| p.1),
//! ]);
//! let mut table = TableView::with_row_model(row_model, TableOptions::default());
//! table.set_data(vec![("Ada".to_string(), 36)]);
//! table.add_selection_listener(|event| println!("selected {:?}", event.records));
//! ```

pub mod domain;
pub mod font;
pub mod grid;
pub mod layout;
pub mod model;
pub mod queue;
pub mod row_model;
pub mod selection;
pub mod supplier;
pub mod ui;
pub mod view;

pub use domain::{Alignment, CellGeometry, DataGridError, SelectionMode, Size, SizingPolicy, TableOptions};
pub use font::Font;
pub use model::{TableModel, TableModelEvent};
pub use row_model::{CellValue, ColumnRowModel, ColumnSpec, PlaceholderRowModel, RowModel, ValueKind};
pub use supplier::{DataSupplier, EmptySupplier, VecSupplier};
pub use view::{SelectionEvent, TableHandle, TableView, ViewColumn, ViewId};
