use std::io;
use std::path::PathBuf;

use derive_setters::Setters;
use thiserror::Error;

use crate::font::Font;

#[derive(Debug, Error)]
pub enum DataGridError {
    #[error("row index {index} out of range for {size} rows")]
    RowOutOfRange { index: usize, size: usize },
    #[error("failed to load resource {path:?}")]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid path {0}")]
    InvalidPath(String),
    #[error("resource {0} contains no usable entries")]
    EmptyResource(String),
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

/// Horizontal placement of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Leading,
    Center,
    Trailing,
}

impl From<Alignment> for ratatui::layout::Alignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Leading => ratatui::layout::Alignment::Left,
            Alignment::Center => ratatui::layout::Alignment::Center,
            Alignment::Trailing => ratatui::layout::Alignment::Right,
        }
    }
}

/// How the preferred viewport height of a table is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingPolicy {
    /// Use the natural height of the content.
    #[default]
    None,
    /// Grow with the row count up to the maximum number of visible rows.
    FitsRows,
    /// Always reserve room for the maximum number of visible rows.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    Single,
    SingleInterval,
    #[default]
    MultipleInterval,
}

/// Pixel size of one terminal cell. Used to map the pixel based sizing of the
/// table onto terminal rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for CellGeometry {
    fn default() -> Self {
        CellGeometry {
            width: 9,
            height: 18,
        }
    }
}

impl CellGeometry {
    pub fn columns_for(&self, pixels: u32) -> u16 {
        (pixels / self.width.max(1)).min(u16::MAX as u32) as u16
    }

    pub fn lines_for(&self, pixels: u32) -> u16 {
        let lines = pixels.div_ceil(self.height.max(1)).max(1);
        lines.min(u16::MAX as u32) as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Construction time configuration of a [`TableView`](crate::view::TableView).
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TableOptions {
    pub selection_mode: SelectionMode,
    pub column_weights: Vec<f64>,
    pub max_visible_rows: usize,
    pub sizing_policy: SizingPolicy,
    pub font: Font,
    pub hide_header: bool,
    pub row_margin: u32,
    pub cell_geometry: CellGeometry,
}

pub const DEFAULT_MAX_VISIBLE_ROWS: usize = 10;
pub const DEFAULT_ROW_MARGIN: u32 = 1;

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            selection_mode: SelectionMode::default(),
            column_weights: Vec::new(),
            max_visible_rows: DEFAULT_MAX_VISIBLE_ROWS,
            sizing_policy: SizingPolicy::default(),
            font: Font::default(),
            hide_header: false,
            row_margin: DEFAULT_ROW_MARGIN,
            cell_geometry: CellGeometry::default(),
        }
    }
}
