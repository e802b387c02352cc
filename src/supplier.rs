//! Data suppliers hand ordered records to a [`TableModel`](crate::model::TableModel).
//!
//! A supplier is never mutated in place. To change the data, build a new
//! supplier and install it; the model re-derives its row count from it.

use std::sync::Arc;

use crate::domain::DataGridError;

pub trait DataSupplier<T> {
    fn size(&self) -> usize;

    fn get(&self, index: usize) -> Result<&T, DataGridError>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Traverse the records in index order. Every call starts a fresh pass.
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new((0..self.size()).filter_map(move |idx| self.get(idx).ok()))
    }

    fn for_each(&self, visit: &mut dyn FnMut(usize, &T)) {
        for (idx, record) in self.iter().enumerate() {
            visit(idx, record);
        }
    }
}

/// Supplier backed by a shared vector.
#[derive(Debug)]
pub struct VecSupplier<T> {
    records: Arc<Vec<T>>,
}

impl<T> VecSupplier<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Share the records with the caller, no copy is made.
    pub fn shared(records: Arc<Vec<T>>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }
}

impl<T: Clone> VecSupplier<T> {
    /// Take a private snapshot of `records`.
    pub fn copied(records: &[T]) -> Self {
        Self::new(records.to_vec())
    }

    /// Either share `records` or detach a private copy of them.
    pub fn from_shared(records: Arc<Vec<T>>, copy: bool) -> Self {
        if copy {
            Self::copied(&records)
        } else {
            Self::shared(records)
        }
    }
}

impl<T> DataSupplier<T> for VecSupplier<T> {
    fn size(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> Result<&T, DataGridError> {
        self.records.get(index).ok_or(DataGridError::RowOutOfRange {
            index,
            size: self.records.len(),
        })
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.records.iter())
    }
}

/// Supplier without records, installed until real data is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySupplier;

impl<T> DataSupplier<T> for EmptySupplier {
    fn size(&self) -> usize {
        0
    }

    fn get(&self, index: usize) -> Result<&T, DataGridError> {
        Err(DataGridError::RowOutOfRange { index, size: 0 })
    }
}
