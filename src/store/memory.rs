use std::{cell::RefCell, collections::HashMap};

use super::{decode_rows, encode_rows, Dataset, Record, TableStore};
use crate::errors::ServiceError;

/// Keeps each table as encoded CSV bytes in memory. Goes through the same
/// codec as [`super::CsvStore`], so what round-trips here round-trips on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<Dataset, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `dataset` with raw CSV text, header included.
    pub fn with_table(self, dataset: Dataset, csv: &str) -> Self {
        self.tables.borrow_mut().insert(dataset, csv.as_bytes().to_vec());
        self
    }

    /// Current raw CSV text of `dataset`, if it was ever saved or seeded.
    pub fn raw(&self, dataset: Dataset) -> Option<String> {
        self.tables
            .borrow()
            .get(&dataset)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl TableStore for MemoryStore {
    fn load_rows<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        match self.tables.borrow().get(&R::DATASET) {
            Some(bytes) => decode_rows(bytes.as_slice()),
            None => Ok(Vec::new()),
        }
    }

    fn save_rows<R: Record>(&self, rows: &[R]) -> Result<(), ServiceError> {
        let bytes = encode_rows(R::DATASET, rows)?;
        self.tables.borrow_mut().insert(R::DATASET, bytes);
        Ok(())
    }
}
