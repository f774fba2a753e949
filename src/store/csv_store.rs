use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};

use strum::IntoEnumIterator;
use tracing::{debug, info};

use super::{decode_rows, encode_header, encode_rows, Dataset, Record, TableStore};
use crate::errors::ServiceError;

/// Stores each dataset as `<root>/<dataset file name>`.
#[derive(Clone, Debug)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.root.join(dataset.file_name())
    }

    /// Creates the data directory and a header-only file for every dataset
    /// that has none yet. Existing files are left alone.
    pub fn init(&self) -> Result<Vec<Dataset>, ServiceError> {
        fs::create_dir_all(&self.root)?;
        let mut created = Vec::new();
        for dataset in Dataset::iter() {
            let path = self.path_for(dataset);
            if path.exists() {
                continue;
            }
            fs::write(&path, encode_header(dataset)?)?;
            info!(dataset = %dataset, path = %path.display(), "Created empty table");
            created.push(dataset);
        }
        Ok(created)
    }
}

impl TableStore for CsvStore {
    fn load_rows<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        let dataset = R::DATASET;
        let path = self.path_for(dataset);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(%dataset, path = %path.display(), "Table file missing; treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let rows = decode_rows(BufReader::new(file))?;
        debug!(%dataset, rows = rows.len(), "Loaded table");
        Ok(rows)
    }

    fn save_rows<R: Record>(&self, rows: &[R]) -> Result<(), ServiceError> {
        let dataset = R::DATASET;
        let path = self.path_for(dataset);
        let bytes = encode_rows(dataset, rows)?;
        fs::write(&path, bytes)?;
        debug!(%dataset, rows = rows.len(), path = %path.display(), "Saved table");
        Ok(())
    }
}
