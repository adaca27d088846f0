//! Temporary CSV files staged for upload
//!
//! A [`StagedCsv`] owns its file on disk: dropping it removes the file, so the
//! upload copy never outlives the publish call, whichever step fails.

use std::path::Path;

use tempfile::{Builder, TempPath};

use crate::error::PublishResult;
use crate::table::Table;
use crate::token::generate_random_token;

/// Length of the random part of a staged file name.
pub const STAGED_NAME_LEN: usize = 32;

/// A table serialized to `<dir>/<random>.csv`, deleted when dropped.
#[derive(Debug)]
pub struct StagedCsv {
    path: TempPath,
}

impl StagedCsv {
    /// Serialize `table` into a freshly named CSV file inside `dir`.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written
    pub fn write(table: &Table, dir: &Path) -> PublishResult<Self> {
        let name = generate_random_token(STAGED_NAME_LEN);
        let file = Builder::new()
            .prefix(&name)
            .suffix(".csv")
            .rand_bytes(0)
            .tempfile_in(dir)?;
        let path = file.into_temp_path();
        table.write_csv(&path)?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting failures instead of ignoring them.
    ///
    /// # Errors
    /// Returns error if the file cannot be removed
    pub fn remove(self) -> PublishResult<()> {
        self.path.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use tempfile::tempdir;

    fn table() -> Table {
        Table::from_columns(vec![Column::from_ints("n", vec![1, 2, 3])]).unwrap()
    }

    #[test]
    fn test_staged_file_name() {
        let dir = tempdir().unwrap();
        let staged = StagedCsv::write(&table(), dir.path()).unwrap();

        let file_name = staged.path().file_name().unwrap().to_str().unwrap();
        let stem = file_name.strip_suffix(".csv").unwrap();
        assert_eq!(stem.len(), STAGED_NAME_LEN);
        assert!(stem.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(staged.path().parent().unwrap(), dir.path());
    }

    #[test]
    fn test_staged_file_contents() {
        let dir = tempdir().unwrap();
        let staged = StagedCsv::write(&table(), dir.path()).unwrap();
        let contents = std::fs::read_to_string(staged.path()).unwrap();
        assert_eq!(contents, "n\n1\n2\n3\n");
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempdir().unwrap();
        let staged = StagedCsv::write(&table(), dir.path()).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = tempdir().unwrap();
        let staged = StagedCsv::write(&table(), dir.path()).unwrap();
        let path = staged.path().to_path_buf();
        staged.remove().unwrap();
        assert!(!path.exists());
    }
}
