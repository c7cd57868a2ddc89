// file: src/utils/validation.rs
// description: input and output path checks run before any pass starts
// reference: input validation patterns

use crate::error::{MigrationError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_input_file(path: &Path) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| MigrationError::file(path, e))?;

        if !metadata.is_file() {
            return Err(MigrationError::Validation(format!(
                "Input is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// The parent directory must exist; the file itself may not.
    pub fn validate_output_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(MigrationError::Validation(
                "Output path is empty".to_string(),
            ));
        }

        if path.is_dir() {
            return Err(MigrationError::Validation(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(MigrationError::Validation(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Rejects runs where two outputs (or an output and the input) share a path.
    pub fn validate_distinct_paths(paths: &[&Path]) -> Result<()> {
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                if same_file(a, b) {
                    return Err(MigrationError::Validation(format!(
                        "Path used twice: {}",
                        a.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
