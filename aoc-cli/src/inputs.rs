//! Read-only store of puzzle inputs on local disk
//!
//! Layout: `{dir}/{year}/day{DD}.txt`

use crate::error::InputError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InputStore {
    dir: PathBuf,
}

impl InputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path where the input for year/day is expected
    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        self.dir
            .join(year.to_string())
            .join(format!("day{:02}.txt", day))
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.path(year, day).is_file()
    }

    /// Read the input for year/day
    pub fn read(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.path(year, day);
        match std::fs::read_to_string(&path) {
            Ok(input) => {
                tracing::trace!(path = %path.display(), bytes = input.len(), "read input");
                Ok(input)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(InputError::NotFound(path)),
            Err(source) => Err(InputError::Io { path, source }),
        }
    }
}
