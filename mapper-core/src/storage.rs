use log::debug;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{MapperError, Result};
use crate::models::UuidMappings;

/// Default file name for the mappings, relative to the working directory
pub const DEFAULT_MAPPINGS_FILE: &str = "uuid_mappings.json";

/// Handles saving and loading mappings from a single JSON file
#[derive(Debug, Clone)]
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads mappings from the JSON file
    ///
    /// A missing file yields empty mappings and is not created. A file that
    /// exists but does not hold a string-to-string object is reported as
    /// corrupt and left untouched.
    pub fn load(&self) -> Result<UuidMappings> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No mappings file at {:?}, starting empty", self.file_path);
                return Ok(UuidMappings::new());
            }
            Err(source) => {
                return Err(MapperError::Persistence {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        let mappings: UuidMappings =
            serde_json::from_str(&content).map_err(|source| MapperError::CorruptStore {
                path: self.file_path.clone(),
                source,
            })?;

        debug!(
            "Loaded {} mappings from {:?}",
            mappings.len(),
            self.file_path
        );
        Ok(mappings)
    }

    /// Saves mappings to the JSON file, replacing its contents
    ///
    /// The new content goes to a temporary file next to the target which is
    /// then renamed over it, so a failed save leaves the old file intact.
    pub fn save(&self, mappings: &UuidMappings) -> Result<()> {
        self.write(mappings).map_err(|source| MapperError::Persistence {
            path: self.file_path.clone(),
            source,
        })?;

        debug!("Saved {} mappings to {:?}", mappings.len(), self.file_path);
        Ok(())
    }

    fn write(&self, mappings: &UuidMappings) -> std::io::Result<()> {
        let parent = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Create parent directories if they don't exist
        fs::create_dir_all(parent)?;

        let mut json = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
        mappings.serialize(&mut serializer)?;
        json.push(b'\n');

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.file_path).map_err(|e| e.error)?;
        Ok(())
    }
}
