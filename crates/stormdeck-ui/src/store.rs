//! Persistence for the selected-city list.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stormdeck_core::StorageError;
use stormdeck_weather::SelectedCity;

/// Where the selected-city list lives between runs.
pub trait CityStore: Send + Sync {
    /// `Ok(None)` when nothing has ever been saved.
    fn load(&self) -> Result<Option<Vec<SelectedCity>>, StorageError>;

    fn save(&self, cities: &[SelectedCity]) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCities {
    selected_cities: Vec<SelectedCity>,
}

/// JSON file holding `{ "selectedCities": [...] }`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_failed(&self, e: impl std::fmt::Display) -> StorageError {
        StorageError::WriteFailed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl CityStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<SelectedCity>>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let stored: StoredCities = serde_json::from_str(&contents)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(
            "Loaded {} selected cities from {}",
            stored.selected_cities.len(),
            self.path.display()
        );
        Ok(Some(stored.selected_cities))
    }

    /// Writes to a sibling temp file, then renames over the target.
    fn save(&self, cities: &[SelectedCity]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        let json = serde_json::to_string_pretty(&StoredCities {
            selected_cities: cities.to_vec(),
        })
        .map_err(|e| self.write_failed(e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.write_failed(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_failed(e))?;

        tracing::info!("Saved {} selected cities", cities.len());
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    cities: Mutex<Option<Vec<SelectedCity>>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cities(cities: Vec<SelectedCity>) -> Self {
        Self {
            cities: Mutex::new(Some(cities)),
            saves: Mutex::new(0),
        }
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl CityStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<SelectedCity>>, StorageError> {
        Ok(self.cities.lock().clone())
    }

    fn save(&self, cities: &[SelectedCity]) -> Result<(), StorageError> {
        *self.cities.lock() = Some(cities.to_vec());
        *self.saves.lock() += 1;
        Ok(())
    }
}
