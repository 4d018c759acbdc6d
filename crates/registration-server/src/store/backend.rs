//! Persistence backends for the registration list.

use super::Registrations;
use crate::error::ServerError;
use crate::record::Registration;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Pretty-printed JSON array on disk, rewritten wholesale on every save.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the list from disk.
    ///
    /// A missing, unreadable or malformed file yields an empty list.
    pub async fn load(&self) -> Registrations {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No registrations file at {:?}, starting fresh",
                    self.path
                );
                return Registrations::new();
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}, starting fresh", self.path, e);
                return Registrations::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("{:?} does not hold a list, starting fresh", self.path);
                return Registrations::new();
            }
            Err(e) => {
                warn!("{:?} is not valid JSON ({}), starting fresh", self.path, e);
                return Registrations::new();
            }
        };

        let mut registrations = Registrations::new();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Registration>(item) {
                Ok(record) => registrations.append(record),
                Err(e) => warn!(index, "Skipping unreadable registration: {}", e),
            }
        }

        info!(
            "Loaded {} registrations from {:?}",
            registrations.len(),
            self.path
        );
        registrations
    }

    /// Write the full list, replacing the previous file.
    pub async fn save(&self, registrations: &Registrations) -> Result<(), ServerError> {
        let data = serde_json::to_vec_pretty(registrations)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(
            "Saved {} registrations ({} bytes) to {:?}",
            registrations.len(),
            data.len(),
            self.path
        );
        Ok(())
    }
}

/// No persistence; the in-memory list is all there is.
pub struct MemoryBackend;

impl MemoryBackend {
    /// "Load" returns an empty list.
    pub async fn load(&self) -> Registrations {
        debug!("Memory backend: returning empty list");
        Registrations::new()
    }

    /// "Save" does nothing.
    pub async fn save(&self, _registrations: &Registrations) -> Result<(), ServerError> {
        debug!("Memory backend: save is a no-op");
        Ok(())
    }
}

/// Storage backend selected from configuration.
pub enum Backend {
    /// JSON file on disk
    File(JsonFileBackend),
    /// In-memory only (no persistence)
    Memory(MemoryBackend),
}

impl Backend {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Backend::File(JsonFileBackend::new(path))
    }

    pub fn memory() -> Self {
        Backend::Memory(MemoryBackend)
    }

    pub async fn load(&self) -> Registrations {
        match self {
            Backend::File(b) => b.load().await,
            Backend::Memory(b) => b.load().await,
        }
    }

    pub async fn save(&self, registrations: &Registrations) -> Result<(), ServerError> {
        match self {
            Backend::File(b) => b.save(registrations).await,
            Backend::Memory(b) => b.save(registrations).await,
        }
    }
}
