use crate::focus::TaskStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML file persistence for the task store
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the store, starting empty when the file does not exist or is blank
    pub fn load(&self) -> Result<TaskStore> {
        if !self.file_path.exists() {
            return Ok(TaskStore::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(TaskStore::new());
        }
        let data: TaskStore = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), "Loaded {}", data);
        Ok(data)
    }

    /// Write the store via a temporary file and rename
    pub fn save(&self, data: &TaskStore) -> Result<()> {
        let content = toml::to_string_pretty(data).context("Failed to serialize tasks")?;
        let tmp = self.file_path.with_extension("toml.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.file_path)
            .with_context(|| format!("Failed to replace {}", self.file_path.display()))?;
        Ok(())
    }
}
