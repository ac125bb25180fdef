//! JSON data file holding every form, field and response.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use form_core::{ApiState, InMemoryApi};

/// A data file on disk.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state. A missing file is an empty state.
    pub fn load(&self) -> Result<ApiState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file not found, starting empty");
                return Ok(ApiState::default());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("read data file: {}", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("parse data file: {}", self.path.display()))
    }

    pub fn open(&self) -> Result<InMemoryApi> {
        self.load().map(InMemoryApi::from_state)
    }

    /// Write the state through a temp file and rename, so a crash never
    /// leaves a half-written data file.
    pub fn save(&self, state: &ApiState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state).context("serialize data file")?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path)
            .with_context(|| format!("create: {}", temp_path.display()))?;
        file.write_all(&bytes)
            .with_context(|| format!("write: {}", temp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("sync: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "replace {} with {}",
                self.path.display(),
                temp_path.display()
            )
        })?;

        debug!(
            path = %self.path.display(),
            forms = state.schemas.len(),
            responses = state.responses.len(),
            "data file saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_core::FormsApi;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("forms.json"));
        assert_eq!(store.load().unwrap(), ApiState::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested").join("forms.json"));
        let mut api = store.open().unwrap();
        api.create_form("Survey", "").unwrap();

        store.save(api.state()).unwrap();
        assert_eq!(&store.load().unwrap(), api.state());
        assert!(!dir.path().join("nested").join("forms.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.json");
        fs::write(&path, "{ not json").unwrap();
        let error = Store::new(&path).load().unwrap_err();
        assert!(error.to_string().contains("parse data file"));
    }
}
