use anyhow::{Context, Result};
use log::warn;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Credential;
use crate::store::traits::{CredentialSource, CredentialStore, CREDENTIAL_KEY};

/// Key-value JSON file holding the session credential across restarts.
///
/// The file is read once when the store is opened and written through on
/// every change. Keys other than [`CREDENTIAL_KEY`] are left untouched.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl FileCredentialStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable credential file {}: {:#}", path.display(), e);
                Map::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create credential directory {}", parent.display())
                })?;
            }
        }

        let body = serde_json::to_vec_pretty(entries).context("Failed to encode credential file")?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, body)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let raw = fs::read_to_string(path).context("Failed to read credential file")?;
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    serde_json::from_str(&raw).context("Credential file is not a JSON object")
}

impl CredentialSource for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.entries
            .read()
            .get(CREDENTIAL_KEY)
            .and_then(Value::as_str)
            .map(Credential::new)
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, credential: Credential) -> Result<()> {
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        updated.insert(
            CREDENTIAL_KEY.to_string(),
            Value::String(credential.as_str().to_string()),
        );

        // Only swap the in-memory copy once the file is written
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(CREDENTIAL_KEY) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(CREDENTIAL_KEY);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
