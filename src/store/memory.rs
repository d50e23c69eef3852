use anyhow::Result;
use parking_lot::RwLock;

use crate::model::Credential;
use crate::store::traits::{CredentialSource, CredentialStore};

/// Credential store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialSource for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.credential.read().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, credential: Credential) -> Result<()> {
        *self.credential.write() = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credential.write() = None;
        Ok(())
    }
}
