use crate::model::Credential;
use anyhow::Result;

/// Key the session credential is stored under
pub const CREDENTIAL_KEY: &str = "token";

/// Read side of the credential store.
///
/// This is the only capability handed to the request gateway, so nothing on
/// the request path can change the session.
pub trait CredentialSource: Send + Sync {
    /// The stored credential, or `None` when unauthenticated
    fn get(&self) -> Option<Credential>;
}

/// Write side of the credential store, owned by the session controller.
pub trait CredentialStore: CredentialSource {
    /// Store `credential`, replacing any previous one
    fn set(&self, credential: Credential) -> Result<()>;
    /// Remove the stored credential
    fn clear(&self) -> Result<()>;
}
