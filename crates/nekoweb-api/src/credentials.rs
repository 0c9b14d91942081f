//! Credential model and the store seam.
//!
//! Every authenticated operation goes through [`Credential::require_token`].

use crate::error::{NekowebError, NekowebResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

/// Token/username pair authorising API calls.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.masked_token())
            .field("username", &self.username)
            .finish()
    }
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// The token, or `MissingCredential` if none is configured.
    pub fn require_token(&self) -> NekowebResult<&str> {
        if self.has_token() {
            Ok(self.token.trim())
        } else {
            Err(NekowebError::missing_credential())
        }
    }

    /// Show a masked version of the token for logging.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.is_empty() {
            String::new()
        } else if chars.len() <= 8 {
            "****".into()
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}…{}", head, tail)
        }
    }
}

/// Where the credential lives between actions.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> NekowebResult<Credential>;
    fn save(&self, credential: &Credential) -> NekowebResult<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Credential>,
}

impl MemoryCredentialStore {
    pub fn new(credential: Credential) -> Self {
        Self {
            inner: RwLock::new(credential),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> NekowebResult<Credential> {
        self.inner
            .read()
            .map(|c| c.clone())
            .map_err(|_| NekowebError::internal("Credential store lock poisoned"))
    }

    fn save(&self, credential: &Credential) -> NekowebResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| NekowebError::internal("Credential store lock poisoned"))?;
        *guard = credential.clone();
        Ok(())
    }
}
