//! High-level Nekoweb service – the facade consumed by the command layer.
//!
//! Owns the configuration, the credential store and the diagnostics sink,
//! and builds a short-lived [`NekowebClient`] per action from whatever
//! credential is stored at that moment.

use crate::api_client::NekowebClient;
use crate::credentials::{Credential, CredentialStore};
use crate::diagnostics::Diagnostics;
use crate::download;
use crate::error::{NekowebError, NekowebResult};
use crate::folders::FolderQuery;
use crate::site::SiteQuery;
use crate::types::*;
use crate::upload;
use std::path::Path;
use std::sync::Arc;

pub struct NekowebService {
    config: NekowebConfig,
    store: Arc<dyn CredentialStore>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl NekowebService {
    pub fn new(
        config: NekowebConfig,
        store: Arc<dyn CredentialStore>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            config,
            store,
            diagnostics,
        }
    }

    pub fn config(&self) -> &NekowebConfig {
        &self.config
    }

    pub fn credential(&self) -> NekowebResult<Credential> {
        self.store.load()
    }

    /// Client bound to the currently stored credential.
    pub fn client(&self) -> NekowebResult<NekowebClient> {
        let credential = self.store.load()?;
        NekowebClient::new(self.config.clone(), credential, self.diagnostics.clone())
    }

    // ─── Credential ──────────────────────────────────────────────────

    /// Store `token`, then derive and store the username from site info.
    ///
    /// The token is kept even if the username lookup fails; the username is
    /// cleared in that case and the lookup error is returned.
    pub async fn set_credential(&self, token: &str) -> NekowebResult<Credential> {
        let mut credential = Credential::new(token.trim());
        self.store.save(&credential)?;

        let client =
            NekowebClient::new(self.config.clone(), credential.clone(), self.diagnostics.clone())?;
        match SiteQuery::new(&client).username().await {
            Ok(username) => {
                credential.username = Some(username);
                self.store.save(&credential)?;
                self.diagnostics
                    .info(&format!("Credential updated for {:?}", credential.username));
                Ok(credential)
            }
            Err(e) => {
                self.diagnostics
                    .warn(&format!("Token stored but username lookup failed: {}", e));
                Err(e)
            }
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────

    pub async fn site_info(&self) -> NekowebResult<SiteInfo> {
        let client = self.client()?;
        SiteQuery::new(&client).info().await
    }

    pub async fn site_title(&self) -> NekowebResult<String> {
        let client = self.client()?;
        SiteQuery::new(&client).title().await
    }

    /// `.html` files in the remote root.
    pub async fn list_html_files(&self) -> NekowebResult<Vec<String>> {
        let client = self.client()?;
        FolderQuery::new(&client).list_html(ROOT_PATH).await
    }

    pub async fn list_folder(&self, pathname: &str) -> NekowebResult<Vec<RemoteFileEntry>> {
        let client = self.client()?;
        FolderQuery::new(&client).read_folder(pathname).await
    }

    // ─── Transfers ───────────────────────────────────────────────────

    /// Download `name` from the public site into `dest_dir`.
    pub async fn download_site_file(
        &self,
        name: &str,
        dest_dir: &Path,
    ) -> NekowebResult<DownloadReceipt> {
        let client = self.client()?;
        let username = client.credential().username.clone().unwrap_or_default();
        let url = download::site_file_url(&self.config, &username, name)?;

        let local_name = Path::new(name)
            .file_name()
            .ok_or_else(|| NekowebError::io(format!("Not a file name: {}", name)))?;
        download::download(&client, &url, &dest_dir.join(local_name)).await
    }

    pub async fn upload_file(
        &self,
        local_path: &Path,
        remote_dir: &str,
    ) -> NekowebResult<UploadReceipt> {
        let client = self.client()?;
        upload::upload_to(&client, local_path, remote_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::diagnostics::MemoryDiagnostics;

    fn service(credential: Credential) -> NekowebService {
        NekowebService::new(
            NekowebConfig::default(),
            Arc::new(MemoryCredentialStore::new(credential)),
            Arc::new(MemoryDiagnostics::new()),
        )
    }

    #[tokio::test]
    async fn set_empty_credential_fails_without_network() {
        let svc = service(Credential::new("old").with_username("alice"));
        let err = svc.set_credential("  ").await.unwrap_err();
        assert!(err.is_missing_credential());
        assert_eq!(svc.credential().unwrap(), Credential::default());
    }

    #[tokio::test]
    async fn download_requires_username() {
        let svc = service(Credential::new("tok"));
        let dir = std::env::temp_dir();
        let err = svc.download_site_file("a.html", &dir).await.unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[tokio::test]
    async fn queries_require_token() {
        let svc = service(Credential::default());
        assert!(svc.site_title().await.unwrap_err().is_missing_credential());
        assert!(svc.list_html_files().await.unwrap_err().is_missing_credential());
    }
}
