#![allow(dead_code)]

pub mod mock_server;

use nekoweb_api::{
    Credential, MemoryCredentialStore, MemoryDiagnostics, NekowebClient, NekowebConfig,
    NekowebService,
};
use std::sync::Arc;
use tempfile::TempDir;

pub const GOOD_TOKEN: &str = "good-token-0123456789";

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn client_for(base: &str, credential: Credential) -> (NekowebClient, Arc<MemoryDiagnostics>) {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let client = NekowebClient::new(NekowebConfig::with_base(base), credential, diagnostics.clone())
        .expect("client should build");
    (client, diagnostics)
}

pub fn service_for(
    base: &str,
    credential: Credential,
) -> (NekowebService, Arc<MemoryCredentialStore>, Arc<MemoryDiagnostics>) {
    let store = Arc::new(MemoryCredentialStore::new(credential));
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let service = NekowebService::new(
        NekowebConfig::with_base(base),
        store.clone(),
        diagnostics.clone(),
    );
    (service, store, diagnostics)
}
