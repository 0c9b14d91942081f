//! Remote folder listing.

use crate::api_client::NekowebClient;
use crate::error::NekowebResult;
use crate::types::{RemoteFileEntry, HTML_EXTENSION, PATHNAME_FIELD, READ_FOLDER};

/// Folder operations bound to a client.
pub struct FolderQuery<'a> {
    client: &'a NekowebClient,
}

impl<'a> FolderQuery<'a> {
    pub fn new(client: &'a NekowebClient) -> Self {
        Self { client }
    }

    /// `GET /files/readfolder?pathname=…`, in server order.
    pub async fn read_folder(&self, pathname: &str) -> NekowebResult<Vec<RemoteFileEntry>> {
        self.client
            .get_json(READ_FOLDER, &[(PATHNAME_FIELD, pathname)])
            .await
    }

    /// Names of the `.html` entries in `pathname`.
    pub async fn list_html(&self, pathname: &str) -> NekowebResult<Vec<String>> {
        let entries = self.read_folder(pathname).await?;
        Ok(filter_by_extension(&entries, HTML_EXTENSION))
    }
}

/// Names ending in `ext` (case-sensitive), order preserved.
pub fn filter_by_extension(entries: &[RemoteFileEntry], ext: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.name.ends_with(ext))
        .map(|e| e.name.clone())
        .collect()
}
