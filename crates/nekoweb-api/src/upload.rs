//! Multipart upload of a local file.
//!
//! The file part is streamed from disk (`ReaderStream` wrapped in a
//! `reqwest::Body`), so large files are never loaded into memory.

use crate::api_client::NekowebClient;
use crate::error::{NekowebError, NekowebResult};
use crate::types::{UploadReceipt, FILES_FIELD, PATHNAME_FIELD, ROOT_PATH, UPLOAD_FILE};
use reqwest::multipart;
use std::path::Path;
use tokio_util::io::ReaderStream;

/// Upload `local_path` into the remote root directory.
pub async fn upload(client: &NekowebClient, local_path: &Path) -> NekowebResult<UploadReceipt> {
    upload_to(client, local_path, ROOT_PATH).await
}

/// Upload `local_path` into `remote_dir`.
///
/// Fails with `MissingCredential` before touching disk or network when no
/// token is configured.
pub async fn upload_to(
    client: &NekowebClient,
    local_path: &Path,
    remote_dir: &str,
) -> NekowebResult<UploadReceipt> {
    client.credential().require_token()?;

    let file_name = local_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NekowebError::io(format!("Not a file path: {}", local_path.display())))?
        .to_string();

    let file = tokio::fs::File::open(local_path).await.map_err(|e| {
        NekowebError::io(format!("Cannot open {}: {}", local_path.display(), e))
    })?;
    let metadata = file.metadata().await.map_err(|e| {
        NekowebError::io(format!("Cannot read {}: {}", local_path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(NekowebError::io(format!(
            "Not a regular file: {}",
            local_path.display()
        )));
    }
    let bytes = metadata.len();
    let mime = mime_guess::from_path(local_path).first_or_octet_stream();

    let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
    let part = multipart::Part::stream_with_length(body, bytes)
        .file_name(file_name.clone())
        .mime_str(mime.essence_str())
        .map_err(|e| NekowebError::internal(format!("Invalid MIME type {}: {}", mime, e)))?;

    let form = multipart::Form::new()
        .text(PATHNAME_FIELD, remote_dir.to_string())
        .part(FILES_FIELD, part);

    let diagnostics = client.diagnostics();
    match client.post_multipart(UPLOAD_FILE, form).await {
        Ok(response) => {
            diagnostics.info(&format!("Upload response: {}", response));
            Ok(UploadReceipt {
                file_name,
                remote_dir: remote_dir.to_string(),
                bytes,
                response,
            })
        }
        Err(e) => {
            diagnostics.error(&format!("Error uploading file: {}", e.message));
            Err(e)
        }
    }
}
