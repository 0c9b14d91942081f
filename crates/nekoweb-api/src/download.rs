//! Streamed download of published site files.
//!
//! Bytes go straight from the response body into the sink chunk by chunk;
//! the payload is never held in memory as a whole.

use crate::api_client::NekowebClient;
use crate::error::{NekowebError, NekowebErrorCode, NekowebResult};
use crate::types::{DownloadReceipt, NekowebConfig};
use futures::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Characters escaped in a site path segment. `/` is kept as a separator.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Public URL of `name` on `username`'s site.
pub fn site_file_url(config: &NekowebConfig, username: &str, name: &str) -> NekowebResult<String> {
    if username.trim().is_empty() {
        return Err(NekowebError::new(
            NekowebErrorCode::MissingCredential,
            "Username is not set. Set the authorization token again to derive it.",
        ));
    }
    let base = config
        .site_url_pattern
        .replace("{username}", username.trim());
    let path = utf8_percent_encode(name.trim_start_matches('/'), PATH_SEGMENT).to_string();
    let url = format!("{}/{}", base.trim_end_matches('/'), path);
    url::Url::parse(&url)?;
    Ok(url)
}

/// Stream `url` into `sink`, flush it, and return the byte count.
///
/// A failing sink aborts the transfer with `IoError`.
pub async fn download_to_writer<W>(client: &NekowebClient, url: &str, sink: &mut W) -> NekowebResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let resp = client.open_stream(url).await?;
    pipe(resp, sink).await
}

/// Stream `url` into a new file at `local_path`.
///
/// The parent directory must exist. The file is only created once the
/// server has answered with a success status, and a partial file is
/// removed if the transfer fails midway.
pub async fn download(
    client: &NekowebClient,
    url: &str,
    local_path: &Path,
) -> NekowebResult<DownloadReceipt> {
    let resp = client.open_stream(url).await?;

    let mut file = tokio::fs::File::create(local_path).await.map_err(|e| {
        NekowebError::io(format!("Cannot create {}: {}", local_path.display(), e))
    })?;

    match pipe(resp, &mut file).await {
        Ok(bytes) => {
            client
                .diagnostics()
                .info(&format!("Downloaded {} ({} bytes) to {}", url, bytes, local_path.display()));
            Ok(DownloadReceipt {
                url: url.to_string(),
                path: local_path.to_path_buf(),
                bytes,
            })
        }
        Err(e) => {
            drop(file);
            let diagnostics = client.diagnostics();
            if let Err(rm) = tokio::fs::remove_file(local_path).await {
                diagnostics.warn(&format!(
                    "Could not remove partial file {}: {}",
                    local_path.display(),
                    rm
                ));
            }
            diagnostics.error(&format!("Error downloading file: {}", e.message));
            Err(e)
        }
    }
}

async fn pipe<W>(resp: reqwest::Response, sink: &mut W) -> NekowebResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut stream = resp.bytes_stream();
    let mut total: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| NekowebError::network(format!("Download interrupted: {}", e)))?;
        sink.write_all(&chunk)
            .await
            .map_err(|e| NekowebError::io(format!("Write failed: {}", e)))?;
        total += chunk.len() as u64;
    }

    sink.flush()
        .await
        .map_err(|e| NekowebError::io(format!("Flush failed: {}", e)))?;
    Ok(total)
}
