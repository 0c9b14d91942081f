//! Shared types for the Nekoweb integration.
//!
//! Covers connection configuration, endpoint constants and the wire models
//! returned by the site and file endpoints.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════
//  Endpoints
// ═══════════════════════════════════════════════════════════════════════

/// Default API base; every endpoint path below is appended to it.
pub const DEFAULT_API_BASE: &str = "https://nekoweb.org/api";
/// Public URL of a user's site. `{username}` is substituted.
pub const DEFAULT_SITE_URL_PATTERN: &str = "https://{username}.nekoweb.org";

pub const SITE_INFO: &str = "/site/info";
pub const READ_FOLDER: &str = "/files/readfolder";
pub const UPLOAD_FILE: &str = "/files/upload";

/// Remote root directory.
pub const ROOT_PATH: &str = "/";
pub const HTML_EXTENSION: &str = ".html";

/// Multipart field carrying the target directory.
pub const PATHNAME_FIELD: &str = "pathname";
/// Multipart field carrying the file content.
pub const FILES_FIELD: &str = "files";

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

/// Connection settings for a Nekoweb account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NekowebConfig {
    /// API base URL.  Default: `https://nekoweb.org/api`.
    pub api_base_url: String,
    /// Public site URL pattern.  Default: `https://{username}.nekoweb.org`.
    pub site_url_pattern: String,
    /// Bound on establishing the TCP/TLS connection, in seconds.  Default:
    /// none.  Never applied to reading or sending a body, so long transfers
    /// run as long as bytes keep flowing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_sec: Option<u64>,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for NekowebConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.into(),
            site_url_pattern: DEFAULT_SITE_URL_PATTERN.into(),
            connect_timeout_sec: None,
            user_agent: format!("nekoweb-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NekowebConfig {
    /// Config pointing both the API and the public site at `base`.
    ///
    /// Used to aim the client at a mock server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api_base_url: format!("{}/api", base),
            site_url_pattern: format!("{}/sites/{{username}}", base),
            ..Self::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Wire models
// ═══════════════════════════════════════════════════════════════════════

/// Response of `GET /site/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub title: String,
    pub username: String,
    /// Anything else the server sends (views, followers, dates…).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of `GET /files/readfolder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    pub name: String,
    #[serde(default, rename = "isDir", skip_serializing_if = "Option::is_none")]
    pub is_dir: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemoteFileEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: None,
            size: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Outcome of a completed download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReceipt {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_name: String,
    pub remote_dir: String,
    pub bytes: u64,
    /// Raw server response (JSON when parseable, otherwise a string).
    pub response: serde_json::Value,
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
