//! User actions.
//!
//! Each action maps 1:1 onto a service call and ends in exactly one
//! [`Notification`] for the front end to show. Every command is prefixed
//! with `nw_`.

use crate::error::NekowebError;
use crate::service::NekowebService;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A single human-readable outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: msg.into(),
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: msg.into(),
        }
    }

    pub fn is_info(&self) -> bool {
        self.level == NotificationLevel::Info
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<NekowebError> for Notification {
    fn from(err: NekowebError) -> Self {
        Self::error(err.user_message())
    }
}

fn selected(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ═══════════════════════════════════════════════════════════════════════
//  Credential
// ═══════════════════════════════════════════════════════════════════════

/// "Set credential". `None` means the prompt was cancelled.
pub async fn nw_set_token(svc: &NekowebService, token: Option<&str>) -> Notification {
    let Some(token) = token else {
        return Notification::warning("Authorization token unchanged.");
    };
    match svc.set_credential(token).await {
        Ok(_) => Notification::info("Authorization token has been updated."),
        Err(e) if e.is_missing_credential() => e.into(),
        Err(e) => Notification::warning(format!(
            "Authorization token has been updated, but the username could not be read: {}",
            e.message
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Site
// ═══════════════════════════════════════════════════════════════════════

/// "Show site title".
pub async fn nw_show_site_title(svc: &NekowebService) -> Notification {
    match svc.site_title().await {
        Ok(title) => Notification::info(title),
        Err(e) => e.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Files
// ═══════════════════════════════════════════════════════════════════════

/// First half of "list and download": the `.html` names to pick from.
pub async fn nw_list_html(svc: &NekowebService) -> Result<Vec<String>, Notification> {
    svc.list_html_files().await.map_err(Notification::from)
}

/// Second half of "list and download": fetch the picked file.
pub async fn nw_download_html(
    svc: &NekowebService,
    selection: Option<&str>,
    dest_dir: &Path,
) -> Notification {
    let Some(name) = selected(selection) else {
        return Notification::warning("No file selected");
    };
    match svc.download_site_file(name, dest_dir).await {
        Ok(receipt) => Notification::info(format!("Downloaded to {}", receipt.path.display())),
        Err(e) if e.is_missing_credential() => e.into(),
        Err(e) => Notification::error(format!("Error downloading file: {}", e.message)),
    }
}

/// "Pick and upload a file".
pub async fn nw_upload_file(
    svc: &NekowebService,
    path: Option<&Path>,
    remote_dir: &str,
) -> Notification {
    let Some(path) = path else {
        return Notification::warning("No file selected");
    };
    match svc.upload_file(path, remote_dir).await {
        Ok(_) => Notification::info("File uploaded successfully"),
        Err(e) if e.is_missing_credential() => e.into(),
        Err(e) => Notification::error(format!("Error uploading file: {}", e.message)),
    }
}
