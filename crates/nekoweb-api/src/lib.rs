//! # nekoweb-api: Nekoweb Site-Hosting Client
//!
//! Thin client for the Nekoweb REST API:
//!
//! - **Site**: site metadata (title, owning username)
//! - **Folders**: list a remote directory, filter entries by extension
//! - **Downloads**: stream a published site file to local storage
//! - **Uploads**: multipart upload of a local file into a remote directory
//!
//! Architecture:
//! - `types`: configuration, endpoint constants, wire models
//! - `error`: structured error type shared by every operation
//! - `credentials`: token/username pair and the store seam
//! - `diagnostics`: injectable logging capability
//! - `api_client`: authenticated HTTP wrapper
//! - `site` / `folders`: read queries built on the client
//! - `download` / `upload`: streamed transfers
//! - `service`: facade owning config, store and diagnostics
//! - `commands`: user actions mapped to notifications

pub mod types;
pub mod error;
pub mod credentials;
pub mod diagnostics;
pub mod api_client;
pub mod site;
pub mod folders;
pub mod download;
pub mod upload;
pub mod service;
pub mod commands;

// Re-exports
pub use api_client::NekowebClient;
pub use commands::{Notification, NotificationLevel};
pub use credentials::{Credential, CredentialStore, MemoryCredentialStore};
pub use diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use error::{NekowebError, NekowebErrorCode, NekowebResult};
pub use service::NekowebService;
pub use types::*;
