//! Site metadata query.

use crate::api_client::NekowebClient;
use crate::error::NekowebResult;
use crate::types::{SiteInfo, SITE_INFO};

/// Site-info operations bound to a client.
pub struct SiteQuery<'a> {
    client: &'a NekowebClient,
}

impl<'a> SiteQuery<'a> {
    pub fn new(client: &'a NekowebClient) -> Self {
        Self { client }
    }

    /// `GET /site/info`.
    pub async fn info(&self) -> NekowebResult<SiteInfo> {
        self.client.get_json(SITE_INFO, &[]).await
    }

    /// Site title, for display.
    pub async fn title(&self) -> NekowebResult<String> {
        Ok(self.info().await?.title)
    }

    /// Owning username, for deriving the credential.
    pub async fn username(&self) -> NekowebResult<String> {
        Ok(self.info().await?.username)
    }
}
