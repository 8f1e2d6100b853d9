use async_trait::async_trait;

use judge_core::{CredentialProvider, RawPost, Result, TimelineSource};
use timeline_client::TimelineClient;

use crate::{util, SERVICE};

/// Home timeline of an identity, connecting on demand.
/// The token is requested and the client built on the first fetch only, so a timeline served
/// from the cache never asks for credentials.
pub struct AuthorizedSource<C> {
    credentials: C,
    identity: String,
    service: String,
    api_base: String,
    client: Option<TimelineClient>,
}

impl<C> AuthorizedSource<C>
where
    C: CredentialProvider + Send + Sync,
{
    pub fn new(credentials: C, identity: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            credentials,
            identity: identity.into(),
            service: SERVICE.to_string(),
            api_base: api_base.into(),
            client: None,
        }
    }

    /// Ask the credentials for another service's token than the default one.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    async fn client(&mut self) -> Result<&TimelineClient> {
        if self.client.is_none() {
            let token = self.credentials.token(&self.identity, &self.service).await?;
            let client = TimelineClient::new(&token, &self.api_base).map_err(anyhow::Error::from)?;
            tracing::info!("Connected to {} as {}", self.api_base, self.identity);
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| judge_core::Error::NotLoggedIn(self.identity.clone()))
    }
}

#[async_trait]
impl<C> TimelineSource for AuthorizedSource<C>
where
    C: CredentialProvider + Send + Sync,
{
    async fn fetch_batch(&mut self, count: u32, max_id: Option<u64>) -> Result<Vec<RawPost>> {
        let client = self.client().await?;
        let tweets = client
            .home_timeline(count, max_id)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(tweets.iter().map(util::raw_post).collect())
    }
}
