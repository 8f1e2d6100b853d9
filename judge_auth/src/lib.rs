mod error;
pub mod grant;
pub mod service;
mod store;

use async_trait::async_trait;

use std::path::PathBuf;

use judge_core::CredentialProvider;

pub use crate::error::{Error, Result};
pub use crate::store::TokenStore;

pub const DEFAULT_CALLBACK_PORT: u16 = 8000;

/// Tokens from a [`TokenStore`], granted interactively the first time an identity is used.
#[derive(Debug, Clone)]
pub struct TokenCredentials {
    store_path: PathBuf,
    client_id: Option<String>,
    callback_port: u16,
}

impl TokenCredentials {
    pub fn new(store_path: impl Into<PathBuf>, client_id: Option<String>, callback_port: u16) -> Self {
        Self {
            store_path: store_path.into(),
            client_id,
            callback_port,
        }
    }

    async fn get_or_grant(&self, identity: &str, service: &str) -> Result<String> {
        let endpoint = service::lookup(service)?;

        let mut store = TokenStore::load(&self.store_path).await?;
        if let Some(token) = store.get(identity, service) {
            tracing::debug!("Using stored token for {}", TokenStore::key(identity, service));
            return Ok(token.to_string());
        }

        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| Error::MissingClientId(service.to_string()))?;
        let url = grant::authorization_url(endpoint, client_id, self.callback_port)?;
        let token = grant::obtain_token(&url, self.callback_port).await?;

        store.set(identity, service, &token);
        store.save().await?;
        tracing::info!("Stored new token for {}", TokenStore::key(identity, service));
        Ok(token)
    }
}

#[async_trait]
impl CredentialProvider for TokenCredentials {
    async fn token(&self, identity: &str, service: &str) -> judge_core::Result<String> {
        Ok(self.get_or_grant(identity, service).await?)
    }
}
