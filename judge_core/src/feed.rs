// The collaborator interfaces the acquisition engine is built on.
// Concrete implementations live in the adapter crates, tests substitute their own.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::RawPost;

/// A source of timeline posts, paged by post id from newest to oldest.
#[async_trait]
pub trait TimelineSource {
    /// Fetch up to `count` of the newest posts whose id is at most `max_id`, newest first.
    /// `max_id = None` means no upper bound.
    /// Every call is a single round trip, failures are returned as they are and never retried.
    async fn fetch_batch(&mut self, count: u32, max_id: Option<u64>) -> Result<Vec<RawPost>>;
}

/// Supplies bearer tokens for an identity on a service.
#[async_trait]
pub trait CredentialProvider {
    /// Get the token of `identity` on `service`, obtaining and storing it first if needed.
    /// An unsupported `service` is a configuration error.
    async fn token(&self, identity: &str, service: &str) -> Result<String>;
}
