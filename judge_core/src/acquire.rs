use std::collections::HashSet;

use crate::cache::TimelineCache;
use crate::error::Result;
use crate::feed::TimelineSource;
use crate::model::Post;
use crate::sentiment::SentimentProvider;

pub const BATCH_SIZE: u32 = 200;
pub const BATCH_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    /// Posts requested per round trip.
    pub batch_size: u32,
    /// A batch of at most this many posts ends the pagination.
    pub batch_threshold: usize,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            batch_threshold: BATCH_THRESHOLD,
        }
    }
}

/// Retrieves the timeline of one identity, either from the cache or from the source.
///
/// Construction doesn't touch the cache or the network; [`TimelineAcquirer::load`] does the work
/// once and keeps the posts, later calls reuse them.
pub struct TimelineAcquirer<S, P> {
    identity: String,
    source: S,
    sentiment: P,
    cache: TimelineCache,
    options: AcquireOptions,
    posts: Option<Vec<Post>>,
}

impl<S, P> TimelineAcquirer<S, P>
where
    S: TimelineSource + Send,
    P: SentimentProvider,
{
    pub fn new(identity: impl Into<String>, source: S, sentiment: P, cache: TimelineCache) -> Self {
        Self {
            identity: identity.into(),
            source,
            sentiment,
            cache,
            options: AcquireOptions::default(),
            posts: None,
        }
    }

    pub fn with_options(mut self, options: AcquireOptions) -> Self {
        self.options = options;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The loaded timeline, newest first, or `None` before [`TimelineAcquirer::load`] succeeded.
    pub fn posts(&self) -> Option<&[Post]> {
        self.posts.as_deref()
    }

    /// Load the full timeline from a fresh cache file, or fetch it and rewrite the cache.
    pub async fn load(&mut self) -> Result<&[Post]> {
        if self.posts.is_none() {
            let cached = self.cache.load(&self.identity).await;
            let posts = match cached {
                Some(posts) => posts,
                None => {
                    let posts = self.fetch_all().await?;
                    if let Err(e) = self.cache.store(&self.identity, &posts).await {
                        tracing::warn!("Cannot write cache for {}: {}", self.identity, e);
                    }
                    posts
                }
            };
            self.posts = Some(posts);
        }
        Ok(self.posts.as_deref().unwrap_or_default())
    }

    /// Load the timeline and return it, reduced to retweets if `only_retweets` is set.
    /// The cache always holds the unfiltered timeline.
    pub async fn acquire(&mut self, only_retweets: bool) -> Result<Vec<Post>> {
        let posts = self.load().await?;
        if only_retweets {
            Ok(retweets(posts))
        } else {
            Ok(posts.to_vec())
        }
    }

    /// Page backward through the source until a batch comes back nearly empty.
    async fn fetch_all(&mut self) -> Result<Vec<Post>> {
        let AcquireOptions {
            batch_size,
            batch_threshold,
        } = self.options;
        let mut posts: Vec<Post> = Vec::new();
        let mut seen = HashSet::new();
        let mut max_id = None;
        let mut request_count = 0;

        loop {
            let batch = self.source.fetch_batch(batch_size, max_id).await?;
            request_count += 1;
            let batch_len = batch.len();
            tracing::debug!("Got {} posts for {} (request {})", batch_len, self.identity, request_count);

            // The upper bound is inclusive on the provider side, so the next request starts
            // strictly below the oldest post received.
            if let Some(last) = batch.last() {
                max_id = Some(last.id.saturating_sub(1));
            }
            for raw in batch {
                if !seen.insert(raw.id) {
                    continue;
                }
                let sentiment = self.sentiment.score(&raw.text);
                let post = raw.scored(sentiment);
                // Anything cached must load back
                match post.validate() {
                    Ok(()) => posts.push(post),
                    Err(e) => tracing::warn!("Dropping post of {}: {}", self.identity, e),
                }
            }

            if batch_len <= batch_threshold || max_id == Some(0) {
                break;
            }
        }

        tracing::info!(
            "Fetched {} posts for {} in {} requests",
            posts.len(),
            self.identity,
            request_count
        );
        Ok(posts)
    }
}

/// Keep only the retweets, in their original order.
pub fn retweets(posts: &[Post]) -> Vec<Post> {
    posts.iter().filter(|p| p.is_retweet()).cloned().collect()
}
