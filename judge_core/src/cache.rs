use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::Result;
use crate::model::Post;

pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// On-disk cache of fetched timelines, one JSON file per identity.
/// The file's modification time is the only freshness signal.
#[derive(Debug, Clone)]
pub struct TimelineCache {
    dir: PathBuf,
    ttl: Duration,
}

impl Default for TimelineCache {
    fn default() -> Self {
        Self::new(std::env::temp_dir(), CACHE_TTL)
    }
}

impl TimelineCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: dir.into(), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache file of `identity`, named by the MD5 digest of the identity.
    pub fn path(&self, identity: &str) -> PathBuf {
        let digest = md5::compute(identity.as_bytes());
        self.dir.join(format!("judge-posts-{:x}.json", digest))
    }

    pub fn is_fresh(&self, modified: SystemTime, now: SystemTime) -> bool {
        // A modification time in the future counts as just written.
        let age = now.duration_since(modified).unwrap_or_default();
        age <= self.ttl
    }

    /// Load the cached posts of `identity` if the cache file is fresh.
    /// Every failure is treated as a miss and only logged.
    pub async fn load(&self, identity: &str) -> Option<Vec<Post>> {
        let path = self.path(identity);
        match self.read(&path).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::info!("Unable to read the cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Overwrite the cache file of `identity`. The file is written next to the target and then
    /// renamed over it, so readers never observe a partial write.
    pub async fn store(&self, identity: &str, posts: &[Post]) -> Result<()> {
        let path = self.path(identity);
        let content = serde_json::to_vec(posts)?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp_path = path.with_file_name(tmp_name);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp_path, &content).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(e.into());
        }
        tracing::info!("Stored {} posts to cache file {}", posts.len(), path.display());
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Option<Vec<Post>>> {
        let modified = tokio::fs::metadata(path).await?.modified()?;
        let now = SystemTime::now();
        let age = now.duration_since(modified).unwrap_or_default().as_secs();
        if !self.is_fresh(modified, now) {
            tracing::debug!("Not using cache file {} - too old at {} seconds", path.display(), age);
            return Ok(None);
        }

        let content = tokio::fs::read(path).await?;
        let deserializer = &mut serde_json::Deserializer::from_slice(&content);
        let posts: Vec<Post> = serde_path_to_error::deserialize(deserializer)?;
        for post in posts.iter() {
            post.validate()?;
        }
        tracing::debug!(
            "Loaded {} posts from cache file {} ({} seconds old)",
            posts.len(),
            path.display(),
            age
        );
        Ok(Some(posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use chrono::{TimeZone, Utc};

    fn post(id: u64) -> Post {
        Post {
            id,
            text: format!("post {}", id),
            created_at: Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
            lang: Some("en".to_string()),
            source: "web".to_string(),
            user: User {
                id: 1,
                name: "Alice".to_string(),
                screen_name: "alice".to_string(),
                location: None,
                time_zone: Some("UTC".to_string()),
            },
            retweet_of: (id % 2 == 0).then_some(id + 100),
            polarity: 0.5,
            subjectivity: 0.25,
        }
    }

    fn set_age(path: &Path, age: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_path_is_stable_per_identity() {
        let cache = TimelineCache::new("/tmp/judge", CACHE_TTL);
        assert_eq!(cache.path("alice"), cache.path("alice"));
        assert_ne!(cache.path("alice"), cache.path("bob"));
        assert_eq!(
            cache.path("alice").file_name().unwrap(),
            "judge-posts-6384e2b2184bcbf58eccf10ca7a6563c.json"
        );
    }

    #[test]
    fn test_is_fresh() {
        let cache = TimelineCache::new("/tmp/judge", CACHE_TTL);
        let now = SystemTime::now();
        assert!(cache.is_fresh(now, now));
        assert!(cache.is_fresh(now - CACHE_TTL, now));
        assert!(!cache.is_fresh(now - CACHE_TTL - Duration::from_secs(1), now));
        assert!(cache.is_fresh(now + Duration::from_secs(60), now));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TimelineCache::new(dir.path(), CACHE_TTL);
        let posts = (1..=4).rev().map(post).collect::<Vec<_>>();

        cache.store("alice", &posts).await.unwrap();
        assert_eq!(cache.load("alice").await, Some(posts));
        assert_eq!(cache.load("bob").await, None);
        // No temporary file is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_stale_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TimelineCache::new(dir.path(), CACHE_TTL);
        cache.store("alice", &[post(1)]).await.unwrap();

        set_age(&cache.path("alice"), CACHE_TTL + Duration::from_secs(30));
        assert_eq!(cache.load("alice").await, None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TimelineCache::new(dir.path(), CACHE_TTL);

        std::fs::write(cache.path("alice"), b"[{\"id\": 1, \"text\": ").unwrap();
        assert_eq!(cache.load("alice").await, None);

        let mut value = serde_json::to_value(vec![post(1)]).unwrap();
        value[0].as_object_mut().unwrap().remove("user");
        std::fs::write(cache.path("alice"), value.to_string()).unwrap();
        assert_eq!(cache.load("alice").await, None);
    }
}
