use anyhow::Context;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use judge_auth::DEFAULT_CALLBACK_PORT;
use judge_core::cache::CACHE_TTL;

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Only needed the first time an identity is authorized.
    pub client_id: Option<String>,
    pub api_base: String,
    pub service: String,
    pub token_file: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub callback_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token_file = match var("JUDGE_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => dirs::home_dir().unwrap_or_default().join(".judge-tokens"),
        };
        let cache_dir = var("JUDGE_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);
        let cache_ttl = match var("JUDGE_CACHE_TTL") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("JUDGE_CACHE_TTL must be a number of seconds, got `{}`", secs))?,
            ),
            None => CACHE_TTL,
        };
        let callback_port = match var("JUDGE_CALLBACK_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("JUDGE_CALLBACK_PORT must be a port number, got `{}`", port))?,
            None => DEFAULT_CALLBACK_PORT,
        };

        Ok(Config {
            client_id: var("JUDGE_CLIENT_ID"),
            api_base: var("JUDGE_API_BASE").unwrap_or_else(|| timeline_client::REST_API.to_string()),
            service: var("JUDGE_SERVICE").unwrap_or_else(|| judge_twitter::SERVICE.to_string()),
            token_file,
            cache_dir,
            cache_ttl,
            callback_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.client_id, None);
        assert_eq!(config.api_base, "https://api.twitter.com/1.1");
        assert_eq!(config.service, "twitter");
        assert_eq!(config.cache_dir, env::temp_dir());
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.callback_port, 8000);
        assert!(config.token_file.ends_with(".judge-tokens"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("JUDGE_CLIENT_ID", "abc"),
            ("JUDGE_TOKEN_FILE", "/var/lib/judge/tokens.json"),
            ("JUDGE_CACHE_DIR", "/var/cache/judge"),
            ("JUDGE_CACHE_TTL", " 60 "),
            ("JUDGE_CALLBACK_PORT", "8123"),
            ("JUDGE_API_BASE", ""),
        ])
        .unwrap();
        assert_eq!(config.client_id.as_deref(), Some("abc"));
        assert_eq!(config.token_file, PathBuf::from("/var/lib/judge/tokens.json"));
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/judge"));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.callback_port, 8123);
        assert_eq!(config.api_base, "https://api.twitter.com/1.1");
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("JUDGE_CACHE_TTL", "an hour")]).is_err());
        assert!(config(&[("JUDGE_CALLBACK_PORT", "70000")]).is_err());
    }
}
