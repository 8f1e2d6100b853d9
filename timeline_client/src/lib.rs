mod consts;
mod error;
mod result;
mod util;

use reqwest::{header, Client, Response, Url};

pub use consts::{REST_API, TIMELINE_MAX_COUNT};
pub use result::*;
pub use util::provider_date_format;

pub use crate::error::Error;
use crate::error::Result;

use consts::USER_AGENT;
use judge_util::build_params;

#[derive(Debug, Clone)]
pub struct TimelineClient {
    client: reqwest::Client,
    api_base: String,
}

impl TimelineClient {
    /// Create a client authorized with a bearer `access_token`, talking to the REST API at `api_base`.
    pub fn new(access_token: &str, api_base: &str) -> Result<TimelineClient> {
        let mut authorization =
            header::HeaderValue::from_str(&format!("Bearer {}", access_token)).map_err(|_| Error::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(TimelineClient {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch up to `count` of the newest posts in the home timeline, optionally only those with
    /// an id less than or equal to `max_id`. Posts come back newest first.
    pub async fn home_timeline(&self, count: u32, max_id: Option<u64>) -> Result<Vec<Tweet>> {
        if count == 0 || count > TIMELINE_MAX_COUNT {
            return Err(Error::InvalidCount(count));
        }
        let params = build_params! {
            required count,
            optional max_id,
            required tweet_mode => "extended",
        };
        self.rest_get("/statuses/home_timeline.json", &params).await
    }
}

impl TimelineClient {
    async fn rest_get<R>(&self, path: &str, params: &[(String, String)]) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = Url::parse_with_params(&format!("{}{}", self.api_base, path), params)?;
        tracing::debug!("GET {}", url);
        let response: Response = self.client.get(url).send().await?;

        let status_error = response.error_for_status_ref().err();
        let content = response.text().await?;
        let name = path.strip_prefix('/').unwrap_or(path).replace(['/', '.'], "_");
        log(&name, &content).await?;
        if let Some(status_error) = status_error {
            return Err(status_error.into());
        }

        serde_json::from_str(&content).map_err(|e| e.into())
    }
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S%3f");
        let filepath = PathBuf::from(dir).join(format!("timeline_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
