use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::util::provider_date_format;

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    // `id` loses precision in some JSON encoders, the string form is authoritative.
    #[serde(rename = "id_str")]
    #[serde_as(as = "DisplayFromStr")]
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(with = "provider_date_format")]
    pub created_at: DateTime<Utc>,
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Tweet {
    #[serde(rename = "id_str")]
    #[serde_as(as = "DisplayFromStr")]
    pub id: u64,
    #[serde(with = "provider_date_format")]
    pub created_at: DateTime<Utc>,
    // Compatibility mode responses only carry the truncated `text`.
    #[serde(alias = "text")]
    pub full_text: String,
    #[serde(default)]
    pub lang: Option<String>,
    pub source: String,
    pub user: User,
    #[serde(default)]
    pub retweeted_status: Option<Box<Tweet>>,
}

// MARK: Helpers

impl Tweet {
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    /// The client name without the anchor markup the provider wraps it in.
    pub fn source_name(&self) -> &str {
        let source = self.source.as_str();
        match (source.find('>'), source.rfind("</a>")) {
            (Some(start), Some(end)) if start < end => &source[start + 1..end],
            _ => source,
        }
    }
}
