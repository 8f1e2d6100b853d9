use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

// Optional fields below use `deserialize_with` so that a cached record must spell them out,
// `null` is accepted but an absent key is rejected.

/// Author snapshot embedded in a post at fetch time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub location: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub time_zone: Option<String>,
}

/// A post as the feed provider returns it, before sentiment scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub lang: Option<String>,
    pub source: String,
    pub user: User,
    pub retweet_of: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub lang: Option<String>,
    pub source: String,
    pub user: User,
    /// Id of the retweeted post, if this post is a retweet.
    #[serde(deserialize_with = "Option::deserialize")]
    pub retweet_of: Option<u64>,
    pub polarity: f64,
    pub subjectivity: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Sentiment {
    /// In `[-1.0, 1.0]`.
    pub polarity: f64,
    /// In `[0.0, 1.0]`.
    pub subjectivity: f64,
}

/// The numeric post fields that can be averaged per author.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Polarity,
    Subjectivity,
}

// MARK: Helpers

impl RawPost {
    pub fn scored(self, sentiment: Sentiment) -> Post {
        Post {
            id: self.id,
            text: self.text,
            created_at: self.created_at,
            lang: self.lang,
            source: self.source,
            user: self.user,
            retweet_of: self.retweet_of,
            polarity: sentiment.polarity,
            subjectivity: sentiment.subjectivity,
        }
    }
}

impl Post {
    pub fn is_retweet(&self) -> bool {
        self.retweet_of.is_some()
    }

    pub fn sentiment(&self) -> Sentiment {
        Sentiment {
            polarity: self.polarity,
            subjectivity: self.subjectivity,
        }
    }

    /// Check the fields serde alone can't bound. Fetched posts failing this are never cached.
    pub fn validate(&self) -> Result<()> {
        if !self.sentiment().is_valid() {
            return Err(Error::InvalidPost(format!(
                "post {} has out of range sentiment ({}, {})",
                self.id, self.polarity, self.subjectivity
            )));
        }
        if self.user.screen_name.is_empty() {
            return Err(Error::InvalidPost(format!("post {} has an empty screen name", self.id)));
        }
        Ok(())
    }
}

impl Sentiment {
    pub fn is_valid(&self) -> bool {
        (-1.0..=1.0).contains(&self.polarity) && (0.0..=1.0).contains(&self.subjectivity)
    }
}

impl ScoreField {
    pub fn of(&self, post: &Post) -> f64 {
        match self {
            ScoreField::Polarity => post.polarity,
            ScoreField::Subjectivity => post.subjectivity,
        }
    }
}

impl Display for ScoreField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreField::Polarity => write!(f, "polarity"),
            ScoreField::Subjectivity => write!(f, "subjectivity"),
        }
    }
}

impl FromStr for ScoreField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "polarity" => Ok(ScoreField::Polarity),
            "subjectivity" => Ok(ScoreField::Subjectivity),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}
