pub mod acquire;
pub mod cache;
pub mod error;
pub mod feed;
pub mod model;
pub mod sentiment;
pub mod stats;

pub use acquire::{AcquireOptions, TimelineAcquirer};
pub use cache::TimelineCache;
pub use error::*;
pub use feed::{CredentialProvider, TimelineSource};
pub use model::{Post, RawPost, ScoreField, Sentiment, User};
pub use sentiment::{LexiconSentiment, SentimentProvider};
