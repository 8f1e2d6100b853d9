use judge_core::{RawPost, User};

use timeline_client as client;

pub(crate) fn user(user: &client::User) -> User {
    User {
        id: user.id,
        name: user.name.clone(),
        screen_name: user.screen_name.clone(),
        location: user.location.clone(),
        time_zone: user.time_zone.clone(),
    }
}

pub(crate) fn raw_post(tweet: &client::Tweet) -> RawPost {
    RawPost {
        id: tweet.id,
        text: tweet.full_text.clone(),
        created_at: tweet.created_at,
        lang: tweet.lang.clone(),
        source: tweet.source_name().to_string(),
        user: user(&tweet.user),
        retweet_of: tweet.retweeted_status.as_ref().map(|t| t.id),
    }
}
