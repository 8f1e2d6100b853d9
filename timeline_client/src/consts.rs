pub const REST_API: &str = "https://api.twitter.com/1.1";
pub const USER_AGENT: &str = concat!("judge/", env!("CARGO_PKG_VERSION"));

/// The provider never returns more than this many posts per timeline request.
pub const TIMELINE_MAX_COUNT: u32 = 200;
