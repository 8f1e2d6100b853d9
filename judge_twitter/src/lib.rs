mod source;
mod util;

pub use source::AuthorizedSource;

pub const SERVICE: &str = "twitter";
