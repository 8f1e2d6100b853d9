use phf::phf_map;

use crate::error::{Error, Result};

/// Where and how to ask a service for an implicit grant.
#[derive(Debug)]
pub struct ServiceEndpoint {
    pub authorize_url: &'static str,
    pub scope: &'static str,
}

pub static SERVICES: phf::Map<&'static str, ServiceEndpoint> = phf_map! {
    "twitter" => ServiceEndpoint {
        authorize_url: "https://twitter.com/i/oauth2/authorize",
        scope: "tweet.read users.read",
    },
    "adn" => ServiceEndpoint {
        authorize_url: "https://account.app.net/oauth/authenticate",
        scope: "stream,public_messages",
    },
};

pub fn lookup(service: &str) -> Result<&'static ServiceEndpoint> {
    SERVICES
        .get(service)
        .ok_or_else(|| Error::UnknownService(service.to_string()))
}
