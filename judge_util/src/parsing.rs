use std::collections::HashMap;
use thiserror::Error;

use url::Url;

#[derive(Debug, Clone, Error)]
pub enum ParsingError {
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Invalid key-value list: {0}")]
    InvalidKeyVal(String),
    #[error("Invalid percent encoding: {0}")]
    InvalidEncoding(String),
    #[error("Missing key `{key}` in {input}")]
    MissingKey { key: String, input: String },
}

type Result<T> = std::result::Result<T, ParsingError>;

pub fn parse_query_str(query_str: &str) -> Result<HashMap<String, String>> {
    parse_kv_list(query_str, '&')
}

/// Take a single value out of the query part of a request target like `/?a=1&b=2`.
/// Only the path and query are required, the target doesn't need to be an absolute URL.
pub fn query_param(target: &str, key: &str) -> Result<String> {
    let url = Url::parse("http://localhost")?.join(target)?;
    let query = url.query().unwrap_or_default();
    let mut params = parse_query_str(query)?;
    params.remove(key).ok_or_else(|| ParsingError::MissingKey {
        key: key.to_string(),
        input: target.to_string(),
    })
}

/// Parse a list of key-value pairs separated by `sep`, percent-decoding the values.
fn parse_kv_list(s: &str, sep: char) -> Result<HashMap<String, String>> {
    let mut results = HashMap::new();
    for param in s.split(sep) {
        if param.contains('=') {
            let mut parts = param.splitn(2, '=');
            let key = parts.next().ok_or(ParsingError::InvalidKeyVal(param.to_string()))?;
            let value = parts.next().ok_or(ParsingError::InvalidKeyVal(param.to_string()))?;
            let value = urlencoding::decode(value.trim()).map_err(|_| ParsingError::InvalidEncoding(param.to_string()))?;
            results.insert(key.trim().to_string(), value.into_owned());
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_str() {
        let params = parse_query_str("access_token=abc%2Fdef&token_type=bearer&flag").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["access_token"], "abc/def");
        assert_eq!(params["token_type"], "bearer");
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("/?access_token=t0k3n&scope=read", "access_token").unwrap(), "t0k3n");
        assert!(matches!(
            query_param("/?error=denied", "access_token"),
            Err(ParsingError::MissingKey { .. })
        ));
        assert!(matches!(query_param("/", "access_token"), Err(ParsingError::MissingKey { .. })));
    }
}
