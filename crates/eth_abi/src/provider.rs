use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ABIError;

/// An Ethereum JSON-RPC endpoint.
///
/// Only the endpoint is modelled; transport is left to the caller. Serialized with a
/// `kind` tag, e.g. `{"kind":"http","url":"https://rpc.example.org"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provider {
    Http { url: String },
    Websocket { url: String },
}

fn parse_endpoint(url: &str) -> Result<Url, ABIError> {
    let parsed = Url::parse(url).map_err(|e| ABIError::ValidationError {
        message: format!("Invalid provider url '{}': {}", url, e),
    })?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ABIError::ValidationError {
            message: format!("Provider url '{}' has no host", url),
        });
    }

    Ok(parsed)
}

fn scheme_error(url: &str, expected: &str) -> ABIError {
    ABIError::ValidationError {
        message: format!("Provider url '{}' must use {}", url, expected),
    }
}

impl Provider {
    pub fn http(url: &str) -> Result<Self, ABIError> {
        match parse_endpoint(url)?.scheme() {
            "http" | "https" => Ok(Provider::Http {
                url: url.to_string(),
            }),
            _ => Err(scheme_error(url, "http or https")),
        }
    }

    pub fn websocket(url: &str) -> Result<Self, ABIError> {
        match parse_endpoint(url)?.scheme() {
            "ws" | "wss" => Ok(Provider::Websocket {
                url: url.to_string(),
            }),
            _ => Err(scheme_error(url, "ws or wss")),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Provider::Http { url } | Provider::Websocket { url } => url,
        }
    }
}

impl FromStr for Provider {
    type Err = ABIError;

    /// Picks the provider kind from the url scheme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_endpoint(s)?.scheme() {
            "http" | "https" => Provider::http(s),
            "ws" | "wss" => Provider::websocket(s),
            _ => Err(scheme_error(s, "http, https, ws or wss")),
        }
    }
}
