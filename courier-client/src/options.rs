//! HTTP transport options shared by all clients

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Overrides applied to the underlying HTTP client
///
/// # Example
/// ```
/// use courier_client::HttpOptions;
/// use std::time::Duration;
///
/// let client = HttpOptions {
///     connect_timeout: Some(Duration::from_secs(5)),
///     timeout: Some(Duration::from_secs(30)),
///     headers: vec![("X-Trace".to_string(), "abc".to_string())],
/// }
/// .build_client()
/// .unwrap();
/// # let _ = client;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Time allowed to establish a connection
    pub connect_timeout: Option<Duration>,
    /// Total time allowed for a request, body included
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl HttpOptions {
    /// Builds a [`Client`] with these options applied
    pub fn build_client(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidRequest(format!("header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidRequest(format!("header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_build() {
        assert!(HttpOptions::default().build_client().is_ok());
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let options = HttpOptions {
            headers: vec![("bad header".to_string(), "value".to_string())],
            ..Default::default()
        };
        let err = options.build_client().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let options = HttpOptions {
            headers: vec![("X-Ok".to_string(), "line\nbreak".to_string())],
            ..Default::default()
        };
        assert!(options.build_client().is_err());
    }
}
