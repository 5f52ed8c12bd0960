//! Thin JSON-over-HTTP wrapper shared by the `Http*` gateways.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ConsoleError;

/// `{ "error": ... }` body the server sends with every failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client bound to one API server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    /// Send and decode a JSON body, mapping error statuses to
    /// [`ConsoleError::Api`].
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ConsoleError> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Send and discard the body.
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ConsoleError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn check(response: Response) -> Result<Response, ConsoleError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        Err(ConsoleError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_with_one_slash() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/submissions"), "http://localhost:3000/api/submissions");
        assert_eq!(client.url("health"), "http://localhost:3000/health");
    }

    #[test]
    fn api_errors_display_server_message_verbatim() {
        let err = ConsoleError::Api {
            status: 401,
            message: "Invalid login credentials".into(),
        };
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
