use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, instrument};

use crate::errors::errors::ErrorResponse;

/// Failure talking to the registry API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status
    Server { status: u16, message: String },
    Transport(String),
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Server { message, .. } => write!(f, "{}", message),
            ApiError::Transport(reason) => write!(f, "Request failed: {}", reason),
            ApiError::Decode(reason) => write!(f, "Unexpected response: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Calls the editor makes against a collection route
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EditorApi: Send + Sync {
    async fn list(&self, route: &str) -> Result<Vec<Value>, ApiError>;
    async fn create(&self, route: &str, body: Map<String, Value>) -> Result<Value, ApiError>;
    async fn update(&self, route: &str, id: i64, body: Map<String, Value>)
    -> Result<Value, ApiError>;
    async fn delete(&self, route: &str, id: i64) -> Result<Value, ApiError>;
}

/// `EditorApi` over HTTP
#[derive(Clone)]
pub struct HttpEditorApi {
    client: Client,
    base_url: String,
}

impl HttpEditorApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}{}/{}", self.base_url, route, id),
            None => format!("{}{}", self.base_url, route),
        }
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        debug!(method = %method, url = %url, "Calling registry API");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Success bodies are returned as JSON; failures carry the server's message when it
    /// sent one, otherwise the status description
    async fn decode(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
        };
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl EditorApi for HttpEditorApi {
    #[instrument(skip(self))]
    async fn list(&self, route: &str) -> Result<Vec<Value>, ApiError> {
        match self.send(Method::GET, self.url(route, None), None).await? {
            Value::Array(items) => Ok(items),
            other => Err(ApiError::Decode(format!("expected a list, got {}", other))),
        }
    }

    #[instrument(skip(self, body))]
    async fn create(&self, route: &str, body: Map<String, Value>) -> Result<Value, ApiError> {
        self.send(Method::POST, self.url(route, None), Some(body))
            .await
    }

    #[instrument(skip(self, body))]
    async fn update(
        &self,
        route: &str,
        id: i64,
        body: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.send(Method::PUT, self.url(route, Some(id)), Some(body))
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, route: &str, id: i64) -> Result<Value, ApiError> {
        self.send(Method::DELETE, self.url(route, Some(id)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slash() {
        let api = HttpEditorApi::new("http://localhost:3000/");
        assert_eq!(api.url("/people", None), "http://localhost:3000/people");
        assert_eq!(api.url("/pets", Some(4)), "http://localhost:3000/pets/4");
    }

    #[test]
    fn test_server_error_displays_its_message() {
        let err = ApiError::Server {
            status: 404,
            message: "No person was found with the id 9.".to_string(),
        };
        assert_eq!(err.to_string(), "No person was found with the id 9.");
    }
}
