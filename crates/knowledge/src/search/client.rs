//! Get Notes knowledge-base search client.
//!
//! API: `POST {base_url}/knowledge/search` with a bearer token. The endpoint
//! can run multi-step reasoning before it answers, so the timeout is long.

use super::response::SearchResponse;
use super::NoteSearch;
use crate::types::Note;
use getnote_core::{AppConfig, AppError, AppResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use std::time::Duration;

/// Default search timeout.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Search request body.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    question: &'a str,
    topic_ids: [&'a str; 1],
    deep_seek: bool,
    refs: bool,
    history: Vec<String>,
}

/// HTTP client for the knowledge-base search endpoint.
#[derive(Debug, Clone)]
pub struct GetNoteClient {
    base_url: String,
    kb_id: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GetNoteClient {
    /// Create a client. Blank credentials fail here, not on the first call.
    pub fn new(
        api_key: &str,
        kb_id: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("Get Notes API key is not set".to_string()));
        }
        if kb_id.trim().is_empty() {
            return Err(AppError::Config(
                "Knowledge base id is not set".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| AppError::Config(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("X-OAuth-Version", HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build search HTTP client: {}", e)))?;

        tracing::info!("Get Notes client initialized for knowledge base {}", kb_id);

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            kb_id: kb_id.trim().to_string(),
            timeout,
            client,
        })
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            config.require_api_key()?,
            config.require_kb_id()?,
            config.base_url.clone(),
            Duration::from_secs(config.search_timeout_secs),
        )
    }

    fn search_url(&self) -> String {
        format!("{}/knowledge/search", self.base_url)
    }

    fn build_request<'a>(&'a self, query: &'a str) -> SearchRequest<'a> {
        SearchRequest {
            question: query,
            topic_ids: [self.kb_id.as_str()],
            deep_seek: true,
            refs: true,
            history: Vec::new(),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::retrieval(format!(
                "Search request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            AppError::retrieval(format!("Search request failed: {}", err))
        }
    }
}

#[async_trait::async_trait]
impl NoteSearch for GetNoteClient {
    async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<Note>> {
        let url = self.search_url();
        tracing::info!("Searching knowledge base (top_k hint: {})", top_k);
        tracing::debug!("POST {} question={:?}", url, query);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(query))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::error!("Search endpoint returned {}: {}", status, body);
            return Err(AppError::retrieval_status(status.as_u16(), body));
        }

        tracing::debug!("Search response body: {}", body);

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| AppError::Retrieval {
            status: Some(status.as_u16()),
            message: format!("Search response is not valid JSON: {}", e),
        })?;

        let parsed = SearchResponse::parse(&value);
        tracing::info!("Search response shape: {}", parsed.kind());
        if parsed == SearchResponse::Empty {
            tracing::warn!("No known note fields found in search response");
        }

        Ok(parsed.into_notes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoteSource;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> GetNoteClient {
        GetNoteClient::new("secret", "kb-1", server.uri(), timeout).unwrap()
    }

    #[test]
    fn test_missing_credentials_fail_construction() {
        let result = GetNoteClient::new("", "kb-1", "http://localhost", DEFAULT_SEARCH_TIMEOUT);
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = GetNoteClient::new("secret", " ", "http://localhost", DEFAULT_SEARCH_TIMEOUT);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = AppConfig::default();
        assert!(matches!(
            GetNoteClient::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let client =
            GetNoteClient::new("secret", "kb-1", "http://localhost/", DEFAULT_SEARCH_TIMEOUT)
                .unwrap();
        let body = serde_json::to_value(client.build_request("how to sleep")).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "question": "how to sleep",
                "topic_ids": ["kb-1"],
                "deep_seek": true,
                "refs": true,
                "history": []
            })
        );
        assert_eq!(client.search_url(), "http://localhost/knowledge/search");
    }

    #[tokio::test]
    async fn test_search_sends_auth_and_parses_composite() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledge/search"))
            .and(header("authorization", "Bearer secret"))
            .and(header("x-oauth-version", "1"))
            .and(body_json(serde_json::json!({
                "question": "sleep",
                "topic_ids": ["kb-1"],
                "deep_seek": true,
                "refs": true,
                "history": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "c": {
                    "answers": "Go to bed early.",
                    "refs": [{"title": "Sleep", "content": "Bed by 11pm."}]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notes = client_for(&server, DEFAULT_SEARCH_TIMEOUT)
            .search("sleep", 3)
            .await
            .unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].source, NoteSource::AiAnswer);
        assert_eq!(notes[1].title, "Sleep");
    }

    #[tokio::test]
    async fn test_non_success_status_is_retrieval_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledge/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let err = client_for(&server, DEFAULT_SEARCH_TIMEOUT)
            .search("sleep", 3)
            .await
            .unwrap_err();

        match err {
            AppError::Retrieval { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "invalid token");
            }
            other => panic!("Expected retrieval error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_retrieval_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledge/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_millis(50))
            .search("sleep", 3)
            .await
            .unwrap_err();

        match err {
            AppError::Retrieval { status, message } => {
                assert_eq!(status, None);
                assert!(message.contains("timed out"));
            }
            other => panic!("Expected retrieval error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_retrieval_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledge/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server, DEFAULT_SEARCH_TIMEOUT)
            .search("sleep", 3)
            .await;

        assert!(matches!(result, Err(AppError::Retrieval { status: Some(200), .. })));
    }

    #[tokio::test]
    async fn test_unknown_shape_yields_no_notes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledge/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"h": {"c": 0}})),
            )
            .mount(&server)
            .await;

        let notes = client_for(&server, DEFAULT_SEARCH_TIMEOUT)
            .search("sleep", 3)
            .await
            .unwrap();
        assert!(notes.is_empty());
    }
}
