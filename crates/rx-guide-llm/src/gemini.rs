//! Gemini `generateContent` client over blocking HTTP.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::client::{GenerateRequest, GenerativeModel, ModelError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(mut config: GeminiConfig) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::HttpClient(e.to_string()))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn request_body(request: &GenerateRequest<'_>) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: request.prompt.to_string(),
    }];
    if let Some(image) = request.image {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: image.mime(),
                data: STANDARD.encode(image.bytes()),
            },
        });
    }
    GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config: request.json_mode.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

fn response_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
        tracing::debug!(
            model = %self.config.model,
            json_mode = request.json_mode,
            has_image = request.image.is_some(),
            "Calling generateContent"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(request))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ModelError::Connection(self.config.base_url.clone())
                } else if e.is_timeout() {
                    ModelError::Timeout(self.config.timeout_secs)
                } else {
                    ModelError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| ModelError::ResponseParsing(e.to_string()))?;

        response_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageInput;

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains(DEFAULT_MODEL));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let mut config = GeminiConfig::new("k");
        config.base_url = "http://localhost:8080/".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let image = ImageInput::from_bytes(vec![0xFF, 0xD8, 0xFF, 0x01]).unwrap();
        let request = GenerateRequest::text("read this").with_image(&image).json();
        let body = serde_json::to_value(request_body(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "read this");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], STANDARD.encode([0xFFu8, 0xD8, 0xFF, 0x01]));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );

        let plain = serde_json::to_value(request_body(&GenerateRequest::text("hi"))).unwrap();
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response_text(parsed).unwrap(), "{\"a\": 1}");

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(response_text(blocked), Err(ModelError::EmptyResponse)));
    }

    fn client_for(server: &mockito::Server) -> GeminiClient {
        let mut config = GeminiConfig::new("test-key");
        config.base_url = server.url();
        config.timeout_secs = 5;
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_generate_over_http() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "[]"}]}}]}"#)
            .create();

        let answer = client_for(&server).generate(&GenerateRequest::text("hi")).unwrap();
        assert_eq!(answer, "[]");
        mock.assert();
    }

    #[test]
    fn test_non_success_status_maps_to_api_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(503)
            .with_body("model overloaded")
            .create();

        match client_for(&server).generate(&GenerateRequest::text("hi")) {
            Err(ModelError::Api { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_and_empty_bodies() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", mockito::Matcher::Any)
            .match_body(mockito::Matcher::Regex("garbled".to_string()))
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();
        server
            .mock("POST", mockito::Matcher::Any)
            .match_body(mockito::Matcher::Regex("blocked".to_string()))
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create();

        let client = client_for(&server);
        assert!(matches!(
            client.generate(&GenerateRequest::text("garbled")),
            Err(ModelError::ResponseParsing(_))
        ));
        assert!(matches!(
            client.generate(&GenerateRequest::text("blocked")),
            Err(ModelError::EmptyResponse)
        ));
    }

    #[test]
    fn test_refused_connection() {
        let mut config = GeminiConfig::new("k");
        config.base_url = "http://127.0.0.1:1".to_string();
        config.timeout_secs = 5;
        let client = GeminiClient::new(config).unwrap();
        assert!(matches!(
            client.generate(&GenerateRequest::text("hi")),
            Err(ModelError::Connection(_))
        ));
    }
}
