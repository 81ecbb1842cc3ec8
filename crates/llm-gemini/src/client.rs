//! Gemini HTTP client

use std::time::Duration;

use reqwest::Client as HttpClient;
use turco_types::{HistoryEntry, Role};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, Result};
use crate::types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SafetySetting,
};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Everything needed for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub system_instruction: Option<&'a str>,
    /// Prior turns, oldest first. Must not contain `message`.
    pub history: &'a [HistoryEntry],
    /// The live user turn.
    pub message: &'a str,
    pub generation: GenerationConfig,
    pub safety_settings: &'a [SafetySetting],
}

impl ChatRequest<'_> {
    fn to_wire(&self) -> GenerateContentRequest {
        let mut contents: Vec<Content> = self.history.iter().map(Content::from).collect();
        contents.push(Content::text(Some(Role::User), self.message));

        GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.map(|s| Content::text(None, s)),
            generation_config: self.generation,
            safety_settings: self.safety_settings.to_vec(),
        }
    }
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client. Fails only if the TLS backend cannot be initialised.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Run one `generateContent` call and return the reply text.
    ///
    /// 429, 5xx and transport errors are retried with exponential backoff up to
    /// `retry_attempts` total attempts. Blocked prompts and empty candidates are
    /// returned as errors, never as empty strings.
    pub async fn generate(&self, request: &ChatRequest<'_>) -> Result<String> {
        let body = request.to_wire();
        let url = format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_path()
        );
        let attempts = self.config.retry_attempts.max(1);
        let mut delay = INITIAL_BACKOFF;
        let mut attempt = 1;

        loop {
            match self.send_once(&url, &body).await {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        retry_in = ?delay,
                        "Gemini API retryable error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, url: &str, body: &GenerateContentRequest) -> Result<String> {
        tracing::debug!(
            model = %self.config.model,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        // Key goes in a header so it never shows up in reqwest error URLs.
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        extract_text(parsed)
    }
}

fn extract_text(resp: GenerateContentResponse) -> Result<String> {
    if let Some(text) = resp.first_text() {
        return Ok(text);
    }

    if let Some(reason) = resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(GeminiError::Blocked(reason));
    }

    let finish = resp
        .candidates
        .first()
        .and_then(|c| c.finish_reason.clone())
        .unwrap_or_else(|| "NO_CANDIDATES".to_string());
    Err(GeminiError::EmptyResponse(finish))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HarmBlockThreshold, HarmCategory};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PARAMS: GenerationConfig = GenerationConfig {
        temperature: 0.9,
        top_p: 0.95,
        top_k: 40,
        max_output_tokens: 1024,
    };

    const SAFETY: [SafetySetting; 1] = [SafetySetting::new(
        HarmCategory::DangerousContent,
        HarmBlockThreshold::BlockMediumAndAbove,
    )];

    fn client_for(server: &MockServer, retry_attempts: u32) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            retry_attempts,
            timeout_secs: 5,
            ..GeminiConfig::default()
        })
        .unwrap()
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash-lite:generateContent";

    #[tokio::test]
    async fn test_generate_sends_history_then_live_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "primeira"}]},
                    {"role": "model", "parts": [{"text": "resposta"}]},
                    {"role": "user", "parts": [{"text": "segunda"}]}
                ],
                "systemInstruction": {"parts": [{"text": "persona"}]},
                "generationConfig": {"topK": 40, "maxOutputTokens": 1024},
                "safetySettings": [{
                    "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                    "threshold": "BLOCK_MEDIUM_AND_ABOVE"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("clarinho")))
            .expect(1)
            .mount(&server)
            .await;

        let history = vec![HistoryEntry::user("primeira"), HistoryEntry::model("resposta")];
        let text = client_for(&server, 1)
            .generate(&ChatRequest {
                system_instruction: Some("persona"),
                history: &history,
                message: "segunda",
                generation: PARAMS,
                safety_settings: &SAFETY,
            })
            .await
            .unwrap();

        assert_eq!(text, "clarinho");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 3)
            .generate(&ChatRequest {
                system_instruction: None,
                history: &[],
                message: "oi",
                generation: PARAMS,
                safety_settings: &[],
            })
            .await
            .unwrap_err();

        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_reports_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .generate(&ChatRequest {
                system_instruction: None,
                history: &[],
                message: "oi",
                generation: PARAMS,
                safety_settings: &[],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GeminiError::Blocked(ref r) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn test_generate_reports_empty_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .generate(&ChatRequest {
                system_instruction: None,
                history: &[],
                message: "oi",
                generation: PARAMS,
                safety_settings: &[],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GeminiError::EmptyResponse(ref r) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn test_generate_retries_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("voltei")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server, 2)
            .generate(&ChatRequest {
                system_instruction: None,
                history: &[],
                message: "oi",
                generation: PARAMS,
                safety_settings: &[],
            })
            .await
            .unwrap();

        assert_eq!(text, "voltei");
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .generate(&ChatRequest {
                system_instruction: None,
                history: &[],
                message: "oi",
                generation: PARAMS,
                safety_settings: &[],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GeminiError::Api { status: 500, ref message } if message == "boom"));
    }
}
