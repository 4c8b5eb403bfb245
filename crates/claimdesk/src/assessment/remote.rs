//! Text-generation endpoint client with retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn, Instrument};

use super::{AssessmentError, AssessmentProvider, AssessmentRequest};
use crate::config::{AssessmentConfig, GenerationParameters};

/// Raw status and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON request to the model endpoint.
#[async_trait]
pub trait GenerationTransport: Send + Sync + std::fmt::Debug {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &SecretString,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AssessmentError>;
}

#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, AssessmentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssessmentError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

#[async_trait]
impl GenerationTransport for ReqwestTransport {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &SecretString,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AssessmentError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssessmentError::Timeout(self.timeout_secs)
                } else {
                    AssessmentError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AssessmentError::Transport(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `attempt` (1-based) failed with `err`.
    pub fn delay_after(&self, attempt: u32, err: &AssessmentError) -> Duration {
        match err {
            AssessmentError::ModelLoading => self.base_delay,
            _ => self.base_delay * attempt,
        }
    }
}

#[derive(Debug)]
pub struct RemoteAssessmentProvider {
    transport: Arc<dyn GenerationTransport>,
    endpoint: String,
    api_key: Option<SecretString>,
    parameters: GenerationParameters,
    policy: RetryPolicy,
}

impl RemoteAssessmentProvider {
    pub fn new(
        transport: Arc<dyn GenerationTransport>,
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        parameters: GenerationParameters,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            api_key,
            parameters,
            policy,
        }
    }

    /// Builds a provider backed by reqwest.
    ///
    /// A key source that holds no value is not an error here; requests fail
    /// with [`AssessmentError::MissingCredential`] instead.
    pub fn from_config(config: &AssessmentConfig) -> Result<Self, AssessmentError> {
        let api_key = config
            .resolve_api_key()
            .map_err(|e| AssessmentError::Configuration(e.to_string()))?;
        if api_key.is_none() {
            log::warn!("No assessment API key available; remote assessments will fail");
        }

        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::new(
            Arc::new(transport),
            config.endpoint.clone(),
            api_key,
            config.parameters.clone(),
            RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                base_delay: config.retry_delay(),
            },
        ))
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "inputs": prompt,
            "parameters": self.parameters,
        })
    }

    async fn attempt(
        &self,
        api_key: &SecretString,
        body: &serde_json::Value,
    ) -> Result<String, AssessmentError> {
        let response = self.transport.post(&self.endpoint, api_key, body).await?;

        match response.status {
            401 => return Err(AssessmentError::AuthenticationFailed),
            403 => {
                debug!(body = %response.body, "access forbidden");
                return Err(AssessmentError::AccessForbidden);
            }
            503 => return Err(AssessmentError::ModelLoading),
            status if !(200..300).contains(&status) => {
                return Err(AssessmentError::Http {
                    status,
                    body: response.body,
                })
            }
            _ => {}
        }

        parse_generated_text(&response.body)
    }
}

/// Extracts `generated_text` from the first element of the response array.
pub fn parse_generated_text(body: &str) -> Result<String, AssessmentError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AssessmentError::MalformedResponse(e.to_string()))?;

    value
        .get(0)
        .and_then(|first| first.get("generated_text"))
        .and_then(|text| text.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AssessmentError::MalformedResponse(truncate(body, 200)))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl AssessmentProvider for RemoteAssessmentProvider {
    async fn generate(&self, request: &AssessmentRequest) -> Result<String, AssessmentError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(AssessmentError::MissingCredential)?;
        let body = self.request_body(&request.prompt());
        let max_attempts = self.policy.max_attempts.max(1);

        let mut last_error = None;
        for attempt in 1..=max_attempts {
            let span = tracing::info_span!(
                "assessment.remote",
                kind = %request.kind(),
                attempt,
                max_attempts
            );

            match self.attempt(api_key, &body).instrument(span).await {
                Ok(text) => {
                    debug!(kind = %request.kind(), attempt, "assessment generated");
                    return Ok(text);
                }
                Err(err) if !err.is_retryable() => {
                    warn!(kind = %request.kind(), error = %err, "assessment request rejected");
                    return Err(err);
                }
                Err(err) => {
                    warn!(kind = %request.kind(), attempt, error = %err, "assessment attempt failed");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay_after(attempt, &err)).await;
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(AssessmentError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(last_error.unwrap_or(AssessmentError::ModelLoading)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays canned responses and records request bodies.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<TransportResponse, AssessmentError>>>,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<TransportResponse, AssessmentError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationTransport for ScriptedTransport {
        async fn post(
            &self,
            _endpoint: &str,
            api_key: &SecretString,
            body: &serde_json::Value,
        ) -> Result<TransportResponse, AssessmentError> {
            assert_eq!(api_key.expose_secret(), "hf_test");
            self.requests.lock().unwrap().push(body.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AssessmentError::Transport("script exhausted".into())))
        }
    }

    fn status(status: u16, body: &str) -> Result<TransportResponse, AssessmentError> {
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }

    fn ok(text: &str) -> Result<TransportResponse, AssessmentError> {
        status(200, &json!([{ "generated_text": text }]).to_string())
    }

    fn provider(transport: Arc<ScriptedTransport>) -> RemoteAssessmentProvider {
        RemoteAssessmentProvider::new(
            transport,
            "http://localhost/model",
            Some(SecretString::from("hf_test")),
            GenerationParameters::default(),
            RetryPolicy::default(),
        )
    }

    fn summary_request() -> AssessmentRequest {
        AssessmentRequest::Summary {
            summary: "Hail damage on the roof".into(),
        }
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let transport = ScriptedTransport::new(vec![ok("Roof needs inspection")]);
        let text = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap();

        assert_eq!(text, "Roof needs inspection");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_body_shape() {
        let transport = ScriptedTransport::new(vec![ok("x")]);
        provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap();

        let body = transport.requests.lock().unwrap()[0].clone();
        assert!(body["inputs"]
            .as_str()
            .unwrap()
            .starts_with("Analyze this insurance claim summary: Hail damage on the roof."));
        assert_eq!(body["parameters"]["max_new_tokens"], 100);
        assert_eq!(body["parameters"]["return_full_text"], false);
        assert_eq!(body["parameters"]["temperature"], 0.7);
        assert_eq!(body["parameters"]["top_p"], 0.9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_loading_waits_base_delay() {
        let transport = ScriptedTransport::new(vec![status(503, ""), status(503, ""), ok("ready")]);
        let start = Instant::now();

        let text = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap();

        assert_eq!(text, "ready");
        assert_eq!(transport.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_failures_back_off_linearly() {
        let transport = ScriptedTransport::new(vec![
            status(500, "{}"),
            Err(AssessmentError::Transport("connection reset".into())),
            ok("finally"),
        ]);
        let start = Instant::now();

        let text = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap();

        assert_eq!(text, "finally");
        assert_eq!(start.elapsed(), Duration::from_secs(1 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_surfaces_last_error() {
        let transport = ScriptedTransport::new(vec![
            status(500, "a"),
            status(502, "b"),
            status(500, r#"{"error":"c"}"#),
        ]);
        let start = Instant::now();

        let err = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap_err();

        assert_eq!(transport.calls(), 3);
        // No wait after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        match err {
            AssessmentError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, AssessmentError::Http { status: 500, ref body } if body == r#"{"error":"c"}"#));
            }
            other => panic!("expected exhausted retries, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_not_retried() {
        let transport = ScriptedTransport::new(vec![status(401, ""), ok("unused")]);
        let start = Instant::now();

        let err = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::AuthenticationFailed));
        assert_eq!(transport.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_forbidden_not_retried() {
        let transport = ScriptedTransport::new(vec![status(403, r#"{"error":"gated"}"#)]);
        let err = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::AccessForbidden));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_retried() {
        let transport = ScriptedTransport::new(vec![
            status(200, r#"{"generated_text":"not an array"}"#),
            status(200, "[]"),
            ok("third time"),
        ]);

        let text = provider(transport.clone())
            .generate(&summary_request())
            .await
            .unwrap();
        assert_eq!(text, "third time");
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let transport = ScriptedTransport::new(vec![ok("unused")]);
        let provider = RemoteAssessmentProvider::new(
            transport.clone(),
            "http://localhost/model",
            None,
            GenerationParameters::default(),
            RetryPolicy::default(),
        );

        let err = provider.generate(&summary_request()).await.unwrap_err();
        assert!(matches!(err, AssessmentError::MissingCredential));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_parse_generated_text() {
        assert_eq!(
            parse_generated_text(r#"[{"generated_text":"hello"}]"#).unwrap(),
            "hello"
        );
        assert!(matches!(
            parse_generated_text(r#"[{"generated_text":""}]"#),
            Err(AssessmentError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_generated_text("<html>"),
            Err(AssessmentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_delay_after() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_after(2, &AssessmentError::ModelLoading),
            Duration::from_secs(1)
        );
        assert_eq!(
            policy.delay_after(2, &AssessmentError::Transport("x".into())),
            Duration::from_secs(2)
        );
    }
}
