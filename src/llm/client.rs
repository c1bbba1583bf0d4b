//! Chat-completion client for any OpenAI-compatible endpoint.
//!
//! One trait, one production implementation over reqwest, and mock
//! clients for tests. The production client owns retry with exponential
//! backoff and a hard per-call timeout; callers see a single
//! `complete()` that either yields text or a classified `LlmError`.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::LlmError;

/// Maximum attempts per completion call (1 initial + 2 retries).
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff; actual delay is base × attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Parameters for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionParams<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// A client that turns one prompt into one completion.
///
/// Object-safe so the pipeline can hold `Box<dyn CompletionClient>` and
/// tests can substitute mocks.
pub trait CompletionClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        params: CompletionParams<'a>,
    ) -> BoxFuture<'a, Result<String, LlmError>>;
}

/// Production client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
    retry_base: Duration,
}

impl ChatCompletionClient {
    /// Build a client with a hard per-call timeout. The upstream has no
    /// intrinsic bound, so the timeout is what keeps the pipeline from
    /// hanging indefinitely.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        // The timeout is applied per request rather than on the client
        // builder, so it holds no matter how the client was constructed.
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs,
            retry_base: RETRY_BASE_DELAY,
        }
    }

    #[cfg(test)]
    fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    async fn try_complete(&self, params: &CompletionParams<'_>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = params.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: params.prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        };

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(content)
    }
}

impl CompletionClient for ChatCompletionClient {
    fn complete<'a>(
        &'a self,
        params: CompletionParams<'a>,
    ) -> BoxFuture<'a, Result<String, LlmError>> {
        Box::pin(async move {
            if params.prompt.trim().is_empty() {
                return Err(LlmError::InvalidRequest("prompt is empty".into()));
            }
            if params.max_output_tokens == 0 {
                return Err(LlmError::InvalidRequest(
                    "max_output_tokens must be positive".into(),
                ));
            }

            let mut attempt = 1;
            loop {
                match self.try_complete(&params).await {
                    Ok(text) => return Ok(text),
                    Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            "Completion call failed, retrying"
                        );
                        tokio::time::sleep(self.retry_base * attempt).await;
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        })
    }
}

// ── Wire types ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ── Mock clients for tests ──────────────────────────────────────

/// Mock completion client. Plays back a script of responses in order,
/// then repeats a fallthrough response; records every prompt it sees.
#[cfg(test)]
pub struct MockCompletionClient {
    script: Mutex<Vec<Result<String, LlmError>>>,
    fallthrough: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCompletionClient {
    /// Client that returns the same response for every call.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            fallthrough: response.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client that plays back `steps` in order, then repeats `fallthrough`.
    pub fn scripted(steps: Vec<Result<String, LlmError>>, fallthrough: &str) -> Self {
        let mut script = steps;
        script.reverse(); // pop() from the back in call order
        Self {
            script: Mutex::new(script),
            fallthrough: fallthrough.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client whose every call fails with the given error.
    pub fn always_failing(error: LlmError) -> Self {
        Self {
            script: Mutex::new(vec![Err(error)]),
            fallthrough: String::new(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl CompletionClient for MockCompletionClient {
    fn complete<'a>(
        &'a self,
        params: CompletionParams<'a>,
    ) -> BoxFuture<'a, Result<String, LlmError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(params.prompt.to_string());

        let next = {
            let mut script = self.script.lock().unwrap();
            match script.pop() {
                Some(step) => {
                    // A terminal error with no fallthrough repeats forever.
                    if step.is_err() && script.is_empty() && self.fallthrough.is_empty() {
                        script.push(step.clone());
                    }
                    step
                }
                None => Ok(self.fallthrough.clone()),
            }
        };

        Box::pin(async move { next })
    }
}
