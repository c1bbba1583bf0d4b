//! Title/subtitle generation — the smallest instance of the
//! call-extract-fallback pattern the rest of the pipeline uses.

use serde::{Deserialize, Serialize};

use crate::llm::{extract_json, CompletionClient, CompletionParams};

use super::prompts;

const TITLE_MAX_TOKENS: u32 = 400;
const TITLE_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePair {
    pub title: String,
    pub subtitle: String,
}

/// Deterministic pair used when the model cannot provide one.
pub fn fallback_title(topic: &str) -> TitlePair {
    TitlePair {
        title: format!("Mastering {topic}"),
        subtitle: "A Practical Guide to Real Results".to_string(),
    }
}

/// Generate a title/subtitle pair for a topic. Never fails: upstream
/// errors and malformed output both degrade to `fallback_title`.
pub async fn generate_title(
    llm: &dyn CompletionClient,
    topic: &str,
    tone: Option<&str>,
) -> TitlePair {
    let prompt = prompts::title_prompt(topic, tone);

    let raw = match llm
        .complete(CompletionParams {
            prompt: &prompt,
            system: None,
            max_output_tokens: TITLE_MAX_TOKENS,
            temperature: TITLE_TEMPERATURE,
        })
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Title call failed, using fallback title");
            return fallback_title(topic);
        }
    };

    let pair: TitlePair = extract_json(&raw, fallback_title(topic));
    if pair.title.trim().is_empty() {
        return fallback_title(topic);
    }
    pair
}
