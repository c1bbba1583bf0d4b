//! Outline planning: ask the model for section titles, fall back to a
//! deterministic synthetic outline when it misbehaves.
//!
//! The planner never fails the pipeline. Whatever it returns becomes
//! the single source of truth for section order and headings.

use crate::llm::{extract_json, CompletionClient, CompletionParams};

use super::policy::LengthConfig;
use super::prompts;
use super::types::{GenerationRequest, OutlineEntry};

/// Token budget for the outline call; a title list is small.
const OUTLINE_MAX_TOKENS: u32 = 800;
const OUTLINE_TEMPERATURE: f32 = 0.4;

/// Plan the ordered outline for a document. Always returns exactly
/// `config.section_count` entries with indexes `0..n`.
pub async fn plan_outline(
    llm: &dyn CompletionClient,
    req: &GenerationRequest,
    config: &LengthConfig,
) -> Vec<OutlineEntry> {
    let prompt = prompts::outline_prompt(req, config);

    let raw = match llm
        .complete(CompletionParams {
            prompt: &prompt,
            system: Some(prompts::EBOOK_SYSTEM_PROMPT),
            max_output_tokens: OUTLINE_MAX_TOKENS,
            temperature: OUTLINE_TEMPERATURE,
        })
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Outline call failed, using synthetic outline");
            return synthetic_outline(req, config);
        }
    };

    let titles: Vec<String> = extract_json(&raw, Vec::new());
    let titles: Vec<String> = titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .collect();

    if titles.len() != config.section_count || titles.iter().any(|t| t.is_empty()) {
        tracing::warn!(
            got = titles.len(),
            want = config.section_count,
            "Outline response unusable, using synthetic outline"
        );
        return synthetic_outline(req, config);
    }

    titles
        .into_iter()
        .enumerate()
        .map(|(index, title)| OutlineEntry { index, title })
        .collect()
}

/// Deterministic outline used when the model cannot provide one.
pub fn synthetic_outline(req: &GenerationRequest, config: &LengthConfig) -> Vec<OutlineEntry> {
    let n = config.section_count;
    (0..n)
        .map(|index| {
            let title = if index == 0 {
                "Introduction".to_string()
            } else if index == n - 1 {
                "Conclusion".to_string()
            } else {
                format!("Chapter {index}: Key Aspect {index} of {}", req.topic)
            };
            OutlineEntry { index, title }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockCompletionClient;
    use crate::llm::LlmError;
    use crate::pipeline::policy::SizeClass;

    fn request() -> GenerationRequest {
        GenerationRequest::new("time management", SizeClass::Short)
    }

    #[tokio::test]
    async fn uses_model_titles_when_count_matches() {
        let raw = r#"Here you go:
["Introduction", "The Problem", "The System", "Staying On Track", "Conclusion"]"#;
        let llm = MockCompletionClient::new(raw);
        let outline = plan_outline(&llm, &request(), SizeClass::Short.config()).await;

        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0].title, "Introduction");
        assert_eq!(outline[2].title, "The System");
        assert_eq!(outline[4].index, 4);
    }

    #[tokio::test]
    async fn wrong_length_falls_back_to_synthetic() {
        let llm = MockCompletionClient::new(r#"["Only", "Three", "Titles"]"#);
        let outline = plan_outline(&llm, &request(), SizeClass::Short.config()).await;

        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0].title, "Introduction");
        assert_eq!(outline[4].title, "Conclusion");
        assert!(outline[1].title.contains("time management"));
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_synthetic() {
        let llm = MockCompletionClient::new("I cannot produce JSON today, sorry.");
        let outline = plan_outline(&llm, &request(), SizeClass::Short.config()).await;
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0].title, "Introduction");
    }

    #[tokio::test]
    async fn blank_titles_fall_back_to_synthetic() {
        let llm = MockCompletionClient::new(r#"["A", "  ", "C", "D", "E"]"#);
        let outline = plan_outline(&llm, &request(), SizeClass::Short.config()).await;
        assert_eq!(outline[0].title, "Introduction");
    }

    #[tokio::test]
    async fn upstream_failure_falls_back_to_synthetic() {
        let llm = MockCompletionClient::always_failing(LlmError::Upstream {
            status: 500,
            body: "down".into(),
        });
        let outline = plan_outline(&llm, &request(), SizeClass::Short.config()).await;
        assert_eq!(outline.len(), 5);
    }

    #[test]
    fn synthetic_outline_is_deterministic_and_gapless() {
        let config = SizeClass::Long.config();
        let a = synthetic_outline(&request(), config);
        let b = synthetic_outline(&request(), config);
        assert_eq!(a, b);
        assert_eq!(a.len(), config.section_count);
        for (i, entry) in a.iter().enumerate() {
            assert_eq!(entry.index, i);
        }
    }
}
