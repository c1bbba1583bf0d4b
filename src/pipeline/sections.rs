//! Section generation: one upstream call for the smaller size classes,
//! ordered batches for the long class.
//!
//! Invariant either way: exactly one `SectionResult` per outline entry,
//! in outline order. Failed sections get placeholder bodies, never gaps.

use crate::llm::{CompletionClient, CompletionParams, LlmError};

use super::policy::LengthConfig;
use super::prompts;
use super::types::{GenerationRequest, OutlineEntry, SectionResult};

const SECTION_TEMPERATURE: f32 = 0.75;

/// Below this many characters a section's text is logged as suspect.
/// Short sections still count as produced; the size report reflects
/// actual production and nothing is fabricated to hit a target.
const MIN_SECTION_CHARS: usize = 200;

/// Generate the text for every outline entry.
///
/// Single-call classes propagate an exhausted upstream failure: the one
/// call was the whole document. The batched class absorbs per-batch
/// failures (one retry, then placeholders) so a long document degrades
/// instead of aborting.
pub async fn generate_sections(
    llm: &dyn CompletionClient,
    req: &GenerationRequest,
    outline: &[OutlineEntry],
    config: &LengthConfig,
) -> Result<Vec<SectionResult>, LlmError> {
    let results = if config.batched {
        generate_batched(llm, req, outline, config).await
    } else {
        generate_single_pass(llm, req, outline, config).await?
    };

    for section in &results {
        if section.text.len() < MIN_SECTION_CHARS {
            tracing::warn!(
                index = section.outline_index,
                chars = section.text.len(),
                "Section came back short"
            );
        }
    }

    debug_assert_eq!(results.len(), outline.len());
    Ok(results)
}

async fn generate_single_pass(
    llm: &dyn CompletionClient,
    req: &GenerationRequest,
    outline: &[OutlineEntry],
    config: &LengthConfig,
) -> Result<Vec<SectionResult>, LlmError> {
    let prompt = prompts::single_pass_prompt(req, outline, config);
    let text = llm
        .complete(CompletionParams {
            prompt: &prompt,
            system: Some(prompts::EBOOK_SYSTEM_PROMPT),
            max_output_tokens: config.max_output_tokens,
            temperature: SECTION_TEMPERATURE,
        })
        .await?;

    Ok(split_sections(&text, outline, &req.topic))
}

async fn generate_batched(
    llm: &dyn CompletionClient,
    req: &GenerationRequest,
    outline: &[OutlineEntry],
    config: &LengthConfig,
) -> Vec<SectionResult> {
    let batch_size = config.batch_size();
    let mut results = Vec::with_capacity(outline.len());

    // Batches run strictly in outline order; each prompt references the
    // sections already written by title only.
    for batch in outline.chunks(batch_size) {
        let prior = &outline[..batch[0].index];
        let prompt = prompts::batch_prompt(req, batch, prior, config);
        let params = CompletionParams {
            prompt: &prompt,
            system: Some(prompts::EBOOK_SYSTEM_PROMPT),
            max_output_tokens: config.max_output_tokens,
            temperature: SECTION_TEMPERATURE,
        };

        // The client already retries transient failures; one more
        // attempt here covers a bad completion before giving up on the
        // batch entirely.
        let text = match llm.complete(params.clone()).await {
            Ok(text) => Some(text),
            Err(first) => {
                tracing::warn!(
                    from = batch[0].index,
                    error = %first,
                    "Batch generation failed, retrying once"
                );
                match llm.complete(params).await {
                    Ok(text) => Some(text),
                    Err(second) => {
                        tracing::warn!(
                            from = batch[0].index,
                            sections = batch.len(),
                            error = %second,
                            "Batch failed twice, filling placeholders"
                        );
                        None
                    }
                }
            }
        };

        match text {
            Some(text) => results.extend(split_sections(&text, batch, &req.topic)),
            None => results.extend(
                batch
                    .iter()
                    .map(|entry| placeholder_section(entry, &req.topic)),
            ),
        }
    }

    results
}

/// Split generated text at the dictated `## ` markers and assign the
/// pieces to outline entries in order.
///
/// The heading lines themselves are dropped: the assembler renders
/// headings from the outline titles, which stay the single source of
/// truth. Missing trailing sections become placeholders; surplus
/// segments are folded into the last section.
pub fn split_sections(
    text: &str,
    entries: &[OutlineEntry],
    topic: &str,
) -> Vec<SectionResult> {
    let mut segments: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if line.starts_with("## ") {
            if let Some(done) = current.take() {
                segments.push(done);
            }
            current = Some(String::new());
        } else if let Some(buf) = current.as_mut() {
            buf.push_str(line);
            buf.push('\n');
        }
        // Preamble before the first marker is dropped: it is chatter,
        // not a section the outline asked for.
    }
    if let Some(done) = current.take() {
        segments.push(done);
    }

    // No markers at all: treat the whole text as the first section.
    if segments.is_empty() && !text.trim().is_empty() {
        segments.push(text.trim().to_string());
    }

    // Fold surplus segments into the last expected one.
    while segments.len() > entries.len() && !entries.is_empty() {
        let extra = segments.pop().unwrap_or_default();
        if let Some(last) = segments.last_mut() {
            last.push('\n');
            last.push_str(&extra);
        }
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match segments.get(i) {
            Some(body) if !body.trim().is_empty() => SectionResult {
                outline_index: entry.index,
                text: body.trim().to_string(),
            },
            _ => placeholder_section(entry, topic),
        })
        .collect()
}

/// Minimal stand-in body for a section that could not be generated.
fn placeholder_section(entry: &OutlineEntry, topic: &str) -> SectionResult {
    SectionResult {
        outline_index: entry.index,
        text: format!(
            "_This section could not be generated. \"{}\" covers one part \
             of {topic}; a future edition will include it in full._",
            entry.title,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockCompletionClient;
    use crate::llm::LlmError;
    use crate::pipeline::policy::SizeClass;

    fn entries(titles: &[&str]) -> Vec<OutlineEntry> {
        titles
            .iter()
            .enumerate()
            .map(|(index, t)| OutlineEntry {
                index,
                title: t.to_string(),
            })
            .collect()
    }

    fn request(size: SizeClass) -> GenerationRequest {
        GenerationRequest::new("time management", size)
    }

    fn numbered_entries(n: usize) -> Vec<OutlineEntry> {
        (0..n)
            .map(|index| OutlineEntry {
                index,
                title: format!("S{index}"),
            })
            .collect()
    }

    fn marked_document(titles: &[&str]) -> String {
        titles
            .iter()
            .map(|t| format!("## {t}\n\nBody text for {t}, long enough to read.\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── split_sections ──────────────────────────────────────────

    #[test]
    fn split_assigns_bodies_in_order_without_headings() {
        let outline = entries(&["One", "Two", "Three"]);
        let text = marked_document(&["One", "Two", "Three"]);
        let sections = split_sections(&text, &outline, "topic");

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].outline_index, 1);
        assert!(sections[1].text.contains("Body text for Two"));
        assert!(!sections[1].text.contains("## "));
    }

    #[test]
    fn split_drops_preamble_before_first_marker() {
        let outline = entries(&["One"]);
        let text = "Sure, here is the book you asked for!\n\n## One\n\nReal body.";
        let sections = split_sections(text, &outline, "topic");
        assert!(!sections[0].text.contains("here is the book"));
        assert!(sections[0].text.contains("Real body."));
    }

    #[test]
    fn split_fills_missing_sections_with_placeholders() {
        let outline = entries(&["One", "Two", "Three"]);
        let text = marked_document(&["One"]);
        let sections = split_sections(&text, &outline, "gardening");

        assert_eq!(sections.len(), 3);
        assert!(sections[0].text.contains("Body text for One"));
        assert!(sections[1].text.contains("could not be generated"));
        assert!(sections[2].text.contains("gardening"));
        assert_eq!(sections[2].outline_index, 2);
    }

    #[test]
    fn split_folds_surplus_segments_into_last_section() {
        let outline = entries(&["One", "Two"]);
        let text = marked_document(&["One", "Two", "Bonus", "More"]);
        let sections = split_sections(&text, &outline, "topic");

        assert_eq!(sections.len(), 2);
        assert!(sections[1].text.contains("Body text for Two"));
        assert!(sections[1].text.contains("Body text for Bonus"));
        assert!(sections[1].text.contains("Body text for More"));
    }

    #[test]
    fn split_without_markers_uses_whole_text_as_first_section() {
        let outline = entries(&["One", "Two"]);
        let sections = split_sections("No markers here at all.", &outline, "topic");
        assert!(sections[0].text.contains("No markers here"));
        assert!(sections[1].text.contains("could not be generated"));
    }

    #[test]
    fn split_subsection_headings_stay_in_body() {
        let outline = entries(&["One"]);
        let text = "## One\n\nIntro.\n\n### Detail\n\nMore.";
        let sections = split_sections(text, &outline, "topic");
        assert!(sections[0].text.contains("### Detail"));
    }

    // ── single-call path ────────────────────────────────────────

    #[tokio::test]
    async fn single_pass_produces_one_result_per_entry() {
        let outline = entries(&["A", "B", "C"]);
        let llm = MockCompletionClient::new(&marked_document(&["A", "B", "C"]));
        let req = request(SizeClass::Short);

        let sections = generate_sections(&llm, &req, &outline, SizeClass::Short.config())
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 1);
        assert_eq!(sections.len(), 3);
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.outline_index, i);
        }
    }

    #[tokio::test]
    async fn single_pass_propagates_exhausted_upstream_failure() {
        let outline = entries(&["A", "B", "C"]);
        let llm = MockCompletionClient::always_failing(LlmError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        });
        let req = request(SizeClass::Short);

        let result = generate_sections(&llm, &req, &outline, SizeClass::Short.config()).await;
        assert!(matches!(result, Err(LlmError::Upstream { status: 502, .. })));
    }

    // ── batched path ────────────────────────────────────────────

    #[tokio::test]
    async fn long_class_generates_in_ordered_batches() {
        let config = SizeClass::Long.config();
        let outline = numbered_entries(config.section_count);
        let batch = config.batch_size();
        let expected_calls = outline.len().div_ceil(batch);

        // Every call returns markers for a full batch worth of titles;
        // the splitter maps them positionally per batch.
        let per_call: Vec<Result<String, LlmError>> = outline
            .chunks(batch)
            .map(|chunk| {
                Ok(marked_document(
                    &chunk.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
                ))
            })
            .collect();
        let llm = MockCompletionClient::scripted(per_call, "");
        let req = request(SizeClass::Long);

        let sections = generate_sections(&llm, &req, &outline, config).await.unwrap();

        assert_eq!(llm.call_count(), expected_calls);
        assert_eq!(sections.len(), config.section_count);
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.outline_index, i, "order must follow the outline");
        }

        // Later prompts reference earlier sections by title only.
        let prompts = llm.prompts();
        assert!(prompts[1].contains("already written"));
        assert!(prompts[1].contains("S0"));
        assert!(!prompts[1].contains("Body text for S0"));
    }

    #[tokio::test]
    async fn failed_batch_is_retried_once_then_placeholdered() {
        let config = SizeClass::Long.config();
        let batch = config.batch_size();
        let outline = numbered_entries(config.section_count);

        // First batch call fails twice (initial + retry), the rest succeed.
        let err = LlmError::Upstream {
            status: 500,
            body: "down".into(),
        };
        let mut script: Vec<Result<String, LlmError>> = vec![Err(err.clone()), Err(err)];
        for chunk in outline.chunks(batch).skip(1) {
            script.push(Ok(marked_document(
                &chunk.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            )));
        }
        let llm = MockCompletionClient::scripted(script, "");
        let req = request(SizeClass::Long);

        let sections = generate_sections(&llm, &req, &outline, config).await.unwrap();

        assert_eq!(sections.len(), config.section_count);
        // First batch's sections are placeholders at the correct positions.
        for s in &sections[..batch] {
            assert!(s.text.contains("could not be generated"));
        }
        // Subsequent batches are real content.
        assert!(sections[batch].text.contains(&format!("Body text for S{batch}")));
    }
}
