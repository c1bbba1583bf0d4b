//! Prompt builders for every upstream call the pipeline makes.
//!
//! All prompts that expect structured output say so explicitly and are
//! still treated as untrusted free text on the way back (see
//! `llm::extract`). Section prompts dictate `## <title>` markers so the
//! returned text can be split deterministically.

use super::policy::LengthConfig;
use super::types::{GenerationRequest, OutlineEntry};

/// System prompt for all content generation calls.
pub const EBOOK_SYSTEM_PROMPT: &str = "\
You are a professional nonfiction publishing engine. You do not write \
blog posts or motivational essays; you write structured, commercial-grade \
ebooks in Markdown. Short paragraphs, bullets and tables where helpful, \
no fluff, no hype. Every chapter is fully written, never summarized.";

/// The mandatory per-section content template, embedded in every
/// section prompt.
const SECTION_TEMPLATE: &str = "\
Each section MUST follow this internal structure:
1. An opening hook that names the reader's situation
2. The core problem and what it costs the reader
3. A mental model or framework that reframes the problem
4. A plain-language explanation of how the framework works
5. Concrete examples or short case studies
6. Step-by-step action steps the reader can execute today
7. A closing identity shift: who the reader becomes by applying this";

fn describe_request(req: &GenerationRequest) -> String {
    let mut lines = vec![
        format!("Topic: {}", req.topic),
        format!("Working title: {}", req.display_title()),
    ];
    if let Some(subtitle) = &req.subtitle {
        lines.push(format!("Subtitle: {subtitle}"));
    }
    if let Some(tone) = &req.tone {
        lines.push(format!("Tone: {tone}"));
    }
    if let Some(audience) = &req.audience {
        lines.push(format!("Target audience: {audience}"));
    }
    if let Some(category) = &req.category {
        lines.push(format!("Category: {category}"));
    }
    lines.join("\n")
}

/// Prompt asking for the outline as a strict JSON array of titles.
pub fn outline_prompt(req: &GenerationRequest, config: &LengthConfig) -> String {
    format!(
        "Plan the outline for a {label} nonfiction ebook.\n\n{details}\n\n\
         Produce exactly {count} section titles in reading order: an \
         introduction, the core chapters, and a conclusion.\n\n\
         Output ONLY a JSON array of {count} strings, nothing else:\n\
         [\"Section title\", ...]",
        label = config.label,
        details = describe_request(req),
        count = config.section_count,
    )
}

/// Prompt generating the whole document in one call (short/medium).
pub fn single_pass_prompt(
    req: &GenerationRequest,
    outline: &[OutlineEntry],
    config: &LengthConfig,
) -> String {
    format!(
        "Write the complete body of a {label} nonfiction ebook.\n\n{details}\n\n\
         Sections, in this exact order:\n{outline}\n\n\
         {template}\n\n\
         FORMAT RULES:\n\
         - Begin every section with a line reading exactly `## <section title>` \
           using the titles above, unchanged\n\
         - Use `###` for subsections, never `##`\n\
         - Target {words_lo}-{words_hi} words overall\n\
         - Write every section in full; do not summarize or skip any\n\n\
         Begin with the first section now.",
        label = config.label,
        details = describe_request(req),
        outline = render_outline(outline),
        template = SECTION_TEMPLATE,
        words_lo = config.word_target.0,
        words_hi = config.word_target.1,
    )
}

/// Prompt generating one contiguous batch of a long document.
///
/// Continuity is carried by naming the sections that already exist, not
/// by resending their text; prompt size stays bounded regardless of how
/// far into the document the batch sits.
pub fn batch_prompt(
    req: &GenerationRequest,
    batch: &[OutlineEntry],
    prior: &[OutlineEntry],
    config: &LengthConfig,
) -> String {
    let continuity = if prior.is_empty() {
        "This batch opens the book.".to_string()
    } else {
        format!(
            "The first {n} sections are already written ({titles}); \
             continue seamlessly after them without repeating their content.",
            n = prior.len(),
            titles = prior
                .iter()
                .map(|e| e.title.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    };

    format!(
        "Write the next sections of a {label} nonfiction ebook.\n\n{details}\n\n\
         {continuity}\n\n\
         Sections to write now, in this exact order:\n{outline}\n\n\
         {template}\n\n\
         FORMAT RULES:\n\
         - Begin every section with a line reading exactly `## <section title>` \
           using the titles above, unchanged\n\
         - Use `###` for subsections, never `##`\n\
         - Target roughly {words} words per section\n\
         - Write only the sections listed above, each in full\n\n\
         Begin now.",
        label = config.label,
        details = describe_request(req),
        continuity = continuity,
        outline = render_outline(batch),
        template = SECTION_TEMPLATE,
        words = config.words_per_section(),
    )
}

/// Prompt asking for a title/subtitle pair as strict JSON.
pub fn title_prompt(topic: &str, tone: Option<&str>) -> String {
    format!(
        "Create a strong, benefit-driven title and subtitle for a \
         nonfiction ebook.\n\n\
         Topic: {topic}\n\
         Tone: {tone}\n\n\
         RULES:\n\
         - Title of at most 10 words, a clear benefit-driven promise\n\
         - No hype words (ultimate, secret, hacks)\n\n\
         Output ONLY valid JSON: {{\"title\": \"...\", \"subtitle\": \"...\"}}",
        tone = tone.unwrap_or("clear, authoritative, practical"),
    )
}

fn render_outline(entries: &[OutlineEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}. {}", e.index + 1, e.title))
        .collect::<Vec<_>>()
        .join("\n")
}
