//! Deterministic document assembly and the size report.
//!
//! Concatenation order is fixed: title block → static front matter →
//! table of contents → section bodies in outline order → closing note.
//! Word count splits the final text on whitespace; the page estimate
//! applies the policy's floor.

use chrono::Datelike;

use super::policy::LengthConfig;
use super::types::{Artifact, GenerationRequest, OutlineEntry, SectionResult};

/// Assemble the final artifact. `sections` must hold one result per
/// outline entry; bodies are emitted strictly in outline-index order
/// under headings taken verbatim from the outline.
pub fn assemble(
    req: &GenerationRequest,
    outline: &[OutlineEntry],
    sections: &[SectionResult],
    config: &LengthConfig,
) -> Artifact {
    let title = req.display_title().to_string();
    let mut content = String::new();

    // Title block
    content.push_str(&format!("# {title}\n\n"));
    if let Some(subtitle) = &req.subtitle {
        content.push_str(&format!("*{subtitle}*\n\n"));
    }

    // Static front matter — no model call involved.
    let year = chrono::Utc::now().year();
    content.push_str(&format!(
        "© {year}. All rights reserved.\n\n\
         This book was produced as a generated edition. It is intended \
         as practical guidance, not professional advice.\n\n\
         **How to use this book:** read the chapters in order; each one \
         builds on the last and ends with steps you can act on today.\n\n"
    ));

    // Table of contents, from the same outline that names the headings.
    content.push_str("## Table of Contents\n\n");
    for entry in outline {
        content.push_str(&format!("{}. {}\n", entry.index + 1, entry.title));
    }
    content.push('\n');

    // Section bodies, one per outline entry, in index order.
    for entry in outline {
        let body = sections
            .iter()
            .find(|s| s.outline_index == entry.index)
            .map(|s| s.text.as_str())
            .unwrap_or_default();
        content.push_str(&format!("## {}\n\n{}\n\n", entry.title, body.trim()));
    }

    // Closing note
    content.push_str("---\n\n*Thank you for reading. Put one idea from this book into practice today.*\n");

    let word_count = content.split_whitespace().count();
    let pages = config.page_count(word_count);

    Artifact {
        title,
        content,
        word_count,
        pages,
    }
}
