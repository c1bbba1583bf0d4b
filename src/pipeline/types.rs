//! Core data model for one generation run.
//!
//! The orchestrator owns one `OutlineEntry`/`SectionResult` set per
//! request; nothing here is shared across requests.

use serde::{Deserialize, Serialize};

use super::policy::SizeClass;
use super::PipelineError;

/// Maximum stored lengths for user-supplied fields.
const MAX_TOPIC_CHARS: usize = 500;
const MAX_TITLE_CHARS: usize = 200;
const MAX_SUBTITLE_CHARS: usize = 200;
const MAX_TONE_CHARS: usize = 100;
const MAX_AUDIENCE_CHARS: usize = 200;
const MAX_CATEGORY_CHARS: usize = 100;

/// A validated, sanitized request for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub size: SizeClass,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub category: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: &str, size: SizeClass) -> Self {
        Self {
            topic: topic.to_string(),
            title: None,
            subtitle: None,
            size,
            tone: None,
            audience: None,
            category: None,
        }
    }

    /// The topic is the one mandatory field. Absence after trimming is
    /// a validation error, never silently defaulted.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.topic.trim().is_empty() {
            return Err(PipelineError::Validation("topic is required".into()));
        }
        Ok(())
    }

    /// Strip control characters and cap field lengths. Applied once at
    /// the pipeline boundary, after validation.
    pub fn sanitized(self) -> Self {
        Self {
            topic: sanitize_field(&self.topic, MAX_TOPIC_CHARS),
            title: self
                .title
                .as_deref()
                .map(|s| sanitize_field(s, MAX_TITLE_CHARS))
                .filter(|s| !s.is_empty()),
            subtitle: self
                .subtitle
                .as_deref()
                .map(|s| sanitize_field(s, MAX_SUBTITLE_CHARS))
                .filter(|s| !s.is_empty()),
            size: self.size,
            tone: self
                .tone
                .as_deref()
                .map(|s| sanitize_field(s, MAX_TONE_CHARS))
                .filter(|s| !s.is_empty()),
            audience: self
                .audience
                .as_deref()
                .map(|s| sanitize_field(s, MAX_AUDIENCE_CHARS))
                .filter(|s| !s.is_empty()),
            category: self
                .category
                .as_deref()
                .map(|s| sanitize_field(s, MAX_CATEGORY_CHARS))
                .filter(|s| !s.is_empty()),
        }
    }

    /// The working title: the caller's title when given, otherwise the topic.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.topic)
    }
}

/// Collapse control characters to spaces, trim, and cap at a char boundary.
fn sanitize_field(raw: &str, max_chars: usize) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// One planned section. The ordered outline is the single source of
/// truth for section order and headings; it is never reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub index: usize,
    pub title: String,
}

/// Generated text for one outline index. Produced exactly once per
/// entry; a failed section carries placeholder text, never a gap.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult {
    pub outline_index: usize,
    pub text: String,
}

/// The finished document plus its size report. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_topic_fails_validation() {
        let req = GenerationRequest::new("   ", SizeClass::Short);
        assert!(req.validate().is_err());
    }

    #[test]
    fn non_empty_topic_passes_validation() {
        let req = GenerationRequest::new("time management", SizeClass::Short);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn sanitize_strips_control_chars_and_collapses_whitespace() {
        let mut req = GenerationRequest::new("time\u{0}\u{8}  management\n\ttips", SizeClass::Medium);
        req.tone = Some("  calm \u{200B}".into());
        let clean = req.sanitized();
        assert_eq!(clean.topic, "time management tips");
        // Zero-width space is not a control char; only trimming applies.
        assert_eq!(clean.tone.as_deref(), Some("calm \u{200B}"));
    }

    #[test]
    fn sanitize_caps_field_lengths() {
        let mut req = GenerationRequest::new(&"x".repeat(2_000), SizeClass::Medium);
        req.title = Some("t".repeat(1_000));
        let clean = req.sanitized();
        assert_eq!(clean.topic.chars().count(), 500);
        assert_eq!(clean.title.as_deref().map(|t| t.len()), Some(200));
    }

    #[test]
    fn sanitize_drops_blank_optional_fields() {
        let mut req = GenerationRequest::new("topic", SizeClass::Short);
        req.audience = Some("   ".into());
        req.category = Some("\u{1}\u{2}".into());
        let clean = req.sanitized();
        assert!(clean.audience.is_none());
        assert!(clean.category.is_none());
    }

    #[test]
    fn display_title_prefers_explicit_title() {
        let mut req = GenerationRequest::new("gardening", SizeClass::Short);
        assert_eq!(req.display_title(), "gardening");
        req.title = Some("The Patient Gardener".into());
        assert_eq!(req.display_title(), "The Patient Gardener");
    }
}
