//! Length policy: one immutable configuration row per size class.
//!
//! Every sizing decision in the pipeline comes from here — section
//! counts, word targets, per-call token budgets, and the page math.
//! The page divisor is deliberately a single constant; the estimate is
//! coarse and one authoritative value beats several competing ones.

use serde::{Deserialize, Serialize};

/// Words per rendered page used for the page estimate.
pub const WORDS_PER_PAGE: usize = 350;

/// Coarse document length selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Short,
    Medium,
    Long,
}

impl SizeClass {
    /// Parse a user-supplied length string. Unknown or absent values
    /// default to `Medium`; this is a user-facing boundary and leniency
    /// is the contract, not an error.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("short") => SizeClass::Short,
            Some("long") => SizeClass::Long,
            _ => SizeClass::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Short => "short",
            SizeClass::Medium => "medium",
            SizeClass::Long => "long",
        }
    }

    /// The policy row for this size class.
    pub fn config(&self) -> &'static LengthConfig {
        match self {
            SizeClass::Short => &SHORT,
            SizeClass::Medium => &MEDIUM,
            SizeClass::Long => &LONG,
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable sizing configuration derived purely from a `SizeClass`.
#[derive(Debug, Clone, Serialize)]
pub struct LengthConfig {
    pub label: &'static str,
    /// Number of sections the planner targets.
    pub section_count: usize,
    /// Acceptable section count range, for prompt text.
    pub section_count_range: (usize, usize),
    /// Target total words (low, high).
    pub word_target: (usize, usize),
    /// Target page range (low, high); the low bound is the page floor.
    pub page_target: (usize, usize),
    /// Output token budget for a single upstream call.
    pub max_output_tokens: u32,
    /// Whether sections must be generated in batched calls.
    pub batched: bool,
}

static SHORT: LengthConfig = LengthConfig {
    label: "Short",
    section_count: 5,
    section_count_range: (3, 7),
    word_target: (4_000, 6_000),
    page_target: (10, 15),
    max_output_tokens: 6_000,
    batched: false,
};

static MEDIUM: LengthConfig = LengthConfig {
    label: "Medium",
    section_count: 9,
    section_count_range: (6, 12),
    word_target: (10_000, 15_000),
    page_target: (20, 30),
    max_output_tokens: 8_000,
    batched: false,
};

static LONG: LengthConfig = LengthConfig {
    label: "Long",
    section_count: 15,
    section_count_range: (12, 18),
    word_target: (20_000, 25_000),
    page_target: (40, 50),
    max_output_tokens: 8_000,
    batched: true,
};

impl LengthConfig {
    /// Minimum page count reported for this class.
    pub fn page_floor(&self) -> usize {
        self.page_target.0
    }

    /// Target words for a single section (midpoint of the word target
    /// spread over the section count).
    pub fn words_per_section(&self) -> usize {
        ((self.word_target.0 + self.word_target.1) / 2 / self.section_count).max(1)
    }

    /// Sections per batched call, sized so a batch's expected output
    /// stays under `max_output_tokens` at roughly 4 tokens per 3 words.
    pub fn batch_size(&self) -> usize {
        let tokens_per_section = self.words_per_section() * 4 / 3;
        (self.max_output_tokens as usize / tokens_per_section.max(1)).max(1)
    }

    /// Derived page count for an actual word count.
    pub fn page_count(&self, word_count: usize) -> usize {
        let pages = word_count.div_ceil(WORDS_PER_PAGE);
        pages.max(self.page_floor())
    }
}
