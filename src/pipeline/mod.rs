//! The multi-stage generation pipeline: length policy, outline
//! planning, section generation, assembly, and the orchestrator that
//! sequences them.

pub mod assemble;
pub mod fallback;
pub mod orchestrator;
pub mod outline;
pub mod policy;
pub mod prompts;
pub mod sections;
pub mod title;
pub mod types;

pub use orchestrator::EbookPipeline;
pub use policy::{LengthConfig, SizeClass, WORDS_PER_PAGE};
pub use types::{Artifact, GenerationRequest, OutlineEntry, SectionResult};

use crate::llm::LlmError;

/// Errors that cross the pipeline boundary.
///
/// Everything else — malformed model output, thin content — is absorbed
/// into a degraded but valid artifact and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The request itself is unusable; the caller must resubmit.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The upstream provider failed after retries were exhausted.
    #[error(transparent)]
    Upstream(#[from] LlmError),
}
