//! The pipeline orchestrator: policy → outline → sections → assembly,
//! with degradation to the fallback artifact.
//!
//! One request's outline and section results live entirely inside one
//! `generate` call; nothing is shared across requests. Section and
//! batch generation is sequential: later prompts reference earlier
//! section titles.

use tracing::Instrument;

use crate::llm::CompletionClient;

use super::assemble::assemble;
use super::fallback::fallback_artifact;
use super::outline::plan_outline;
use super::policy::LengthConfig;
use super::sections::generate_sections;
use super::title::{fallback_title, generate_title, TitlePair};
use super::types::{Artifact, GenerationRequest};
use super::PipelineError;

/// Assembled documents shorter than this are replaced by the fallback
/// artifact rather than returned as a too-short result. The scaffolding
/// alone (front matter, contents, headings) runs near a thousand
/// characters, so the threshold sits above it.
const MIN_VIABLE_CHARS: usize = 1_500;

/// Orchestrates one document generation end to end.
///
/// `llm` is `None` when no upstream credential is configured; every
/// request then short-circuits to the fallback artifact and no network
/// call is ever attempted.
pub struct EbookPipeline {
    llm: Option<Box<dyn CompletionClient>>,
}

impl EbookPipeline {
    pub fn new(llm: Option<Box<dyn CompletionClient>>) -> Self {
        Self { llm }
    }

    pub fn has_upstream(&self) -> bool {
        self.llm.is_some()
    }

    /// Run the full pipeline for one request.
    ///
    /// Errors cross this boundary in exactly two shapes: a validation
    /// failure (the caller must resubmit) or an exhausted upstream
    /// failure. Parse and size problems are absorbed into degraded but
    /// valid artifacts.
    pub async fn generate(&self, req: GenerationRequest) -> Result<Artifact, PipelineError> {
        req.validate()?;
        let req = req.sanitized();
        let config = req.size.config();

        let span = tracing::info_span!(
            "generate_ebook",
            topic = %req.topic,
            size = %req.size,
            sections = config.section_count,
        );
        self.run(req, config).instrument(span).await
    }

    async fn run(
        &self,
        req: GenerationRequest,
        config: &'static LengthConfig,
    ) -> Result<Artifact, PipelineError> {
        let Some(llm) = self.llm.as_deref() else {
            tracing::info!("No upstream credential configured, serving fallback artifact");
            return Ok(fallback_artifact(req.display_title(), &req.topic));
        };

        // Resolve the title before planning so the outline and section
        // prompts can reference it.
        let mut req = req;
        if req.title.is_none() {
            let pair = generate_title(llm, &req.topic, req.tone.as_deref()).await;
            req.title = Some(pair.title);
            if req.subtitle.is_none() {
                req.subtitle = Some(pair.subtitle);
            }
        }

        let outline = plan_outline(llm, &req, config).await;
        tracing::info!(sections = outline.len(), "Outline planned");

        let sections = generate_sections(llm, &req, &outline, config).await?;

        let artifact = assemble(&req, &outline, &sections, config);
        tracing::info!(
            words = artifact.word_count,
            pages = artifact.pages,
            chars = artifact.content.len(),
            "Document assembled"
        );

        if artifact.content.len() < MIN_VIABLE_CHARS {
            tracing::warn!(
                chars = artifact.content.len(),
                "Assembled document below viability threshold, serving fallback artifact"
            );
            return Ok(fallback_artifact(&artifact.title, &req.topic));
        }

        Ok(artifact)
    }

    /// Generate a standalone title/subtitle pair. Never fails; without
    /// an upstream client the deterministic fallback pair is returned.
    pub async fn title(&self, topic: &str, tone: Option<&str>) -> TitlePair {
        match self.llm.as_deref() {
            Some(llm) => generate_title(llm, topic, tone).await,
            None => fallback_title(topic),
        }
    }
}
