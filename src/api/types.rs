//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pipeline::EbookPipeline;
use crate::store::ArtifactStore;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub pipeline: Arc<EbookPipeline>,
    pub access: Arc<dyn AccessVerifier>,
    pub store: Option<Arc<dyn ArtifactStore>>,
}

impl ApiContext {
    pub fn new(pipeline: Arc<EbookPipeline>, access: Arc<dyn AccessVerifier>) -> Self {
        Self {
            pipeline,
            access,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }
}

// ═══════════════════════════════════════════════════════════
// Access control
// ═══════════════════════════════════════════════════════════

/// Outcome of an access check.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub authorized: bool,
    pub caller_id: Option<String>,
}

impl AccessDecision {
    pub fn allow(caller_id: impl Into<String>) -> Self {
        Self {
            authorized: true,
            caller_id: Some(caller_id.into()),
        }
    }

    pub fn deny() -> Self {
        Self {
            authorized: false,
            caller_id: None,
        }
    }
}

/// Decides whether a bearer credential may invoke generation routes.
pub trait AccessVerifier: Send + Sync {
    fn verify(&self, bearer: Option<&str>) -> AccessDecision;
}

/// Verifier backed by a static set of accepted tokens.
pub struct StaticTokenVerifier {
    tokens: Vec<String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

impl AccessVerifier for StaticTokenVerifier {
    fn verify(&self, bearer: Option<&str>) -> AccessDecision {
        match bearer {
            Some(token) if self.tokens.iter().any(|t| t == token) => {
                let prefix: String = token.chars().take(8).collect();
                AccessDecision::allow(format!("token-{prefix}"))
            }
            _ => AccessDecision::deny(),
        }
    }
}

/// Verifier that admits every caller. Used when no tokens are
/// configured, for local and development deployments.
pub struct AllowAllVerifier;

impl AccessVerifier for AllowAllVerifier {
    fn verify(&self, _bearer: Option<&str>) -> AccessDecision {
        AccessDecision::allow("anonymous")
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub topic: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub length: Option<String>,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub title: String,
    pub content: String,
    pub pages: usize,
    #[serde(rename = "wordCount")]
    pub word_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct TitleBody {
    pub topic: String,
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverBody {
    pub title: String,
    pub subtitle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoverResponse {
    pub image_url: String,
}
