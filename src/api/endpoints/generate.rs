//! Generation endpoints.
//!
//! - `POST /api/generate` — run the full ebook pipeline
//! - `POST /api/generate/title` — title/subtitle suggestion only
//! - `POST /api/generate/cover` — render a cover image

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{
    ApiContext, CoverBody, CoverResponse, GenerateBody, GenerateResponse, TitleBody,
    TitleResponse,
};
use crate::cover::{cover_data_url, CoverStyle};
use crate::pipeline::{GenerationRequest, SizeClass};
use crate::store::persist_best_effort;

/// `POST /api/generate` — generate a complete ebook.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let size = SizeClass::parse_lenient(body.length.as_deref());
    let req = GenerationRequest {
        topic: body.topic,
        title: body.title,
        subtitle: body.subtitle,
        size,
        tone: body.tone,
        audience: body.audience,
        category: body.category,
    };
    let topic = req.topic.clone();

    let artifact = ctx.pipeline.generate(req).await?;

    if let Some(store) = &ctx.store {
        persist_best_effort(store.as_ref(), &topic, &artifact);
    }

    Ok(Json(GenerateResponse {
        title: artifact.title,
        content: artifact.content,
        pages: artifact.pages,
        word_count: artifact.word_count,
    }))
}

/// `POST /api/generate/title` — suggest a title and subtitle.
pub async fn title(
    State(ctx): State<ApiContext>,
    Json(body): Json<TitleBody>,
) -> Result<Json<TitleResponse>, ApiError> {
    if body.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic is required".into()));
    }

    let pair = ctx
        .pipeline
        .title(body.topic.trim(), body.tone.as_deref())
        .await;

    Ok(Json(TitleResponse {
        title: pair.title,
        subtitle: pair.subtitle,
    }))
}

/// `POST /api/generate/cover` — render a cover as an SVG data URL.
pub async fn cover(
    State(_ctx): State<ApiContext>,
    Json(body): Json<CoverBody>,
) -> Result<Json<CoverResponse>, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }

    let image_url = cover_data_url(
        body.title.trim(),
        body.subtitle.as_deref().map(str::trim),
        &CoverStyle::default(),
    );

    Ok(Json(CoverResponse { image_url }))
}
