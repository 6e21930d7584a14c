use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use common::dtos::error_response::ErrorResponseDto;
use common::helper::error_chain_fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            citation::Citation,
            generate_request::{GenerateRequest, GenerateRequestBody},
            slide::SlideContent,
            validation_error::ValidationError,
        },
        services::content_resolver::ContentResolver,
    },
    ports::{
        presentation_renderer::{PresentationRenderer, RenderError},
        presentation_store::{PresentationStore, PresentationStoreError},
    },
};

/// Validates the request, resolves the slides, renders and stores the presentation
#[tracing::instrument(
    name = "Generate presentation",
    skip(resolver, renderer, store, body)
)]
pub async fn generate_presentation(
    resolver: web::Data<ContentResolver>,
    renderer: web::Data<dyn PresentationRenderer>,
    store: web::Data<dyn PresentationStore>,
    body: web::Json<JsonValue>,
) -> Result<HttpResponse, GenerateError> {
    let started_at = Instant::now();

    // Read member by member so that a wrongly typed value is reported with its field
    let request =
        GenerateRequestBody::try_from(body.into_inner()).and_then(GenerateRequest::parse)?;
    info!(
        topic = %request.topic,
        num_slides = request.slide_count(),
        custom_content = request.custom_content.is_some(),
        "Generating presentation"
    );

    let content = resolver.resolve(&request).await;

    // Rendering is CPU-bound, it must not block the worker
    let slides = content.slides.clone();
    let citations = content.citations.clone();
    let theme = request.theme.clone();
    let aspect_ratio = request.aspect_ratio;
    let artifact = tokio::task::spawn_blocking(move || {
        renderer.render(&slides, citations.as_deref(), &theme, aspect_ratio)
    })
    .await
    .context("Failed to join the rendering task")??;

    let record = store.create(&artifact).await?;

    let generation_time_seconds = (started_at.elapsed().as_secs_f64() * 100.0).round() / 100.0;
    info!(
        presentation_id = %record.id,
        generation_time_seconds,
        "Presentation generated"
    );

    Ok(HttpResponse::Ok().json(GenerateResponseDto {
        presentation_id: record.id,
        topic: request.topic,
        num_slides: content.slides.len(),
        slides: content.slides,
        citations: content.citations,
        file_path: record.file_path.display().to_string(),
        generation_time_seconds,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponseDto {
    pub presentation_id: Uuid,
    pub topic: String,
    /// Number of content slides, a references slide is not counted
    pub num_slides: usize,
    pub slides: Vec<SlideContent>,
    pub citations: Option<Vec<Citation>>,
    pub file_path: String,
    /// Rounded to the hundredth of a second
    pub generation_time_seconds: f64,
}

#[derive(thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidRequest(#[from] ValidationError),
    #[error("Failed to render the presentation: {0}")]
    RenderError(#[from] RenderError),
    #[error("Failed to store the presentation: {0}")]
    StoreError(#[from] PresentationStoreError),
    #[error(transparent)]
    InternalError(#[from] anyhow::Error),
}

impl std::fmt::Debug for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GenerateError::RenderError(_)
            | GenerateError::StoreError(_)
            | GenerateError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[tracing::instrument(name = "Response error from generate_presentation controller", skip(self), fields(error = %self))]
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let body = match self {
            GenerateError::InvalidRequest(error) => {
                ErrorResponseDto::new("ValidationError", self.to_string())
                    .with_details(error.details_with_field())
            }
            _ => ErrorResponseDto::new("InternalServerError", "Failed to generate presentation")
                .with_detail("error", self.to_string()),
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }
}
