use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::dtos::error_response::ErrorResponseDto;
use common::helper::error_chain_fmt;
use tracing::info;

use super::parse_presentation_id;
use crate::{
    domain::entities::presentation::PPTX_CONTENT_TYPE,
    ports::presentation_store::{PresentationStore, PresentationStoreError},
};

/// Sends a stored presentation as an attachment
///
/// A concurrent deletion can make a download fail with a 404 even though the id was known
/// when the request arrived.
#[tracing::instrument(name = "Download presentation", skip(store))]
pub async fn download_presentation(
    store: web::Data<dyn PresentationStore>,
    presentation_id: web::Path<String>,
) -> Result<HttpResponse, DownloadPresentationError> {
    let presentation_id = presentation_id.into_inner();
    let id = parse_presentation_id(&presentation_id)
        .ok_or_else(|| DownloadPresentationError::NotFound(presentation_id.clone()))?;

    let (record, artifact) = store.get(id).await.map_err(|error| match error {
        PresentationStoreError::NotFound(_) => {
            DownloadPresentationError::NotFound(presentation_id.clone())
        }
        _ => error.into(),
    })?;

    info!(%presentation_id, size = artifact.len(), "Serving presentation");

    Ok(HttpResponse::Ok()
        .content_type(PPTX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(record.download_file_name())],
        })
        .body(artifact.into_bytes()))
}

#[derive(thiserror::Error)]
pub enum DownloadPresentationError {
    #[error("Presentation not found")]
    NotFound(String),
    #[error(transparent)]
    StoreError(#[from] PresentationStoreError),
}

impl std::fmt::Debug for DownloadPresentationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for DownloadPresentationError {
    fn status_code(&self) -> StatusCode {
        match self {
            DownloadPresentationError::NotFound(_) => StatusCode::NOT_FOUND,
            DownloadPresentationError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[tracing::instrument(name = "Response error from download_presentation controller", skip(self), fields(error = %self))]
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let body = match self {
            DownloadPresentationError::NotFound(presentation_id) => {
                ErrorResponseDto::new("NotFound", self.to_string())
                    .with_detail("presentation_id", presentation_id.as_str())
            }
            DownloadPresentationError::StoreError(_) => {
                ErrorResponseDto::new("InternalServerError", "Failed to download presentation")
                    .with_detail("error", self.to_string())
            }
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }
}
