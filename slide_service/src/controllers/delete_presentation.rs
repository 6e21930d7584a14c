use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::dtos::error_response::ErrorResponseDto;
use common::helper::error_chain_fmt;
use serde_json::json;
use tracing::info;

use super::parse_presentation_id;
use crate::ports::presentation_store::{PresentationStore, PresentationStoreError};

#[tracing::instrument(name = "Delete presentation", skip(store))]
pub async fn delete_presentation(
    store: web::Data<dyn PresentationStore>,
    presentation_id: web::Path<String>,
) -> Result<HttpResponse, DeletePresentationError> {
    let presentation_id = presentation_id.into_inner();
    let id = parse_presentation_id(&presentation_id)
        .ok_or_else(|| DeletePresentationError::NotFound(presentation_id.clone()))?;

    store.delete(id).await.map_err(|error| match error {
        PresentationStoreError::NotFound(_) => {
            DeletePresentationError::NotFound(presentation_id.clone())
        }
        _ => error.into(),
    })?;

    info!(%presentation_id, "Deleted presentation");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Presentation deleted successfully",
        "presentation_id": presentation_id,
    })))
}

#[derive(thiserror::Error)]
pub enum DeletePresentationError {
    #[error("Presentation not found")]
    NotFound(String),
    #[error(transparent)]
    StoreError(#[from] PresentationStoreError),
}

impl std::fmt::Debug for DeletePresentationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for DeletePresentationError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeletePresentationError::NotFound(_) => StatusCode::NOT_FOUND,
            DeletePresentationError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[tracing::instrument(name = "Response error from delete_presentation controller", skip(self), fields(error = %self))]
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let body = match self {
            DeletePresentationError::NotFound(presentation_id) => {
                ErrorResponseDto::new("NotFound", self.to_string())
                    .with_detail("presentation_id", presentation_id.as_str())
            }
            DeletePresentationError::StoreError(_) => {
                ErrorResponseDto::new("InternalServerError", "Failed to delete presentation")
                    .with_detail("error", self.to_string())
            }
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }
}
