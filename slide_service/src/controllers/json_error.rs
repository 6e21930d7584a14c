use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::header::ContentType,
    HttpRequest, HttpResponse,
};
use common::dtos::error_response::ErrorResponseDto;
use tracing::info;

/// Turns request bodies that are not JSON at all (syntax, content type, size) into `ValidationError`s
///
/// No single member is at fault, the field is `body`. Registered with `web::JsonConfig::error_handler`.
pub fn json_error_handler(error: JsonPayloadError, _request: &HttpRequest) -> actix_web::Error {
    info!(%error, "Rejected request body");

    let body = ErrorResponseDto::new("ValidationError", "Invalid request body")
        .with_detail("field", "body")
        .with_detail("error", error.to_string());

    let response = HttpResponse::BadRequest()
        .insert_header(ContentType::json())
        .json(body);

    InternalError::from_response(error, response).into()
}
