use actix_web::{web, HttpResponse};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::configuration::ApplicationSettings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

/// Also served on `/`
#[tracing::instrument(name = "Health check handler", skip(settings))]
pub async fn health_check(settings: web::Data<ApplicationSettings>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponseDto {
        status: "healthy".to_string(),
        version: settings.version.to_owned(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
