pub mod delete_presentation;
pub mod download_presentation;
pub mod generate_presentation;
pub mod json_error;

use uuid::Uuid;

/// Identifiers are UUIDs: anything else cannot name a stored presentation
fn parse_presentation_id(presentation_id: &str) -> Option<Uuid> {
    Uuid::parse_str(presentation_id).ok()
}
