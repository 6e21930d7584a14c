pub mod aspect_ratio;
pub mod citation;
pub mod generate_request;
pub mod hex_color;
pub mod json_fields;
pub mod presentation;
pub mod slide;
pub mod theme;
pub mod validation_error;
