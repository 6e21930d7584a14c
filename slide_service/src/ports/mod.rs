pub mod content_generator;
pub mod presentation_renderer;
pub mod presentation_store;
