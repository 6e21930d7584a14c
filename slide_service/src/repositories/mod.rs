pub mod openai_content_generator;
pub mod presentation_file_repository;
