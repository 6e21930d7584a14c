pub mod content_resolver;
pub mod generation_prompt;
pub mod template_content;
