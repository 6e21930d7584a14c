pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert presentation designer. Create engaging, well-structured presentation content.";

const EXPECTED_JSON_SHAPE: &str = r#"{
  "slides": [
    {"layout": "title", "title": "Main Title", "content": "Subtitle or tagline"},
    {"layout": "bullet_points", "title": "Key Points", "bullet_points": ["Point 1", "Point 2", "Point 3"]},
    {"layout": "two_column", "title": "Comparison", "left_column": "Left content", "right_column": "Right content"},
    {"layout": "content_with_image", "title": "Visual Section", "content": "Descriptive text", "image_description": "Description of relevant image"}
  ],
  "citations": [
    {"source": "Source name", "title": "Article title", "date": "2024"}
  ]
}"#;

/// Builds the whole text sent to the language model for one presentation
pub fn build_generation_prompt(topic: &str, num_slides: u8, include_citations: bool) -> String {
    let citations_requirement = if include_citations {
        "\n- Include 2-3 source citations in the \"citations\" array."
    } else {
        ""
    };

    format!(
        "{SYSTEM_INSTRUCTION}

Create a {num_slides}-slide presentation about: {topic}

Requirements:
- Slide 1 must be a title slide with a catchy title and subtitle
- Use a variety of layouts: bullet_points, two_column, and content_with_image
- For bullet_points slides: provide exactly 3-5 bullet points
- For two_column slides: provide content for left and right columns
- For content_with_image slides: provide content text and image description
- Make content engaging, informative, and well-structured{citations_requirement}

Return the response in the following JSON format:
{EXPECTED_JSON_SHAPE}

Ensure valid JSON format."
    )
}
