use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info};

use crate::{
    configuration::ContentGeneratorSettings,
    domain::{
        entities::{
            citation::Citation,
            slide::{SlideContent, SlideContentDto},
        },
        services::generation_prompt::build_generation_prompt,
    },
    ports::content_generator::{ContentGenerator, ContentGeneratorError, GeneratedContent},
};

/// Asks an OpenAI-compatible HTTP endpoint for the slides
///
/// One attempt per presentation, no retry: the caller decides what to do on failure.
pub struct OpenAiContentGenerator {
    client: reqwest::Client,
    api_url: String,
    // Kept secret so it does not leak in logs
    api_key: Secret<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiContentGenerator {
    pub fn new(settings: &ContentGeneratorSettings) -> Result<Self, ContentGeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.to_owned(),
            api_key: settings.api_key.clone(),
            model: settings.model.to_owned(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    #[tracing::instrument(name = "Generating slides with the language model", skip(self))]
    async fn generate_slides(
        &self,
        topic: &str,
        num_slides: u8,
        include_citations: bool,
    ) -> Result<GeneratedContent, ContentGeneratorError> {
        let payload = json!({
            "model": self.model,
            "input": build_generation_prompt(topic, num_slides, include_citations),
            "temperature": self.temperature,
            "max_output_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentGeneratorError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: JsonValue = response.json().await?;
        let content = parse_answer(&body, num_slides, include_citations)?;

        info!(
            num_slides = content.slides.len(),
            num_citations = content.citations.as_ref().map_or(0, Vec::len),
            "Slides generated by the language model"
        );
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct SlidesAnswer {
    #[serde(default)]
    slides: Vec<SlideContentDto>,
    #[serde(default)]
    citations: Option<Vec<Citation>>,
}

/// Turns the body returned by the endpoint into validated slides
///
/// Both the chat completions and the responses API bodies are understood. The model may wrap
/// its JSON in prose: only the text between the first `{` and the last `}` is parsed.
fn parse_answer(
    body: &JsonValue,
    num_slides: u8,
    include_citations: bool,
) -> Result<GeneratedContent, ContentGeneratorError> {
    let text = answer_text(body).ok_or_else(|| {
        ContentGeneratorError::InvalidAnswer("no text found in the response body".into())
    })?;
    debug!(length = text.len(), "Received language model answer");

    let json_object = json_object(text).ok_or_else(|| {
        ContentGeneratorError::InvalidAnswer("no JSON object found in the answer".into())
    })?;

    let answer: SlidesAnswer = serde_json::from_str(json_object)
        .map_err(|error| ContentGeneratorError::InvalidAnswer(error.to_string()))?;

    let required = usize::from(num_slides);
    if answer.slides.len() < required {
        return Err(ContentGeneratorError::NotEnoughSlides {
            provided: answer.slides.len(),
            required,
        });
    }

    let slides = answer
        .slides
        .into_iter()
        .take(required)
        .map(SlideContent::parse)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| ContentGeneratorError::InvalidAnswer(error.to_string()))?;

    let citations = answer
        .citations
        .filter(|citations| include_citations && !citations.is_empty());

    Ok(GeneratedContent { slides, citations })
}

fn answer_text(body: &JsonValue) -> Option<&str> {
    if let Some(content) = body["choices"][0]["message"]["content"].as_str() {
        return Some(content);
    }

    // Responses API: the first output item carrying text, reasoning items have none
    body["output"]
        .as_array()?
        .iter()
        .find_map(|item| item["content"][0]["text"].as_str())
}

fn json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (start < end).then(|| &text[start..=end])
}
