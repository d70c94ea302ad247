//! OpenAI-backed script writer and panel renderer.
//!
//! Chat completions turn a story into script text; image generations render
//! one panel per request. The generation endpoint answers with a URL, which
//! is fetched and decoded into an [`RgbaImage`]. Requests are blocking and
//! not retried: a failure aborts the run.

use super::backend::{PanelRenderer, RenderError, ScriptWriter};
use crate::config::ServiceConfig;
use image::RgbaImage;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "\
You turn short stories into comic strip breakdowns. Answer in exactly this format:

Description: One paragraph fixing the art style, setting and every character's look (clothing colours included) so all panels stay consistent.
Panels:
Panel Description 1: <what the image for panel 1 shows>
Caption 1: <caption printed under panel 1>
Panel Description 2: <what the image for panel 2 shows>
Caption 2: <caption printed under panel 2>
... and so on for every panel.";

/// OpenAI chat and image client
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    image_model: String,
    image_size: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, service: &ServiceConfig) -> Result<Self, RenderError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url: service.base_url.trim_end_matches('/').to_string(),
            chat_model: service.chat_model.clone(),
            image_model: service.image_model.clone(),
            image_size: service.image_size.clone(),
        })
    }

    /// Build a client reading the API key from `service.api_key_env`.
    pub fn from_env(service: &ServiceConfig) -> Result<Self, RenderError> {
        let api_key = std::env::var(&service.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RenderError::MissingApiKey(service.api_key_env.clone()))?;
        Self::new(api_key, service)
    }

    fn post(&self, endpoint: &str, body: &Value) -> Result<Value, RenderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RenderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .map_err(|e| RenderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    fn fetch_image(&self, url: &str) -> Result<RgbaImage, RenderError> {
        tracing::debug!(%url, "downloading panel image");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Api {
                status: status.as_u16(),
                body: format!("image download failed: {}", url),
            });
        }
        let bytes = response.bytes()?;
        image::load_from_memory(&bytes)
            .map(|img| img.to_rgba8())
            .map_err(|e| RenderError::Decode(e.to_string()))
    }
}

impl ScriptWriter for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.chat_model))]
    fn write_script(&self, story: &str) -> Result<String, RenderError> {
        let body = chat_request(&self.chat_model, story);
        let response = self.post("chat/completions", &body)?;
        parse_chat_response(response)
    }
}

impl PanelRenderer for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.image_model))]
    fn render(&self, style: &str, description: &str) -> Result<RgbaImage, RenderError> {
        let body = image_request(&self.image_model, &self.image_size, style, description);
        let response = self.post("images/generations", &body)?;
        let url = parse_image_response(response)?;
        self.fetch_image(&url)
    }

    fn identity(&self) -> String {
        format!("openai:{}:{}", self.image_model, self.image_size)
    }
}

// =========================================================================
// Request bodies
// =========================================================================

fn user_prompt(story: &str) -> String {
    format!(
        "Break the following short story into a comic strip. Make the descriptions \
         detailed enough to draw consistently, including clothing colours. In each \
         panel description, name the characters who appear and the ones who do not. \
         Do not put quotation marks around captions and keep each caption under 100 \
         characters. The story: {}",
        story
    )
}

/// Image prompt: shared style, a no-text instruction, then the scene.
pub fn image_prompt(style: &str, description: &str) -> String {
    format!(
        "{} Do not include text in the image. The image shows: {}",
        style, description
    )
}

fn chat_request(model: &str, story: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt(story) },
        ],
    })
}

fn image_request(model: &str, size: &str, style: &str, description: &str) -> Value {
    json!({
        "model": model,
        "prompt": image_prompt(style, description),
        "n": 1,
        "size": size,
        "response_format": "url",
    })
}

// =========================================================================
// Response parsing
// =========================================================================

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

fn parse_chat_response(value: Value) -> Result<String, RenderError> {
    let response: ChatResponse = serde_json::from_value(value)
        .map_err(|e| RenderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| RenderError::InvalidResponse("No choices in response".to_string()))
}

fn parse_image_response(value: Value) -> Result<String, RenderError> {
    let response: ImageResponse = serde_json::from_value(value)
        .map_err(|e| RenderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.url)
        .ok_or_else(|| RenderError::InvalidResponse("No image URL in response".to_string()))
}
