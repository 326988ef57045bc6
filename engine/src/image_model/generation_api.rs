//! Wire types of the multimodal-generation endpoint, text-to-image flavour.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub input: GenerationInput<'a>,
    pub parameters: Parameters,
}

#[derive(Debug, Serialize)]
pub struct GenerationInput<'a> {
    pub messages: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InputMessage<'a> {
    pub role: &'static str,
    pub content: Vec<TextContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextContent<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameters {
    pub prompt_extend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    pub size: String,
}

impl<'a> GenerationRequest<'a> {
    /// A single user message carrying the prompt.
    pub fn text_prompt(model: &'a str, prompt: &'a str, parameters: Parameters) -> Self {
        Self {
            model,
            input: GenerationInput {
                messages: vec![InputMessage {
                    role: "user",
                    content: vec![TextContent { text: prompt }],
                }],
            },
            parameters,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub output: Option<Output>,
}

#[derive(Debug, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<OutputMessage>,
}

#[derive(Debug, Deserialize)]
pub struct OutputMessage {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub image: Option<String>,
}

impl GenerationResponse {
    /// `output.choices[0].message.content[*].image`, first hit.
    pub fn first_image_url(&self) -> Option<&str> {
        self.output
            .as_ref()?
            .choices
            .first()?
            .message
            .as_ref()?
            .content
            .iter()
            .find_map(|item| item.image.as_deref())
    }
}
