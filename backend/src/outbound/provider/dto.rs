//! Wire DTOs for the OpenAI-compatible chat-completion endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequestDto<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessageDto<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessageDto<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponseDto {
    pub choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceDto {
    pub message: ChatChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessageDto {
    pub content: String,
}

impl ChatCompletionResponseDto {
    /// Text payload of the first choice, if the provider returned one.
    pub(crate) fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}
