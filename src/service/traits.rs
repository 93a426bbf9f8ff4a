use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use super::context::TemplateContext;
use crate::error::EvalError;

/// Role of a rendered prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

/// A prompt message rendered from an evaluation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }
}

/// Stream of response tokens produced by a model client.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, EvalError>> + Send>>;

/// Client for the external text-generation model.
///
/// The library performs no network I/O itself; callers plug in whatever
/// transport they use.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the rendered messages and return the model's full text output.
    async fn send_message(
        &self,
        messages: &[PromptMessage],
        model_key: &str,
    ) -> Result<String, EvalError>;

    /// Send the rendered messages and return the model's output as a token
    /// stream.
    async fn send_message_stream(
        &self,
        messages: &[PromptMessage],
        model_key: &str,
    ) -> Result<TokenStream, EvalError>;
}

/// Registry of configured evaluation models.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Whether `model_key` refers to a configured model.
    async fn contains_model(&self, model_key: &str) -> Result<bool, EvalError>;
}

/// Source of rendered evaluation templates.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Render the template with the given id against the context.
    ///
    /// Implementations should fail with [`EvalError::TemplateNotFound`] when
    /// no template exists for the id.
    async fn render(
        &self,
        template_id: &str,
        context: &TemplateContext,
    ) -> Result<Vec<PromptMessage>, EvalError>;
}
