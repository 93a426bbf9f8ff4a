use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::StreamExt;

use super::context::build_template_context;
use super::request::EvaluationRequest;
use super::traits::{ModelClient, ModelRegistry, PromptMessage, TemplateSource};
use crate::error::EvalError;
use crate::parser::parse_evaluation_response;
use crate::types::{EvaluationMetadata, EvaluationResponse};

/// Callbacks driving a streaming evaluation.
///
/// Exactly one of `on_complete` / `on_error` is invoked, after the token
/// stream ends.
pub struct EvaluationStreamHandlers {
    pub on_token: Box<dyn FnMut(&str) + Send>,
    pub on_complete: Box<dyn FnOnce(EvaluationResponse) + Send>,
    pub on_error: Box<dyn FnOnce(EvalError) + Send>,
}

/// Orchestrates a single evaluation: validates the request, renders the
/// template, invokes the model, and runs the parse engine over the output.
pub struct EvaluationService {
    model_client: Arc<dyn ModelClient>,
    model_registry: Arc<dyn ModelRegistry>,
    templates: Arc<dyn TemplateSource>,
}

impl EvaluationService {
    pub fn new(
        model_client: Arc<dyn ModelClient>,
        model_registry: Arc<dyn ModelRegistry>,
        templates: Arc<dyn TemplateSource>,
    ) -> Self {
        Self {
            model_client,
            model_registry,
            templates,
        }
    }

    /// Run a non-streaming evaluation.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvalError> {
        request.validate()?;
        self.ensure_model_exists(&request.evaluation_model_key)
            .await?;
        let messages = self.render_messages(request).await?;

        let started = Instant::now();
        let raw = self
            .model_client
            .send_message(&messages, &request.evaluation_model_key)
            .await?;

        parse_evaluation_response(
            &raw,
            request.eval_type,
            self.build_metadata(request, started),
        )
    }

    /// Run a streaming evaluation, forwarding each token to the handlers and
    /// parsing the accumulated text once the stream ends.
    pub async fn evaluate_stream(
        &self,
        request: &EvaluationRequest,
        mut handlers: EvaluationStreamHandlers,
    ) {
        if let Err(err) = request.validate() {
            (handlers.on_error)(err);
            return;
        }
        if let Err(err) = self
            .ensure_model_exists(&request.evaluation_model_key)
            .await
        {
            (handlers.on_error)(err);
            return;
        }
        let messages = match self.render_messages(request).await {
            Ok(messages) => messages,
            Err(err) => {
                (handlers.on_error)(err);
                return;
            }
        };

        let started = Instant::now();
        let mut stream = match self
            .model_client
            .send_message_stream(&messages, &request.evaluation_model_key)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                (handlers.on_error)(err);
                return;
            }
        };

        let mut full_content = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(token) => {
                    full_content.push_str(&token);
                    (handlers.on_token)(&token);
                }
                Err(err) => {
                    (handlers.on_error)(err);
                    return;
                }
            }
        }

        let result = parse_evaluation_response(
            &full_content,
            request.eval_type,
            self.build_metadata(request, started),
        );
        match result {
            Ok(response) => (handlers.on_complete)(response),
            Err(err) => (handlers.on_error)(err),
        }
    }

    async fn ensure_model_exists(&self, model_key: &str) -> Result<(), EvalError> {
        if self.model_registry.contains_model(model_key).await? {
            Ok(())
        } else {
            Err(EvalError::ModelNotFound(model_key.to_string()))
        }
    }

    async fn render_messages(
        &self,
        request: &EvaluationRequest,
    ) -> Result<Vec<PromptMessage>, EvalError> {
        let template_id = request.template_id();
        let context = build_template_context(request);
        let messages = self.templates.render(&template_id, &context).await?;
        if messages.is_empty() {
            return Err(EvalError::TemplateNotFound(template_id));
        }
        Ok(messages)
    }

    fn build_metadata(&self, request: &EvaluationRequest, started: Instant) -> EvaluationMetadata {
        EvaluationMetadata {
            model: Some(request.evaluation_model_key.clone()),
            timestamp: Some(Utc::now()),
            duration_ms: Some(started.elapsed().as_millis() as u64),
        }
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
