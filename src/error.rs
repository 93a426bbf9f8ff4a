use thiserror::Error;

/// Error types produced while running or parsing an evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The evaluation request was structurally invalid
    #[error("Invalid evaluation request: {0}")]
    InvalidRequest(String),
    /// The requested evaluation model is not registered
    #[error("Evaluation model not found: {0}")]
    ModelNotFound(String),
    /// The evaluation template could not be resolved
    #[error("Evaluation template not found: {0}")]
    TemplateNotFound(String),
    /// The model invocation failed
    #[error("Evaluation execution failed: {0}")]
    Execution(String),
    /// The model output could not be parsed into an evaluation result
    #[error("Failed to parse evaluation result: {0}")]
    Parse(String),
}

impl EvalError {
    /// Stable, language-neutral error code for the UI layer.
    ///
    /// UIs translate these instead of showing raw error messages, so model
    /// output never leaks into user-facing text.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::InvalidRequest(_) => "error.evaluation.validation",
            EvalError::ModelNotFound(_) => "error.evaluation.model_not_found",
            EvalError::TemplateNotFound(_) => "error.evaluation.template_not_found",
            EvalError::Execution(_) => "error.evaluation.execution",
            EvalError::Parse(_) => "error.evaluation.parse",
        }
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Parse(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
