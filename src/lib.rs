//! Parsing and normalization of LLM prompt-evaluation responses.
//!
//! A judge model asked to score a prompt rarely returns clean JSON: it wraps
//! the result in markdown fences, buries it in prose, leaves trailing commas,
//! or gives up on JSON entirely and writes "综合评分：76/100". This crate
//! turns that output into a strictly validated [`types::EvaluationResponse`],
//! degrading through several strategies before giving up:
//!
//! 1. extract every plausible JSON candidate (fenced blocks, balanced
//!    bracket spans, the raw text itself);
//! 2. per candidate: best-effort repair, strict parse, and a bounded
//!    breadth-first search for the evaluation-shaped subtree;
//! 3. normalize heterogeneous score shapes into a canonical
//!    `{overall, dimensions}` record, sanitizing improvement lists and
//!    patch operations along the way;
//! 4. as a last resort, scan the raw text for a recognizable score phrase.
//!
//! Only when all of that fails does parsing error out, and the error carries
//! the input length rather than the model's text.
//!
//! ```
//! use promptscore::parse_evaluation_response;
//! use promptscore::types::{EvaluationMetadata, EvaluationType};
//!
//! let raw = r#"The result: {"evaluation": {"score": 92, "summary": "solid"}}"#;
//! let response = parse_evaluation_response(
//!     raw,
//!     EvaluationType::PromptOnly,
//!     EvaluationMetadata::default(),
//! )?;
//! assert_eq!(response.score.overall, 92);
//! assert_eq!(response.summary, "solid");
//! # Ok::<(), promptscore::EvalError>(())
//! ```
//!
//! The [`service`] module adds the orchestration layer above the engine:
//! request validation, template-context building, and streaming, with model
//! invocation and templating behind caller-implemented traits.

pub mod error;
pub mod parser;
pub mod service;
pub mod types;

pub use error::EvalError;
pub use parser::parse_evaluation_response;
pub use service::{
    EvaluationModeConfig, EvaluationRequest, EvaluationService, EvaluationStreamHandlers,
    ModelClient, ModelRegistry, TemplateSource,
};
pub use types::{
    EvaluationDimension, EvaluationMetadata, EvaluationResponse, EvaluationScore, EvaluationType,
    PatchOperation, PatchOperationType,
};
