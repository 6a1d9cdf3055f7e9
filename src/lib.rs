//! Veracity - resilient request orchestration for a Gemini-backed claim app
//!
//! This crate is the orchestration core behind three user-facing actions:
//! - Analyze: assess a claim's credibility (structured JSON response)
//! - Summarize: condense user-supplied text (plain response)
//! - Fact: fetch a trivia fact (plain response, no input)
//!
//! Layers, leaves first:
//! - Backoff: pure exponential retry-delay policy
//! - Gemini: single-shot `generateContent` client over reqwest
//! - Interpret: text-path extraction and structured-payload validation
//! - Runner: bounded sequential retry loop (transient failures only)
//! - Coordinator: per-action busy/result/error state with an enforced
//!   in-flight guard and an optional post-success hook

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backoff;
pub mod coordinator;
pub mod error;
pub mod gemini;
pub mod interpret;
pub mod runner;
pub mod util;

pub use backoff::{BackoffPolicy, BASE_DELAY_MS, MAX_RETRIES};
pub use coordinator::{Action, Coordinator, CoordinatorState, Coordinators, SuccessHook};
pub use error::{Error, Result};
pub use gemini::{
    GeminiClient, GeminiConfig, GenerateClient, GenerateRequest, GenerationConfig,
};
pub use interpret::{interpret, AnalysisResult, ExpectedShape, Payload};
pub use runner::{run, OperationRequest};
