//! Retrying operation runner
//!
//! Drives the endpoint client through the backoff policy until success or
//! retry budget exhaustion. Attempts are strictly sequential; each retry
//! resubmits the identical request (the operations are pure read queries, so
//! resubmission is idempotent by construction).

use crate::backoff::BackoffPolicy;
use crate::error::Result;
use crate::gemini::{GenerateClient, GenerateRequest};
use crate::interpret::{interpret, ExpectedShape, Payload};
use tracing::warn;

/// A fully built request plus the shape its response must take.
///
/// Immutable once built; one instance drives one attempt chain.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Request body resubmitted verbatim on every attempt
    pub body: GenerateRequest,
    /// Expected response shape
    pub shape: ExpectedShape,
}

impl OperationRequest {
    /// Bundle a request body with its expected response shape
    #[must_use]
    pub fn new(body: GenerateRequest, shape: ExpectedShape) -> Self {
        Self { body, shape }
    }
}

/// Run one attempt chain to a terminal outcome.
///
/// Transport and HTTP-status failures are retried with exponential backoff,
/// up to `policy.max_retries` retries after the initial attempt; the last
/// observed error surfaces on exhaustion. An HTTP success goes straight to
/// the interpreter and its outcome is returned as-is: malformed bodies and
/// schema mismatches are permanent, so they consume no retry budget.
pub async fn run(
    client: &dyn GenerateClient,
    request: &OperationRequest,
    policy: &BackoffPolicy,
) -> Result<Payload> {
    let mut attempt: u32 = 0;
    loop {
        match client.generate(request.body.clone()).await {
            Ok(raw_body) => return interpret(request.shape, &raw_body),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
