//! Response interpretation
//!
//! Extracts the primary text field from a raw `generateContent` response and,
//! for structured operations, parses and validates it as an
//! [`AnalysisResult`]. Interpretation failures are permanent for a given
//! response and are never retried.

use crate::error::{Error, Result};
use crate::gemini::Content;
use serde::{Deserialize, Serialize};

/// Shape the response payload is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// The text field holds a JSON-encoded [`AnalysisResult`]
    StructuredJson,
    /// The text field holds plain prose
    PlainText,
}

/// Credibility assessment for one claim.
///
/// Both fields are required and there are no optional fields. The score is
/// nominally in [0, 100] but the range is advisory: out-of-range values are
/// passed through unchanged rather than clamped or rejected, since the
/// endpoint never promised the range as a hard contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    /// Credibility score, nominally 0 (implausible) to 100 (credible)
    pub credibility_score: f64,
    /// Short prose explanation of the score
    pub breakdown: String,
}

/// Successful operation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    /// Plain prose (summarize / fact)
    Text(String),
    /// Structured credibility assessment (analyze)
    Analysis(AnalysisResult),
}

/// Response envelope, reduced to the path this crate consumes:
/// `candidates[0].content.parts[0].text`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Interpret a raw response body against the expected shape.
///
/// An unparseable envelope or an absent text field yields
/// [`Error::MalformedResponse`]. For [`ExpectedShape::StructuredJson`], the
/// text is parsed again as JSON; any parse or shape failure (missing field,
/// wrong type, unknown extra field, non-finite score, empty breakdown)
/// yields [`Error::SchemaMismatch`].
pub fn interpret(shape: ExpectedShape, raw_body: &str) -> Result<Payload> {
    let envelope: GenerateResponse =
        serde_json::from_str(raw_body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| {
            Error::MalformedResponse("missing candidates[0].content.parts[0].text".to_string())
        })?;

    match shape {
        ExpectedShape::PlainText => Ok(Payload::Text(text)),
        ExpectedShape::StructuredJson => {
            let analysis: AnalysisResult =
                serde_json::from_str(&text).map_err(|e| Error::SchemaMismatch(e.to_string()))?;

            // JSON cannot encode NaN, but an overflowing literal parses to infinity
            if !analysis.credibility_score.is_finite() {
                return Err(Error::SchemaMismatch(
                    "credibilityScore is not a finite number".to_string(),
                ));
            }
            if analysis.breakdown.trim().is_empty() {
                return Err(Error::SchemaMismatch("breakdown is empty".to_string()));
            }
            Ok(Payload::Analysis(analysis))
        }
    }
}
