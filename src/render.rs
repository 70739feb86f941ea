// src/render.rs
use serde::Serialize;
use std::fmt;

use crate::errors::WaznError;
use crate::models::{AnalysisResponse, Candidate, Outcome, Score};

pub const EMPTY_INPUT_MESSAGE: &str = "اكتب بيتاً أولاً";
pub const SERVICE_ERROR_FALLBACK: &str = "حدث خطأ غير متوقع";
pub const CONNECTION_ERROR_PREFIX: &str = "خطأ في الاتصال: ";
pub const UNMATCHED_HEADLINE: &str = "غير مطابق";
const NOT_AVAILABLE: &str = "غير متوفر";

/// Content of the result panel. Each render replaces it entirely.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Validation {
        message: String,
    },
    ServiceError {
        message: String,
        code: Option<String>,
    },
    Unmatched {
        scores: Vec<Score>,
        message: Option<String>,
        candidates: Vec<Candidate>,
        supported: Vec<String>,
    },
    Matched {
        weight: Option<String>,
        taf3eelat: Option<String>,
        scores: Vec<Score>,
        closest_example: Option<String>,
        method: Option<String>,
    },
    ConnectionError {
        detail: String,
    },
}

impl View {
    /// Outcome this view presents, if it came from a decoded response.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            View::ServiceError { .. } => Some(Outcome::ServiceError),
            View::Unmatched { .. } => Some(Outcome::Unmatched),
            View::Matched { .. } => Some(Outcome::Matched),
            View::Validation { .. } | View::ConnectionError { .. } => None,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, View::ConnectionError { .. })
    }
}

/// Maps a decoded response to its view. Precedence: `ok == false`, then
/// `matched == false`, then matched.
pub fn render(response: &AnalysisResponse) -> View {
    match response.outcome() {
        Outcome::ServiceError => View::ServiceError {
            message: non_empty(&response.message)
                .unwrap_or_else(|| SERVICE_ERROR_FALLBACK.to_string()),
            code: non_empty(&response.error).or_else(|| non_empty(&response.reason)),
        },
        Outcome::Unmatched => View::Unmatched {
            scores: response.scores(),
            message: non_empty(&response.message),
            candidates: response.candidates.clone(),
            supported: response.supported.clone(),
        },
        Outcome::Matched => View::Matched {
            weight: non_empty(&response.weight),
            taf3eelat: non_empty(&response.taf3eelat),
            scores: response.scores(),
            closest_example: non_empty(&response.closest_example),
            method: non_empty(&response.method),
        },
    }
}

/// View for a failed round trip: unreachable host, bad status, non-JSON body.
pub fn render_transport_error(err: &WaznError) -> View {
    View::ConnectionError {
        detail: err.to_string(),
    }
}

pub fn validation_view() -> View {
    View::Validation {
        message: EMPTY_INPUT_MESSAGE.to_string(),
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn write_scores(f: &mut fmt::Formatter<'_>, scores: &[Score]) -> fmt::Result {
    if scores.is_empty() {
        return writeln!(f, "الدرجة: {}", NOT_AVAILABLE);
    }
    for score in scores {
        writeln!(f, "{}: {}", score.field.label(), score.value)?;
    }
    Ok(())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Validation { message } => writeln!(f, "{}", message),
            View::ServiceError { message, code } => {
                writeln!(f, "❌ {}", message)?;
                if let Some(code) = code {
                    writeln!(f, "({})", code)?;
                }
                Ok(())
            }
            View::Unmatched {
                scores,
                message,
                candidates,
                supported,
            } => {
                writeln!(f, "⚠️  {}", UNMATCHED_HEADLINE)?;
                write_scores(f, scores)?;
                if let Some(message) = message {
                    writeln!(f, "{}", message)?;
                }
                if !candidates.is_empty() {
                    writeln!(f, "أقرب الأوزان:")?;
                    for candidate in candidates {
                        match &candidate.confidence {
                            Some(c) => writeln!(f, "  • {} ({})", candidate.name, c)?,
                            None => writeln!(f, "  • {}", candidate.name)?,
                        }
                    }
                }
                if !supported.is_empty() {
                    writeln!(f, "الأوزان المدعومة: {}", supported.join("، "))?;
                }
                Ok(())
            }
            View::Matched {
                weight,
                taf3eelat,
                scores,
                closest_example,
                method,
            } => {
                writeln!(f, "✅ الوزن: {}", weight.as_deref().unwrap_or(NOT_AVAILABLE))?;
                writeln!(f, "التفعيلات: {}", taf3eelat.as_deref().unwrap_or(NOT_AVAILABLE))?;
                write_scores(f, scores)?;
                writeln!(
                    f,
                    "أقرب مثال: {}",
                    closest_example.as_deref().unwrap_or(NOT_AVAILABLE)
                )?;
                if let Some(method) = method {
                    writeln!(f, "طريقة المطابقة: {}", method)?;
                }
                Ok(())
            }
            View::ConnectionError { detail } => {
                writeln!(f, "{}{}", CONNECTION_ERROR_PREFIX, detail)
            }
        }
    }
}
