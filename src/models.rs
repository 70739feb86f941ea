// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::{Result, WaznError};

/// Body of `POST /api/analyze`. Always holds trimmed, non-empty text.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    text: String,
}

impl AnalysisRequest {
    /// Trims `text` and rejects it when nothing is left.
    pub fn new(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WaznError::EmptyInput);
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A score as the service sent it. Numbers keep their JSON spelling.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Number(n) => write!(f, "{}", n),
            ScoreValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Which field name a score arrived under. The two service variants use
/// different names and the values are not assumed to be comparable.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Similarity,
    Confidence,
}

impl ScoreField {
    pub fn key(&self) -> &'static str {
        match self {
            ScoreField::Similarity => "similarity",
            ScoreField::Confidence => "confidence",
        }
    }

    /// Label shown next to the value in a rendered view.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreField::Similarity => "نسبة التشابه",
            ScoreField::Confidence => "الثقة",
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Score {
    pub field: ScoreField,
    pub value: ScoreValue,
}

/// A near-miss meter reported by services that explain unmatched results.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub confidence: Option<ScoreValue>,
}

/// Decoded response of the analysis service.
///
/// `ok` is required; everything else is optional because the service only
/// sends the fields relevant to the outcome. Unknown fields are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AnalysisResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taf3eelat: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<ScoreValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ScoreValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_example: Option<String>,

    /// How the match was found, e.g. `exact_match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Machine-readable error code, e.g. `no_examples`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Older services report `{"ok": false, "reason": "empty"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,

    /// Meters the service knows, sent to explain an unmatched line.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub supported: Vec<String>,
}

/// Lists may arrive as `null`; read that the same as a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Classification of a response, in render precedence order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ServiceError,
    Unmatched,
    Matched,
}

impl AnalysisResponse {
    pub fn is_matched(&self) -> bool {
        self.ok && self.matched.unwrap_or(false)
    }

    pub fn outcome(&self) -> Outcome {
        if !self.ok {
            Outcome::ServiceError
        } else if self.is_matched() {
            Outcome::Matched
        } else {
            Outcome::Unmatched
        }
    }

    /// Every score carried by the response, each under its own field name.
    pub fn scores(&self) -> Vec<Score> {
        let mut scores = Vec::new();
        if let Some(value) = &self.similarity {
            scores.push(Score {
                field: ScoreField::Similarity,
                value: value.clone(),
            });
        }
        if let Some(value) = &self.confidence {
            scores.push(Score {
                field: ScoreField::Confidence,
                value: value.clone(),
            });
        }
        scores
    }
}
