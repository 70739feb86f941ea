// src/runner.rs
use crate::errors::Result;
use crate::models::{AnalysisRequest, AnalysisResponse, Outcome};
use crate::render::{self, View};
use crate::service::AnalysisService;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

/// Requests a batch keeps open at once unless told otherwise.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// One completed round trip.
#[derive(Debug, Serialize, Clone)]
pub struct Analysis {
    pub id: Uuid,
    pub text: String,
    pub response: AnalysisResponse,
    pub timestamp: String,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize, Clone)]
pub struct BatchEntry {
    pub id: Uuid,
    pub line: String,
    pub view: View,
    pub latency_ms: Option<u64>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub service_errors: usize,
    pub transport_errors: usize,
    pub average_latency_ms: u64,
    pub total_latency_ms: u64,
    pub entries: Vec<BatchEntry>,
}

/// Submit a single line and time the round trip.
pub async fn analyze_line<S: AnalysisService>(service: &S, text: &str) -> Result<Analysis> {
    let request = AnalysisRequest::new(text)?;
    let start = Instant::now();

    let response = service.analyze(&request).await?;

    let latency_ms = start.elapsed().as_millis() as u64;
    log::debug!("Analyzed '{}' in {}ms: {:?}", request.text(), latency_ms, response.outcome());

    Ok(Analysis {
        id: Uuid::new_v4(),
        text: request.text().to_string(),
        response,
        timestamp: chrono::Utc::now().to_rfc3339(),
        latency_ms,
    })
}

/// Split raw bytes into lines, replacing invalid UTF-8 rather than failing.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Analyze every non-blank line, at most `concurrency` at a time, and
/// aggregate the outcomes.
///
/// Entries keep the order of the input lines. Transport failures are
/// recorded as connection-error views rather than aborting the batch.
pub async fn run_batch<S: AnalysisService>(
    service: &S,
    lines: &[String],
    concurrency: usize,
) -> BatchReport {
    let batch_start = Instant::now();

    let lines: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let results: Vec<Result<Analysis>> = stream::iter(lines.iter().map(|line| analyze_line(service, line)))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = BatchReport {
        total: lines.len(),
        ..BatchReport::default()
    };
    let mut latency_sum = 0;
    let mut latency_count = 0;

    for (line, result) in lines.iter().zip(results) {
        let entry = match result {
            Ok(analysis) => {
                match analysis.response.outcome() {
                    Outcome::Matched => report.matched += 1,
                    Outcome::Unmatched => report.unmatched += 1,
                    Outcome::ServiceError => report.service_errors += 1,
                }
                latency_sum += analysis.latency_ms;
                latency_count += 1;

                BatchEntry {
                    id: analysis.id,
                    line: analysis.text,
                    view: render::render(&analysis.response),
                    latency_ms: Some(analysis.latency_ms),
                    timestamp: analysis.timestamp,
                }
            }
            Err(e) => {
                log::warn!("Batch line failed: {}", e);
                report.transport_errors += 1;

                BatchEntry {
                    id: Uuid::new_v4(),
                    line: line.to_string(),
                    view: render::render_transport_error(&e),
                    latency_ms: None,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                }
            }
        };
        report.entries.push(entry);
    }

    report.average_latency_ms = if latency_count > 0 { latency_sum / latency_count } else { 0 };
    report.total_latency_ms = batch_start.elapsed().as_millis() as u64;

    log::info!(
        "📊 Batch of {} completed in {}ms ({} at a time)",
        report.total,
        report.total_latency_ms,
        concurrency.max(1)
    );

    report
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = "=".repeat(60);
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{}", separator)?;
            writeln!(f, "[{}] {}", index + 1, entry.line)?;
            write!(f, "{}", entry.view)?;
        }
        writeln!(f, "{}", separator)?;
        writeln!(
            f,
            "📊 {} lines: {} matched, {} unmatched, {} service errors, {} connection errors (avg {}ms)",
            self.total,
            self.matched,
            self.unmatched,
            self.service_errors,
            self.transport_errors,
            self.average_latency_ms
        )
    }
}
