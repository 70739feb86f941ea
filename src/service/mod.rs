// src/service/mod.rs

use crate::errors::Result;
use crate::models::{AnalysisRequest, AnalysisResponse};

pub mod http;

pub use http::HttpAnalysisService;

/// A backend that can analyze one line of verse.
///
/// The HTTP implementation talks to the remote `/api/analyze` endpoint; tests
/// plug in fakes. Like the rest of the crate this uses `impl Future` in the
/// trait rather than `async_trait`.
pub trait AnalysisService: Send + Sync {
    /// Submits one request and returns the decoded response.
    ///
    /// Exactly one round trip per call. Implementations do not retry.
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl std::future::Future<Output = Result<AnalysisResponse>> + Send;
}
