//! Public caption-generation entry points.
//!
//! - [`CaptionEngine`]: takes a fully formed [`CaptionRequest`] and always
//!   returns a caption: model output when the orchestrator succeeds, the
//!   deterministic template otherwise.
//! - [`CaptionService`]: request-facing layer that validates raw
//!   parameters, reads the report from a [`ReportSource`], and delegates to
//!   the engine.

mod builder;
pub mod orchestrator;

pub use builder::CaptionEngineBuilder;
pub use orchestrator::{GenerationSettings, ModelOrchestrator};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::cache::CaptionCache;
use crate::caption::{generate_template_caption, validate_params};
use crate::telemetry;
use crate::types::{CaptionRequest, CaptionResult, ReportSharingData};
use crate::{Result, WartaError};

/// Read-only access to report data.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch sharing data for a report.
    ///
    /// Return [`WartaError::ReportNotFound`] for unknown ids.
    async fn fetch_report(&self, report_id: &str) -> Result<ReportSharingData>;
}

/// Caption generator with guaranteed output.
pub struct CaptionEngine {
    orchestrator: ModelOrchestrator,
}

impl CaptionEngine {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> CaptionEngineBuilder {
        CaptionEngineBuilder::new()
    }

    pub fn new(orchestrator: ModelOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Generate a caption for `request`.
    ///
    /// Provider failures never surface here: once every attempt is
    /// exhausted the template caption is returned instead.
    pub async fn generate_caption(&self, request: &CaptionRequest) -> Result<CaptionResult> {
        self.generate_caption_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`generate_caption`](Self::generate_caption), but stops at the
    /// next suspension point once `cancel` fires, returning
    /// [`WartaError::Cancelled`].
    pub async fn generate_caption_with_cancel(
        &self,
        request: &CaptionRequest,
        cancel: &CancellationToken,
    ) -> Result<CaptionResult> {
        match self.orchestrator.generate(request, cancel).await {
            Ok(result) => Ok(result),
            Err(WartaError::Cancelled) => Err(WartaError::Cancelled),
            Err(e) => {
                metrics::counter!(telemetry::TEMPLATE_FALLBACKS_TOTAL).increment(1);
                info!(
                    report_id = %request.report.id,
                    error = %e,
                    "falling back to template caption"
                );
                Ok(generate_template_caption(
                    &request.report,
                    request.tone,
                    request.platform,
                ))
            }
        }
    }

    /// The shared cache of model generations.
    pub fn cache(&self) -> &CaptionCache {
        self.orchestrator.cache()
    }
}

/// Raw, unvalidated caption parameters as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionParams {
    pub tone: String,
    pub platform: String,
    #[serde(default)]
    pub use_free_model: Option<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// Validates parameters, loads the report, and generates its caption.
pub struct CaptionService<R> {
    engine: Arc<CaptionEngine>,
    reports: R,
}

impl<R: ReportSource> CaptionService<R> {
    pub fn new(engine: Arc<CaptionEngine>, reports: R) -> Self {
        Self { engine, reports }
    }

    /// Caption for a stored report.
    ///
    /// Errors only on invalid parameters or when the report cannot be read.
    pub async fn caption_for_report(
        &self,
        report_id: &str,
        params: &CaptionParams,
    ) -> Result<CaptionResult> {
        self.caption_for_report_with_cancel(report_id, params, &CancellationToken::new())
            .await
    }

    #[instrument(name = "service.caption", skip(self, params, cancel))]
    pub async fn caption_for_report_with_cancel(
        &self,
        report_id: &str,
        params: &CaptionParams,
        cancel: &CancellationToken,
    ) -> Result<CaptionResult> {
        let validated = validate_params(
            &params.tone,
            &params.platform,
            params.use_free_model.as_deref(),
        )?;

        let report = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WartaError::Cancelled),
            report = self.reports.fetch_report(report_id) => report?,
        };

        let mut request = CaptionRequest::new(report, validated.tone, validated.platform)
            .use_free_model(validated.use_free_model);
        request.custom_instructions = params
            .custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        self.engine
            .generate_caption_with_cancel(&request, cancel)
            .await
    }
}
