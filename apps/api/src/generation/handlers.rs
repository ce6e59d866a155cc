//! Axum route handlers for the Reports API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, LocalizedError};
use crate::generation::labels::MissingInput;
use crate::generation::models::{Lang, ParticipantProfile, TestResultSet};
use crate::generation::pipeline::{generate_report, ReportBundle};
use crate::generation::roadmap::Roadmap;
use crate::state::AppState;

pub const PDF_MIME_TYPE: &str = "application/pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Fields stay loosely typed so that shape problems surface as localized 400s
/// instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default, alias = "userData")]
    pub profile: Option<Value>,
    #[serde(default, alias = "testResults", alias = "tests")]
    pub test_result_set: Option<Value>,
    #[serde(default)]
    pub lang: Option<Value>,
}

impl ReportRequest {
    pub fn lang(&self) -> Lang {
        Lang::parse(self.lang.as_ref().and_then(Value::as_str))
    }

    /// The profile must be a JSON object; the result set must be an object holding at
    /// least one known test key.
    pub fn validate(&self) -> Result<(ParticipantProfile, TestResultSet), MissingInput> {
        let profile = self
            .profile
            .as_ref()
            .and_then(ParticipantProfile::from_value)
            .ok_or(MissingInput::Profile)?;
        let tests = self
            .test_result_set
            .as_ref()
            .and_then(TestResultSet::from_value)
            .filter(|set| !set.is_empty())
            .ok_or(MissingInput::Tests)?;
        Ok((profile, tests))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub narrative: String,
    pub roadmap: Roadmap,
    pub document_base64: String,
    pub filename: String,
    pub mime_type: &'static str,
}

impl From<ReportBundle> for ReportResponse {
    fn from(bundle: ReportBundle) -> Self {
        ReportResponse {
            narrative: bundle.narrative,
            roadmap: bundle.roadmap,
            document_base64: STANDARD.encode(&bundle.document),
            filename: bundle.filename,
            mime_type: PDF_MIME_TYPE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports
///
/// Generates the narrative, the roadmap and the PDF; the PDF is returned base64-encoded.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, LocalizedError> {
    let (request, lang) = read_request(payload);
    let bundle = run_report(&state, &request, lang)
        .await
        .map_err(|e| e.localized(lang))?;

    Ok(Json(ReportResponse::from(bundle)))
}

/// POST /api/v1/reports/pdf
///
/// Same pipeline, but responds with the PDF bytes as an attachment.
pub async fn handle_download_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, LocalizedError> {
    let (request, lang) = read_request(payload);
    let bundle = run_report(&state, &request, lang)
        .await
        .map_err(|e| e.localized(lang))?;

    let headers = [
        (header::CONTENT_TYPE, PDF_MIME_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", bundle.filename),
        ),
    ];
    Ok((headers, bundle.document).into_response())
}

/// An unreadable body is treated as a request without data.
fn read_request(payload: Result<Json<ReportRequest>, JsonRejection>) -> (ReportRequest, Lang) {
    match payload {
        Ok(Json(request)) => {
            let lang = request.lang();
            (request, lang)
        }
        Err(rejection) => {
            tracing::debug!("Unreadable report request body: {rejection}");
            (ReportRequest::default(), Lang::default())
        }
    }
}

async fn run_report(
    state: &AppState,
    request: &ReportRequest,
    lang: Lang,
) -> Result<ReportBundle, AppError> {
    let (profile, tests) = request.validate().map_err(AppError::InvalidInput)?;
    let llm = state.llm().await?;
    generate_report(llm, &profile, &tests, lang).await
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
