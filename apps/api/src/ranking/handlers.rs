//! Axum route handlers for the Ranking API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::intake::candidates_from_resumes;
use crate::intake::csv_rows::parse_candidates_csv;
use crate::intake::documents::{extract_document, DocumentFormat};
use crate::intake::resume::{infer_profile, ResumeProfile};
use crate::models::candidate::{
    BatchStatistics, CandidateRecord, ExportRow, RankedBatch, TargetProfile,
};
use crate::ranking::pipeline::rank_batch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub target: TargetProfile,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub format: DocumentFormat,
    pub chars: usize,
    pub text: String,
    pub profile: ResumeProfile,
}

struct UploadedFile {
    file_name: String,
    data: Bytes,
}

#[derive(Default)]
struct UploadForm {
    files: Vec<UploadedFile>,
    job_description: Option<String>,
    target_skills: Option<String>,
}

impl UploadForm {
    fn target(&self) -> Result<TargetProfile, AppError> {
        TargetProfile::from_form_fields(
            self.job_description.as_deref(),
            self.target_skills.as_deref(),
        )
        .ok_or_else(|| {
            AppError::Validation("job_description or target_skills is required".to_string())
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rank
///
/// Ranks a JSON batch of candidates against the target profile.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankedBatch>, AppError> {
    let batch = rank_batch(
        request.candidates,
        &request.target,
        &state.config.scoring,
        state.relevance.as_ref(),
    )?;
    Ok(Json(batch))
}

/// POST /api/v1/rank/export
///
/// Same input as `/rank`; returns only id, name, email and score, in rank order.
pub async fn handle_rank_export(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Vec<ExportRow>>, AppError> {
    let batch = rank_batch(
        request.candidates,
        &request.target,
        &state.config.scoring,
        state.relevance.as_ref(),
    )?;
    Ok(Json(batch.export_rows()))
}

/// POST /api/v1/rank/statistics
///
/// Same input as `/rank`; returns tier counts and the average composite.
pub async fn handle_rank_statistics(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<BatchStatistics>, AppError> {
    let batch = rank_batch(
        request.candidates,
        &request.target,
        &state.config.scoring,
        state.relevance.as_ref(),
    )?;
    Ok(Json(batch.statistics()))
}

/// POST /api/v1/rank/csv
///
/// Multipart: `file` (applicant CSV) plus `job_description` or `target_skills`.
pub async fn handle_rank_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RankedBatch>, AppError> {
    let form = read_upload_form(multipart).await?;
    let target = form.target()?;

    let file = match form.files.as_slice() {
        [file] => file,
        [] => return Err(AppError::Validation("a CSV file is required".to_string())),
        _ => {
            return Err(AppError::Validation(
                "exactly one CSV file is expected".to_string(),
            ))
        }
    };

    let candidates = parse_candidates_csv(&file.data)?;
    let batch = rank_batch(
        candidates,
        &target,
        &state.config.scoring,
        state.relevance.as_ref(),
    )?;
    Ok(Json(batch))
}

/// POST /api/v1/rank/resumes
///
/// Multipart: one or more resume `files` plus `job_description` or `target_skills`.
/// Unreadable documents rank with empty text rather than failing the batch.
pub async fn handle_rank_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RankedBatch>, AppError> {
    let form = read_upload_form(multipart).await?;
    let target = form.target()?;

    let scoring = state.config.scoring.clone();
    let relevance = Arc::clone(&state.relevance);
    let batch = run_blocking("resume ranking", move || {
        let candidates = candidates_from_resumes(
            form.files
                .iter()
                .map(|f| (f.file_name.as_str(), f.data.as_ref())),
        );
        rank_batch(candidates, &target, &scoring, relevance.as_ref())
    })
    .await??;
    Ok(Json(batch))
}

/// POST /api/v1/documents/extract
///
/// Multipart `file`. Returns the detected format, extracted text and the
/// fields inferred from it.
pub async fn handle_extract_document(
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let file = form
        .files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("a document file is required".to_string()))?;

    let response = run_blocking("document extraction", move || {
        let document = extract_document(&file.file_name, &file.data);
        let profile = infer_profile(&document.text, &file.file_name);
        ExtractResponse {
            format: document.format,
            chars: document.text.chars().count(),
            text: document.text,
            profile,
        }
    })
    .await?;
    Ok(Json(response))
}

/// PDF and DOCX parsing is CPU-bound; keep it off the async executor.
async fn run_blocking<T, F>(task: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {task}: {e}"))
        })
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?;
                form.files.push(UploadedFile { file_name, data });
            }
            "job_description" => form.job_description = Some(field.text().await?),
            "target_skills" => form.target_skills = Some(field.text().await?),
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(form)
}
