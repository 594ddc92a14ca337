use axum::{
    Json,
    extract::{Multipart, Path as AxumPath, State},
};
use serde::{Deserialize, Serialize};
use standard_error::{Interpolate, StandardError};

use crate::{
    pkg::{
        internal::{
            adaptors::analyses::spec::{AnalysisRecord, NewAnalysis},
            ai::{
                generate::AnalyzeOps,
                parse::{bullet_lines, parse_analysis},
                read::extract_document,
            },
        },
        server::state::AppState,
    },
    prelude::Result,
};

/// Cap per uploaded file. The analyze route's body limit is sized off
/// this (two files per request) so an oversized file reaches this check
/// instead of the transport's 2MB default.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

struct Upload {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

#[derive(Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub missing_skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct ShortlistInput {
    pub shortlisted: bool,
}

pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>> {
    let mut resume: Option<Upload> = None;
    let mut jd: Option<Upload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StandardError::new(&format!("ERR-UPLOAD-001: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "resume" | "jd" => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| StandardError::new("ERR-UPLOAD-002").interpolate_err(e.to_string()))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(StandardError::new(
                        "ERR-UPLOAD-007: File too large. Maximum size is 10MB",
                    ));
                }
                let upload = Upload {
                    file_name,
                    content_type,
                    data: data.into(),
                };
                if field_name == "resume" {
                    resume = Some(upload);
                } else {
                    jd = Some(upload);
                }
            }
            _ => {
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| StandardError::new("ERR-UPLOAD-002").interpolate_err(e.to_string()))?;
            }
        }
    }

    let resume =
        resume.ok_or_else(|| StandardError::new("ERR-UPLOAD-003: resume file is required"))?;
    let jd = jd.ok_or_else(|| {
        StandardError::new("ERR-UPLOAD-004: job description file is required")
    })?;
    if resume.content_type != "application/pdf" {
        return Err(StandardError::new("ERR-UPLOAD-005: resume must be a PDF"));
    }
    if !["application/pdf", "text/plain"].contains(&jd.content_type.as_str()) {
        return Err(StandardError::new(
            "ERR-UPLOAD-006: job description must be a PDF or plain text",
        ));
    }

    // extraction failures abort the request, nothing is persisted
    let resume_text = extract_document(resume.data, &resume.content_type)?;
    let jd_text = extract_document(jd.data, &jd.content_type)?;

    // analyzer failures degrade to the sentinel, which parses to fallback
    // fields; the interaction still completes with a placeholder record
    let raw = state.ai_client.fit_assessment(&resume_text, &jd_text).await;
    let parsed = parse_analysis(&raw);
    if parsed.is_fallback_only() {
        tracing::warn!("no analysis fields recognized in model response, storing fallbacks");
    }

    let record = state
        .store
        .create(NewAnalysis {
            resume_name: resume.file_name,
            jd_name: jd.file_name,
            score: parsed.score,
            verdict: parsed.verdict,
            summary: parsed.summary,
            missing_keywords: parsed.missing_keywords,
        })
        .await?;
    tracing::info!("analysis {} saved for {}", record.id, &record.resume_name);

    let missing_skills = bullet_lines(&record.missing_keywords);
    Ok(Json(AnalysisReport {
        record,
        missing_skills,
    }))
}

pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<AnalysisRecord>>> {
    let records = state.store.list_all().await?;
    Ok(Json(records))
}

pub async fn shortlisted(State(state): State<AppState>) -> Result<Json<Vec<AnalysisRecord>>> {
    let records = state.store.list_shortlisted().await?;
    Ok(Json(records))
}

pub async fn set_shortlist(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    Json(input): Json<ShortlistInput>,
) -> Result<()> {
    state.store.set_shortlist(id, input.shortlisted).await?;
    Ok(())
}
