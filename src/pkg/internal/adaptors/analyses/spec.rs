use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRecord {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub resume_name: String,
    pub jd_name: String,
    pub score: i64,
    pub verdict: String,
    pub summary: String,
    pub missing_keywords: String,
    pub shortlisted: bool,
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub resume_name: String,
    pub jd_name: String,
    pub score: i64,
    pub verdict: String,
    pub summary: String,
    pub missing_keywords: String,
}
