use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, prelude::Result};

use super::spec::{AnalysisRecord, NewAnalysis};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Handle owning the analyses table; callers never touch the pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn connect() -> Result<Store> {
        let options =
            SqliteConnectOptions::from_str(&settings.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_lazy_with(options);
        Ok(Store { pool })
    }

    #[cfg(test)]
    pub async fn connect_memory() -> Result<Store> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Store { pool })
    }

    /// Safe to run on every start, the migration is a no-op once applied.
    pub async fn init(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;
        Ok(())
    }

    pub async fn create(&self, analysis: NewAnalysis) -> Result<AnalysisRecord> {
        let row = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            INSERT INTO analyses (resume_name, jd_name, score, verdict, summary, missing_keywords)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, timestamp, resume_name, jd_name, score, verdict, summary, missing_keywords, shortlisted
            "#,
        )
        .bind(&analysis.resume_name)
        .bind(&analysis.jd_name)
        .bind(analysis.score)
        .bind(&analysis.verdict)
        .bind(&analysis.summary)
        .bind(&analysis.missing_keywords)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    // id breaks ties, the timestamp only has second precision
    pub async fn list_all(&self) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRecord>(
            "SELECT id, timestamp, resume_name, jd_name, score, verdict, summary, missing_keywords, shortlisted
             FROM analyses ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_shortlisted(&self) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRecord>(
            "SELECT id, timestamp, resume_name, jd_name, score, verdict, summary, missing_keywords, shortlisted
             FROM analyses WHERE shortlisted = 1 ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Updates at most one row; an unknown id is a no-op, not an error.
    pub async fn set_shortlist(&self, id: i64, shortlisted: bool) -> Result<()> {
        sqlx::query("UPDATE analyses SET shortlisted = $1 WHERE id = $2")
            .bind(shortlisted)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<()> {
        sqlx::query("select 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn sample(resume_name: &str) -> NewAnalysis {
        NewAnalysis {
            resume_name: resume_name.into(),
            jd_name: "backend_engineer.txt".into(),
            score: 82,
            verdict: "High Fit".into(),
            summary: "Strong match.".into(),
            missing_keywords: "- Docker\n- Kubernetes".into(),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create_then_list_all() -> Result<()> {
        let store = Store::connect_memory().await?;
        store.init().await?;
        let created = store.create(sample("alice.pdf")).await?;
        let records = store.list_all().await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, created.id);
        assert_eq!(records[0].timestamp, created.timestamp);
        assert_eq!(records[0].resume_name, "alice.pdf");
        assert_eq!(records[0].jd_name, "backend_engineer.txt");
        assert_eq!(records[0].score, 82);
        assert_eq!(records[0].verdict, "High Fit");
        assert_eq!(records[0].summary, "Strong match.");
        assert_eq!(records[0].missing_keywords, "- Docker\n- Kubernetes");
        assert!(!records[0].shortlisted);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list_all_newest_first() -> Result<()> {
        let store = Store::connect_memory().await?;
        store.init().await?;
        let first = store.create(sample("first.pdf")).await?;
        let second = store.create(sample("second.pdf")).await?;
        assert!(second.id > first.id);
        let records = store.list_all().await?;
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_shortlist_roundtrip() -> Result<()> {
        let store = Store::connect_memory().await?;
        store.init().await?;
        let created = store.create(sample("alice.pdf")).await?;
        store.set_shortlist(created.id, true).await?;
        let shortlisted = store.list_shortlisted().await?;
        assert!(shortlisted.iter().any(|r| r.id == created.id));
        store.set_shortlist(created.id, false).await?;
        let shortlisted = store.list_shortlisted().await?;
        assert!(shortlisted.iter().all(|r| r.id != created.id));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_shortlist_unknown_id_is_noop() -> Result<()> {
        let store = Store::connect_memory().await?;
        store.init().await?;
        let created = store.create(sample("alice.pdf")).await?;
        store.set_shortlist(created.id + 999, true).await?;
        let records = store.list_all().await?;
        assert_eq!(records.len(), 1);
        assert!(!records[0].shortlisted);
        assert!(store.list_shortlisted().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_init_is_idempotent() -> Result<()> {
        let store = Store::connect_memory().await?;
        store.init().await?;
        store.create(sample("alice.pdf")).await?;
        store.init().await?;
        assert_eq!(store.list_all().await?.len(), 1);
        Ok(())
    }
}
