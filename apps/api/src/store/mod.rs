//! Persistence for completed analyses.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::analysis::{AnalysisResult, AnalysisRow, AnalysisStats};

#[derive(Clone)]
pub struct AnalysisStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    overall_score: i32,
    job_category: String,
    created_at: DateTime<Utc>,
}

impl AnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a completed analysis and returns the stored row.
    pub async fn create(
        &self,
        user_id: Uuid,
        file_name: &str,
        result: &AnalysisResult,
    ) -> Result<AnalysisRow, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO resume_analyses
                (id, user_id, file_name, job_category, full_name, overall_score,
                 sections, summary, suggested_fixes, ats_score,
                 original_text, highlighted_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_name)
        .bind(result.job_category.slug())
        .bind(&result.full_name)
        .bind(result.overall_score)
        .bind(Json(&result.sections))
        .bind(&result.summary)
        .bind(Json(&result.suggested_fixes))
        .bind(Json(&result.ats_score))
        .bind(result.original_text.as_deref())
        .bind(result.highlighted_text.as_ref().map(Json))
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<AnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>("SELECT * FROM resume_analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Newest first, paginated.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT * FROM resume_analyses
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Returns true when a row was actually removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resume_analyses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn rename(
        &self,
        id: Uuid,
        file_name: &str,
    ) -> Result<Option<AnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>(
            r#"
            UPDATE resume_analyses
            SET file_name = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Aggregate stats over all of a user's analyses.
    pub async fn stats_for_user(&self, user_id: Uuid) -> Result<AnalysisStats, sqlx::Error> {
        let rows = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT overall_score, job_category, created_at
            FROM resume_analyses
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(compute_stats(&rows))
    }
}

/// Pure aggregation over rows ordered newest-first.
fn compute_stats(rows: &[StatsRow]) -> AnalysisStats {
    if rows.is_empty() {
        return AnalysisStats {
            total_analyses: 0,
            average_score: 0,
            last_analysis: None,
            top_job_category: None,
            score_improvement: 0,
        };
    }

    let total = rows.len() as i64;
    let sum: i64 = rows.iter().map(|r| r.overall_score as i64).sum();
    let average_score = ((sum as f64 / total as f64).round()) as i32;

    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for row in rows {
        *counts.entry(row.job_category.as_str()).or_default() += 1;
    }
    let top_job_category = counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(category, _)| category.to_string());

    // Latest score against the earliest one.
    let score_improvement = rows[0].overall_score - rows[rows.len() - 1].overall_score;

    AnalysisStats {
        total_analyses: total,
        average_score,
        last_analysis: Some(rows[0].created_at),
        top_job_category,
        score_improvement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(score: i32, category: &str, day: u32) -> StatsRow {
        StatsRow {
            overall_score: score,
            job_category: category.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.average_score, 0);
        assert!(stats.last_analysis.is_none());
        assert!(stats.top_job_category.is_none());
        assert_eq!(stats.score_improvement, 0);
    }

    #[test]
    fn test_stats_single_row() {
        let rows = [row(73, "software-developer", 10)];
        let stats = compute_stats(&rows);
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.average_score, 73);
        assert_eq!(stats.last_analysis, Some(rows[0].created_at));
        assert_eq!(stats.top_job_category.as_deref(), Some("software-developer"));
        assert_eq!(stats.score_improvement, 0);
    }

    #[test]
    fn test_stats_averages_and_improvement() {
        // Newest first: 80 (day 3), 70 (day 2), 60 (day 1).
        let rows = [
            row(80, "data-engineer", 3),
            row(70, "data-engineer", 2),
            row(60, "software-developer", 1),
        ];
        let stats = compute_stats(&rows);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.average_score, 70);
        assert_eq!(stats.last_analysis, Some(rows[0].created_at));
        assert_eq!(stats.top_job_category.as_deref(), Some("data-engineer"));
        assert_eq!(stats.score_improvement, 20);
    }

    #[test]
    fn test_stats_average_rounds() {
        let rows = [row(70, "a", 2), row(75, "a", 1)];
        // (70 + 75) / 2 = 72.5 → 73
        assert_eq!(compute_stats(&rows).average_score, 73);
    }

    #[test]
    fn test_stats_improvement_can_be_negative() {
        let rows = [row(50, "a", 2), row(90, "a", 1)];
        assert_eq!(compute_stats(&rows).score_improvement, -40);
    }
}
