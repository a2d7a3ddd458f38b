use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, AnalysisStats, CategoryInfo, JobCategory};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const DEFAULT_LIST_LIMIT: i64 = 10;

/// Non-positive or absent limit falls back to the default; negative offset
/// is treated as zero.
fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = match limit {
        Some(n) if n > 0 => n,
        _ => DEFAULT_LIST_LIMIT,
    };
    (limit, offset.unwrap_or(0).max(0))
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub user_id: Uuid,
    pub file_name: Option<String>,
}

/// POST /api/v1/analyses (multipart: file, job_category, user_id)
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisRow>), AppError> {
    let mut pdf_bytes: Option<Bytes> = None;
    let mut file_name = "resume.pdf".to_string();
    let mut job_category: Option<JobCategory> = None;
    let mut user_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                pdf_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?,
                );
            }
            Some("job_category") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?;
                job_category = Some(
                    JobCategory::parse(&value)
                        .ok_or_else(|| AppError::Validation(format!("Invalid job category: {value}")))?,
                );
            }
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?;
                user_id = Some(
                    value
                        .parse()
                        .map_err(|_| AppError::Validation(format!("Invalid user id: {value}")))?,
                );
            }
            _ => {}
        }
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("No PDF file uploaded".to_string()))?;
    let job_category = job_category
        .ok_or_else(|| AppError::Validation("Missing job_category field".to_string()))?;
    let user_id = user_id.ok_or_else(|| AppError::Validation("Missing user_id field".to_string()))?;

    let result = state.analyzer.analyze_resume(pdf_bytes, job_category).await?;
    let row = state.store.create(user_id, &file_name, &result).await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<AnalysisRow>, AppError> {
    let row = fetch_owned(&state, id, params.user_id).await?;
    Ok(Json(row))
}

/// GET /api/v1/analyses?user_id=&limit=&offset=
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    let (limit, offset) = page_bounds(params.limit, params.offset);
    let rows = state
        .store
        .list_for_user(params.user_id, limit, offset)
        .await?;
    Ok(Json(rows))
}

/// DELETE /api/v1/analyses/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    fetch_owned(&state, id, params.user_id).await?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/analyses/:id
pub async fn handle_rename_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<AnalysisRow>, AppError> {
    let file_name = match req.file_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(AppError::Validation("No valid fields to update".to_string())),
    };

    fetch_owned(&state, id, req.user_id).await?;
    let row = state
        .store
        .rename(id, &file_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(row))
}

/// GET /api/v1/analyses/stats
pub async fn handle_get_stats(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<AnalysisStats>, AppError> {
    let stats = state.store.stats_for_user(params.user_id).await?;
    Ok(Json(stats))
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

/// GET /api/v1/categories
pub async fn handle_get_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: JobCategory::ALL.iter().map(|c| c.info()).collect(),
    })
}

/// Loads an analysis and enforces ownership: missing → 404, wrong user → 403.
async fn fetch_owned(state: &AppState, id: Uuid, user_id: Uuid) -> Result<AnalysisRow, AppError> {
    let row = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    if row.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_defaults() {
        assert_eq!(page_bounds(None, None), (10, 0));
    }

    #[test]
    fn test_page_bounds_passes_valid_values_through() {
        assert_eq!(page_bounds(Some(25), Some(50)), (25, 50));
    }

    #[test]
    fn test_page_bounds_rejects_non_positive_limit() {
        assert_eq!(page_bounds(Some(0), None), (10, 0));
        assert_eq!(page_bounds(Some(-5), Some(20)), (10, 20));
    }

    #[test]
    fn test_page_bounds_clamps_negative_offset() {
        assert_eq!(page_bounds(Some(5), Some(-3)), (5, 0));
    }
}
