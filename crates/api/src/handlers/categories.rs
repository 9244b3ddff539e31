//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::Json;
use heirloom_db::models::category::Category;
use heirloom_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}
