use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Category, Question,
    },
    server::{app::AppState, extract::PathParam},
};

use super::{ApiError, ApiResponse};

/// Categories as the front end expects them: id to type, keys in type order.
pub(super) type CategoryMap = serde_json::Map<String, Value>;

pub(super) async fn category_map(pool: &SqlitePool) -> Result<CategoryMap, sqlx::Error> {
    Ok(categories::get_categories_by_type(pool)
        .await?
        .into_iter()
        .map(|c| (c.id.to_string(), Value::String(c.kind)))
        .collect())
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Category,
    categories: Vec<Category>,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(&pool).await?,
    }))
}

// an existing category without questions is reported as not found, the same
// way an empty question listing is
async fn questions_for_category(
    State(pool): State<SqlitePool>,
    PathParam(category_id): PathParam<i64>,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let current_category = categories::get_category(&pool, category_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let questions = questions::get_questions_for_category(&pool, category_id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category,
        categories: categories::get_all_categories(&pool).await?,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{category_id}/questions",
            get(questions_for_category),
        )
        .with_state(state)
}
