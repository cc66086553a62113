use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, NewQuestion, Question},
    pagination::paginate,
    server::{
        app::AppState,
        deserializers::deserialize_lenient_int,
        extract::{require_body, JsonBody, PathParam, QueryParams},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::categories::{category_map, CategoryMap};
use super::{ApiError, ApiResponse};

#[derive(Deserialize)]
struct QuestionsQuery {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_lenient_int")]
    page: Option<i64>,
}

// fields are kept as raw JSON so the store decides whether they fit
#[derive(Deserialize)]
struct NewQuestionBody {
    question: Option<Value>,
    answer: Option<Value>,
    category: Option<Value>,
    difficulty: Option<Value>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<Value>,
}

// the term is matched as text: a missing term is spelled `None`, booleans
// `True`/`False`
fn search_text(term: Option<&Value>) -> String {
    match term {
        None | Some(Value::Null) => "None".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "True".to_owned(),
        Some(Value::Bool(false)) => "False".to_owned(),
        Some(other) => other.to_string(),
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<QuestionsQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool).await?;
    let page = paginate(&all, query.page.unwrap_or(1));
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: page.to_vec(),
        total_questions: all.len(),
        categories: category_map(&pool).await?,
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    PathParam(question_id): PathParam<i64>,
) -> ApiResponse<Json<Deleted>> {
    if !questions::delete_question(&pool, question_id).await? {
        return Err(ApiError::NotFound);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(question_id, "Question deleted");

    Ok(Json(Deleted {
        success: true,
        deleted: question_id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResponse<Json<Created>> {
    let body: NewQuestionBody = require_body(body)?;
    let (Some(question), Some(answer), Some(category), Some(difficulty)) =
        (&body.question, &body.answer, &body.category, &body.difficulty)
    else {
        return Err(ApiError::BadRequest);
    };

    let new = NewQuestion {
        question,
        answer,
        category,
        difficulty,
    };
    let id = questions::create_question(&pool, new)
        .await
        .map_err(ApiError::Unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(question_id = id, "Question created");

    Ok(Json(Created { success: true }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResponse<Json<SearchResults>> {
    let body: SearchBody = require_body(body)?;
    let term = search_text(body.search_term.as_ref());

    let found = questions::search_questions(&pool, &term).await?;
    tracing::debug!(%term, matches = found.len(), "Searched questions");

    Ok(Json(SearchResults {
        success: true,
        total_questions: found.len(),
        questions: found,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}
