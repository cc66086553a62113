use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{
        app::AppState,
        deserializers::LenientId,
        extract::{is_blank, require_body, JsonBody},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse};

/// Category id the front end uses for "All".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Option<Vec<Value>>,
    quiz_category: Option<Value>,
}

#[derive(Debug, PartialEq)]
enum QuizScope {
    All,
    Category(i64),
    Empty,
}

// only the number 0 selects every category; "0" is looked up like any other id
fn quiz_scope(id: Option<&Value>) -> QuizScope {
    match id {
        Some(Value::Number(n)) if n.as_i64() == Some(ALL_CATEGORIES) => QuizScope::All,
        Some(id) => match serde_json::from_value::<LenientId>(id.clone()) {
            Ok(LenientId(id)) => QuizScope::Category(id),
            // no question can belong to an id that is not a number
            Err(_) => QuizScope::Empty,
        },
        None => QuizScope::Empty,
    }
}

// ids that are not integers never match a question, so they exclude nothing
fn asked_ids(previous: Option<Vec<Value>>) -> Vec<i64> {
    previous
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_i64)
        .collect()
}

#[derive(Serialize, Debug)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

/// Picks one question at random among those not asked yet.
fn pick_question(candidates: Vec<Question>, previous: &[i64]) -> Option<Question> {
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    remaining.choose(&mut rand::thread_rng()).cloned()
}

async fn candidates(pool: &SqlitePool, quiz: &QuizScope) -> sqlx::Result<Vec<Question>> {
    match quiz {
        QuizScope::All => questions::get_all_questions(pool).await,
        QuizScope::Category(id) => questions::get_questions_for_category(pool, *id).await,
        QuizScope::Empty => Ok(vec![]),
    }
}

async fn next_question(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResponse<Json<QuizResponse>> {
    let body: QuizBody = require_body(body)?;
    let Some(Value::Object(quiz_category)) = body.quiz_category.filter(|c| !is_blank(c)) else {
        return Err(ApiError::BadRequest);
    };
    let quiz = quiz_scope(quiz_category.get("id"));
    let previous = asked_ids(body.previous_questions);

    let question = pick_question(candidates(&pool, &quiz).await?, &previous);
    match &question {
        Some(q) => {
            let label = q.category.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[label.as_str()])
                .inc();
        }
        None => tracing::info!(?quiz, asked = previous.len(), "Quiz ran out of questions"),
    }

    Ok(Json(QuizResponse {
        success: question.is_some(),
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
