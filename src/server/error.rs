use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request")]
    BadRequest,
    #[error("Resource not found")]
    NotFound,
    #[error("Unprocessable")]
    Unprocessable(#[source] sqlx::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Unprocessable(e) => tracing::warn!("Store rejected write: {e}"),
            ApiError::Internal(e) => tracing::error!("Request failed: {e:#}"),
            _ => {}
        }
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::Internal(error.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {rejection}");
        ApiError::BadRequest
    }
}

// an id that does not parse could never have matched an integer route
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {rejection}");
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query: {rejection}");
        ApiError::BadRequest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn envelopes_carry_code_and_message() {
        let cases = [
            (ApiError::BadRequest, 400, "Bad request"),
            (ApiError::NotFound, 404, "Resource not found"),
            (
                ApiError::Unprocessable(sqlx::Error::RowNotFound),
                422,
                "Unprocessable",
            ),
            (
                ApiError::Internal(anyhow::anyhow!("disk on fire")),
                500,
                "Internal server error",
            ),
        ];
        for (error, code, message) in cases {
            let (status, body) = render(error).await;
            assert_eq!(status.as_u16(), code);
            assert_eq!(
                body,
                serde_json::json!({"success": false, "error": code, "message": message})
            );
        }
    }

    #[test]
    fn store_errors_are_internal() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
