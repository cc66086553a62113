use axum::extract::{FromRequest, FromRequestParts};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// `axum::Json` whose rejections render as the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` whose rejections render as the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// `axum::extract::Query` whose rejections render as the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// JSON `null`, `false`, `0`, `""`, `[]` and `{}` carry nothing to act on.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Decodes a request body that must be present and non-blank.
pub fn require_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    if is_blank(&body) {
        return Err(ApiError::BadRequest);
    }
    serde_json::from_value(body).map_err(|e| {
        tracing::debug!("Body has unexpected shape: {e}");
        ApiError::BadRequest
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug)]
    struct Body {
        #[allow(dead_code)]
        name: Option<String>,
    }

    #[test]
    fn blank_values() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(is_blank(&value), "{value} should be blank");
        }
        for value in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": null})] {
            assert!(!is_blank(&value), "{value} should not be blank");
        }
    }

    #[test]
    fn require_body_rejects_empty_objects() {
        assert!(matches!(
            require_body::<Body>(json!({})),
            Err(ApiError::BadRequest)
        ));
        assert!(require_body::<Body>(json!({"name": null})).is_ok());
    }

    #[test]
    fn require_body_rejects_wrong_shapes() {
        assert!(matches!(
            require_body::<Body>(json!({"name": 7})),
            Err(ApiError::BadRequest)
        ));
    }
}
