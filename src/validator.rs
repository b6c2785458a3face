use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use reflect_core::AppError;

/// Joins validation messages, ordered by field name.
pub(crate) fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let body = rejection.body_text();
    if let Some(field) = body
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if body.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed or incomplete JSON is a 400; well-formed JSON that fails
/// validation is a 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn query_rejection_to_error(rejection: QueryRejection) -> AppError {
    let body = rejection.body_text();
    let detail = body
        .strip_prefix("Failed to deserialize query string: ")
        .unwrap_or(body.as_str());
    AppError::bad_request(anyhow!("Invalid query string: {}", detail))
}

/// Query string extractor whose rejection is an [`AppError`] 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection_to_error)?;
        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Email must be a valid email address"))]
        email: String,
    }

    async fn extract(body: &str, content_type: Option<&str>) -> Result<Payload, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        ValidatedJson::<Payload>::from_request(req, &())
            .await
            .map(|ValidatedJson(p)| p)
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let payload = extract(
            r#"{"name":"Ada","email":"ada@example.com"}"#,
            Some("application/json"),
        )
        .await
        .unwrap();
        assert_eq!(payload.name, "Ada");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = extract(r#"{"name":"Ada"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "email is required");
    }

    #[tokio::test]
    async fn test_invalid_field_is_unprocessable() {
        let err = extract(
            r#"{"name":"","email":"nope"}"#,
            Some("application/json"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.error.to_string(),
            "Email must be a valid email address, Name is required"
        );
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<i64>,
    }

    async fn extract_query(uri: &str) -> Result<Paging, AppError> {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (mut parts, _) = req.into_parts();
        QueryParams::<Paging>::from_request_parts(&mut parts, &())
            .await
            .map(|QueryParams(p)| p)
    }

    #[tokio::test]
    async fn test_query_params_parse() {
        let paging = extract_query("/?page=3").await.unwrap();
        assert_eq!(paging.page, Some(3));
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let err = extract_query("/?page=abc").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().starts_with("Invalid query string"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = extract(r#"{"name":"Ada","email":"ada@example.com"}"#, None)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
