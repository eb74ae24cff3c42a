//! Custom axum extractors for Reviewline

use axum::{
    extract::{rejection::FormRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Form,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// URL-encoded form extractor that validates the deserialized value automatically.
///
/// Messaging providers post webhooks as `application/x-www-form-urlencoded`.
/// Missing required fields and validation failures both return 400.
#[derive(Debug)]
pub struct ValidatedForm<T>(pub T);

/// Rejection type for `ValidatedForm`:
/// - Form deserialization errors → 400 (via `Error::Validation`)
/// - Validation errors → 400 (via `Error::Validation`)
#[derive(Debug)]
pub enum ValidatedFormRejection {
    Form(FormRejection),
    Validation(Error),
}

impl IntoResponse for ValidatedFormRejection {
    fn into_response(self) -> Response {
        match self {
            ValidatedFormRejection::Form(e) => Error::Validation(e.body_text()).into_response(),
            ValidatedFormRejection::Validation(e) => e.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(ValidatedFormRejection::Form)?;

        value.validate().map_err(|e| {
            ValidatedFormRejection::Validation(Error::Validation(format!(
                "Validation failed: {}",
                e
            )))
        })?;

        Ok(ValidatedForm(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{self, Request as HttpRequest, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestPayload {
        #[serde(rename = "From")]
        #[validate(length(min = 1))]
        from: String,
        #[serde(rename = "Body")]
        body: String,
    }

    fn form_request(body: &str) -> HttpRequest<axum::body::Body> {
        HttpRequest::builder()
            .method(http::Method::POST)
            .header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_form_valid_input() {
        let req = form_request("From=whatsapp%3A%2B1555&Body=hello+there");
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        let ValidatedForm(payload) = result.unwrap();
        assert_eq!(payload.from, "whatsapp:+1555");
        assert_eq!(payload.body, "hello there");
    }

    #[tokio::test]
    async fn test_validated_form_ignores_unknown_fields() {
        let req = form_request("From=%2B1555&Body=hi&MessageSid=SM123&NumMedia=0");
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_validated_form_empty_body_is_accepted() {
        let req = form_request("From=%2B1555&Body=");
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        assert_eq!(result.unwrap().0.body, "");
    }

    #[tokio::test]
    async fn test_validated_form_missing_field() {
        let req = form_request("From=%2B1555");
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validated_form_validation_failure() {
        // Empty From violates min=1 constraint
        let req = form_request("From=&Body=hi");
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validated_form_wrong_content_type() {
        let req = HttpRequest::builder()
            .method(http::Method::POST)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(r#"{"From":"+1555","Body":"hi"}"#))
            .unwrap();
        let result = ValidatedForm::<TestPayload>::from_request(req, &()).await;
        assert!(result.is_err());
    }
}
