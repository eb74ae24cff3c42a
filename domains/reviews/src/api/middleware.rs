//! Reviews domain state and webhook signature middleware

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, OriginalUri, Request, State},
    http::{header, request::Parts, Method, Request as HttpRequest},
    middleware::Next,
    response::Response,
    Form,
};
use reviewline_common::{
    verify_twilio_signature, Error, Result, TwilioConfig, TWILIO_SIGNATURE_HEADER,
};
use tracing::warn;

use crate::engine::ReviewEngine;
use crate::repository::ConversationStore;

/// Largest webhook body accepted for signature checking
const MAX_WEBHOOK_BODY_BYTES: usize = 64 * 1024;

/// Application state for the Reviews domain
#[derive(Clone)]
pub struct ReviewsState {
    pub engine: ReviewEngine,
    pub store: Arc<dyn ConversationStore>,
    pub twilio: TwilioConfig,
}

impl ReviewsState {
    pub fn new(store: Arc<dyn ConversationStore>, twilio: TwilioConfig) -> Self {
        Self {
            engine: ReviewEngine::new(Arc::clone(&store)),
            store,
            twilio,
        }
    }
}

/// Reject webhooks whose `X-Twilio-Signature` does not match.
///
/// A no-op unless an auth token is configured.
pub async fn require_twilio_signature(
    State(state): State<ReviewsState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let Some(auth_token) = state.twilio.auth_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES)
        .await
        .map_err(|e| Error::Validation(format!("Unreadable webhook body: {}", e)))?;

    let signature = parts
        .headers
        .get(TWILIO_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| Error::Authentication("Missing X-Twilio-Signature header".to_string()))?;

    let url = signed_url(&state.twilio, &parts)
        .ok_or_else(|| Error::Authentication("Cannot determine webhook URL".to_string()))?;

    let form_request = HttpRequest::builder()
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(bytes.clone()))
        .map_err(|e| Error::Internal(e.to_string()))?;
    let Form(params) = Form::<Vec<(String, String)>>::from_request(form_request, &())
        .await
        .map_err(|e| Error::Validation(e.body_text()))?;

    if !verify_twilio_signature(auth_token, &url, &params, signature) {
        warn!(url = %url, "Rejected webhook with invalid signature");
        return Err(Error::Authentication("Invalid webhook signature".to_string()));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// URL the provider signed: the configured public URL, or one rebuilt
/// from the request as seen behind a proxy
fn signed_url(twilio: &TwilioConfig, parts: &Parts) -> Option<String> {
    if let Some(url) = &twilio.public_webhook_url {
        return Some(url.clone());
    }

    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))?;

    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("https");

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    Some(format!("{}://{}{}", scheme, host, path))
}
