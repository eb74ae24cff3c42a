//! Inbound messaging webhook handler
//!
//! Decodes Twilio's form payload into `(contact, text)`, runs the review
//! engine and answers with TwiML so Twilio relays the reply to the sender.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use reviewline_common::{Error, Result, ValidatedForm};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::ReviewsState;

/// Channel prefix Twilio puts on WhatsApp addresses
const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Inbound message fields we use; Twilio sends many more
#[derive(Debug, Deserialize, Validate)]
pub struct TwilioInboundMessage {
    /// Sender address, e.g. `whatsapp:+14155550100`
    #[serde(rename = "From")]
    #[validate(length(min = 1, message = "From is required"))]
    pub from: String,

    /// Message text; may be empty
    #[serde(rename = "Body")]
    pub body: String,
}

/// Strip the channel prefix and surrounding whitespace from a sender address
pub fn normalize_contact(from: &str) -> String {
    from.replace(WHATSAPP_PREFIX, "").trim().to_string()
}

/// Render a single-message TwiML response
pub fn twiml_message(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>{}</Message></Response>"#,
        escaped
    )
}

/// Handle an inbound message from Twilio
pub async fn twilio_webhook(
    State(state): State<ReviewsState>,
    ValidatedForm(message): ValidatedForm<TwilioInboundMessage>,
) -> Result<Response> {
    let contact = normalize_contact(&message.from);
    if contact.is_empty() {
        return Err(Error::Validation(
            "From does not contain a contact address".to_string(),
        ));
    }

    let reply = state
        .engine
        .process_message(&contact, &message.body)
        .await?;

    Ok((
        [(header::CONTENT_TYPE, "text/xml")],
        twiml_message(&reply.reply_text),
    )
        .into_response())
}
