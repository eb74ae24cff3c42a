//! Shared utilities, configuration, and error handling for Reviewline
//!
//! This crate provides common functionality used across the Reviewline application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Request extractors
//! - Webhook signature verification

pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat, TwilioConfig};
pub use crypto::{compute_twilio_signature, verify_twilio_signature, TWILIO_SIGNATURE_HEADER};
pub use error::{Error, Result};
pub use extractors::ValidatedForm;
