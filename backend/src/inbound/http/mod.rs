//! HTTP inbound adapter exposing the REST API.

pub mod api;
pub mod associations;
pub mod auth;
pub mod content;
pub mod envelope;
pub mod error;
pub mod health;
pub mod language;
pub mod localized_texts;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
