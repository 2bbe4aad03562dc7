use serde::Deserialize;
use serde_json::Value;

use crate::service::{
    error::{ServiceError, malformed_response, unavailable},
    types::{Article, FeedItem, Preferences, Session},
};

const BODY_SNIPPET_MAX_CHARS: usize = 240;

/// Any non-success status maps to `Unavailable`. The snippet is for the log
/// line only; callers never branch on body content.
pub(crate) fn status_error(operation: &'static str, status: u16, body: &str) -> ServiceError {
    unavailable(format!(
        "service answered {}: {}",
        status,
        truncate_body(body)
    ))
    .with_operation(operation)
    .with_http_status(status)
}

pub(crate) fn transport_error(
    operation: &'static str,
    detail: impl std::fmt::Display,
) -> ServiceError {
    unavailable(format!("request failed: {}", detail)).with_operation(operation)
}

pub(crate) fn decode_error(
    operation: &'static str,
    detail: impl std::fmt::Display,
) -> ServiceError {
    malformed_response(format!("undecodable body: {}", detail)).with_operation(operation)
}

pub(crate) fn decode_session(value: Value) -> Result<Session, ServiceError> {
    serde_json::from_value(value).map_err(|err| decode_error("create_anonymous_session", err))
}

pub(crate) fn decode_preferences(value: Value) -> Result<Preferences, ServiceError> {
    serde_json::from_value(value).map_err(|err| decode_error("load_preferences", err))
}

pub(crate) fn decode_feed(value: Value) -> Result<Vec<FeedItem>, ServiceError> {
    #[derive(Deserialize)]
    struct FeedEnvelope {
        items: Vec<FeedItem>,
    }

    let envelope: FeedEnvelope =
        serde_json::from_value(value).map_err(|err| decode_error("fetch_feed", err))?;
    Ok(envelope.items)
}

pub(crate) fn decode_article(value: Value) -> Result<Article, ServiceError> {
    serde_json::from_value(value).map_err(|err| decode_error("publish_article", err))
}

fn truncate_body(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_MAX_CHARS).collect()
}
