//! Content-Type and Accept negotiation.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::defaults::JSON_CONTENT_TYPE;

static JSON_MIME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(application/json|[^;/ \t]+/[^;/ \t]+[+]json)[ \t]*(;.*)?$").ok()
});

const JSON_PATCH_MIME: &str = "application/json-patch+json";

/// Returns true if `mime` is a JSON media type.
///
/// Matches `application/json` and any `type/subtype+json`, with optional
/// parameters, case-insensitively.
#[must_use]
pub fn is_json_mime(mime: &str) -> bool {
    if mime.trim().is_empty() {
        return false;
    }

    mime == JSON_PATCH_MIME || JSON_MIME.as_ref().is_some_and(|re| re.is_match(mime))
}

/// Selects the outgoing `Content-Type` from the types an operation consumes.
///
/// The first JSON type wins; without one, the first declared type is used.
/// Returns `None` for an empty list.
#[must_use]
pub fn select_content_type<'a>(content_types: &[&'a str]) -> Option<&'a str> {
    content_types
        .iter()
        .copied()
        .find(|ct| is_json_mime(ct))
        .or_else(|| content_types.first().copied())
}

/// Selects the `Accept` header value from the types an operation produces.
///
/// `application/json` is preferred whenever it is declared; otherwise every
/// declared type is listed, comma separated. Returns `None` for an empty list.
#[must_use]
pub fn select_accept(accepts: &[&str]) -> Option<String> {
    if accepts.is_empty() {
        return None;
    }

    if accepts
        .iter()
        .any(|a| a.eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    {
        return Some(JSON_CONTENT_TYPE.to_string());
    }

    Some(accepts.join(","))
}
