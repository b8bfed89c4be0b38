//! Parsing of Bing's submission redirect and polling payloads.
//!
//! Bing's result markup is a small, stable fragment of `<img>` tags, so image
//! sources are pulled out with a pattern match rather than a full HTML parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{BingError, Result};
use crate::types::{JobId, PollState};
use crate::urls;

static SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="([^"]+)""#).expect("valid src attribute pattern"));

/// Extract the job id from the `Location` of Bing's submission redirect.
///
/// Looks for a query parameter named exactly `id`, at any position, and
/// returns its percent-decoded value. Relative and absolute locations both
/// work. `.` and `..` are rejected since they can't name a path segment.
pub fn extract_job_id(redirect: &str) -> Result<JobId> {
    let without_fragment = redirect.split('#').next().unwrap_or_default();

    without_fragment
        .split_once('?')
        .and_then(|(_, query)| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|id| !matches!(id.as_str(), "" | "." | ".."))
        .map(JobId)
        .ok_or_else(|| {
            BingError::Parse(format!(
                "Failed to extract request ID from URL: {}",
                redirect
            ))
        })
}

/// Decode the five entities Bing escapes inside attribute values.
pub fn decode_html_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Every `src="..."` value in the fragment, entity-decoded, in document order.
pub fn extract_src_values(html: &str) -> Vec<String> {
    SRC_ATTR
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_html_entities(m.as_str()))
        .collect()
}

/// Pull canonical, deduplicated image URLs out of a finished result fragment.
///
/// # Errors
///
/// [`BingError::NoImagesFound`] when the fragment is empty or nothing
/// survives normalization and filtering.
pub fn extract_image_urls(html: &str) -> Result<Vec<String>> {
    if html.trim().is_empty() {
        return Err(BingError::NoImagesFound);
    }

    let urls = urls::normalize_urls(extract_src_values(html));
    if urls.is_empty() {
        return Err(BingError::NoImagesFound);
    }
    Ok(urls)
}

/// Decide what a poll response body means.
///
/// An empty body means the job is still running. A body that looks like JSON
/// is never a result: an `errorMessage` field becomes
/// [`BingError::UpstreamGeneration`], any other JSON (or broken JSON) becomes
/// [`BingError::UnexpectedResponse`]. Anything else is the finished HTML.
pub fn classify_poll_body(body: &str) -> Result<PollState> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(PollState::Pending);
    }

    if !trimmed.starts_with('{') {
        return Ok(PollState::Ready(body.to_string()));
    }

    let json: Value = serde_json::from_str(trimmed)
        .map_err(|e| BingError::UnexpectedResponse(format!("malformed JSON payload: {}", e)))?;

    match json.get("errorMessage").and_then(|v| v.as_str()) {
        Some(message) if !message.is_empty() => {
            Err(BingError::UpstreamGeneration(message.to_string()))
        }
        _ => Err(BingError::UnexpectedResponse(truncate(trimmed, 200))),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
