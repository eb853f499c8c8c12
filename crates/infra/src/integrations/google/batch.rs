//! `multipart/mixed` codec for the Google batch endpoint.
//!
//! Each part of a request carries one embedded HTTP request and a
//! `Content-ID`; the response echoes that id (prefixed with `response-`) on
//! the part holding the embedded HTTP response.

use caledit_domain::{CalEditError, EventUpdate, Result};

use super::types::DescriptionPatch;

/// Maximum number of calls Google accepts in one batch request.
pub const MAX_BATCH_CALLS: usize = 50;

/// Content-ID for the `index`-th call of a batch.
pub fn content_id(index: usize) -> String {
    format!("item-{}", index + 1)
}

/// Encode description PATCH calls for one calendar.
pub fn encode_request(boundary: &str, calendar_id: &str, updates: &[EventUpdate]) -> Result<String> {
    let calendar = urlencoding::encode(calendar_id);
    let mut body = String::new();

    for (index, update) in updates.iter().enumerate() {
        let payload = serde_json::to_string(&DescriptionPatch {
            description: &update.new_description,
        })
        .map_err(|e| CalEditError::Internal(format!("failed to encode patch body: {e}")))?;

        body.push_str(&format!("--{boundary}\r\n"));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str(&format!("Content-ID: <{}>\r\n\r\n", content_id(index)));
        body.push_str(&format!(
            "PATCH /calendar/v3/calendars/{calendar}/events/{} HTTP/1.1\r\n",
            urlencoding::encode(&update.event_id)
        ));
        body.push_str("Content-Type: application/json; charset=UTF-8\r\n");
        body.push_str(&format!("Content-Length: {}\r\n\r\n", payload.len()));
        body.push_str(&payload);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Ok(body)
}

/// One embedded response from a batch reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartResponse {
    /// Request Content-ID this part answers (`item-N`).
    pub content_id: String,
    pub status: u16,
    pub body: String,
}

impl PartResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Extract the `boundary` parameter of a `multipart/mixed` content type.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.trim().split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"').to_string())
            .filter(|boundary| !boundary.is_empty())
    })
}

/// Decode a batch response body into its parts.
///
/// Parts without a Content-ID or a readable status line are dropped; the
/// caller treats the matching requests as unanswered.
pub fn decode_response(content_type: &str, body: &str) -> Result<Vec<PartResponse>> {
    let boundary = boundary_from_content_type(content_type).ok_or_else(|| {
        CalEditError::InvalidInput(format!("batch response has no boundary: {content_type}"))
    })?;
    let delimiter = format!("--{boundary}");

    let mut parts = Vec::new();
    for segment in body.split(delimiter.as_str()).skip(1) {
        if segment.starts_with("--") {
            break;
        }
        if let Some(part) = decode_part(segment) {
            parts.push(part);
        }
    }
    Ok(parts)
}

fn decode_part(segment: &str) -> Option<PartResponse> {
    let (part_headers, embedded) = split_head(segment.trim_start_matches(['\r', '\n']))?;

    let content_id = header_value(part_headers, "content-id")?;
    let content_id = content_id.trim_start_matches('<').trim_end_matches('>');
    let content_id = content_id.strip_prefix("response-").unwrap_or(content_id).to_string();

    let (response_head, response_body) =
        split_head(embedded).unwrap_or((embedded, ""));
    let status_line = response_head.lines().next()?;
    let status = status_line.split_whitespace().nth(1)?.parse::<u16>().ok()?;

    Some(PartResponse { content_id, status, body: response_body.trim().to_string() })
}

/// Split a header block from what follows the first blank line.
fn split_head(text: &str) -> Option<(&str, &str)> {
    if let Some(index) = text.find("\r\n\r\n") {
        return Some((&text[..index], &text[index + 4..]));
    }
    text.find("\n\n").map(|index| (&text[..index], &text[index + 2..]))
}

fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}
