// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::Write;

use crate::encoder::{escape_newlines, shorten_by, strip_cr, tag_suffix_len, write_tag_suffix};
use crate::types::{MetricError, MetricResult, MAX_PAYLOAD_LEN};

/// A DogStatsD service check, reporting the status of a service.
///
/// The status is sent as the raw integer the server expects (0 OK,
/// 1 warning, 2 critical, 3 unknown).
///
/// # Example
///
/// ```
/// use dogstatsd::ServiceCheck;
///
/// let check = ServiceCheck::new("app.healthcheck", 0)
///     .with_hostname("web01.example.com")
///     .with_message("all good");
/// ```
#[derive(Debug, Clone)]
pub struct ServiceCheck<'a> {
    name: &'a str,
    status: i32,
    timestamp: Option<i64>,
    hostname: Option<&'a str>,
    message: Option<&'a str>,
    truncate: bool,
}

impl<'a> ServiceCheck<'a> {
    pub fn new(name: &'a str, status: i32) -> Self {
        ServiceCheck {
            name,
            status,
            timestamp: None,
            hostname: None,
            message: None,
            truncate: false,
        }
    }

    /// Unix timestamp, in seconds, of when the check was run.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_hostname(mut self, hostname: &'a str) -> Self {
        self.hostname = Some(hostname);
        self
    }

    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// Shorten this check's message to fit the payload limit even when
    /// the client was not built with truncation enabled.
    pub fn truncate_oversize(mut self) -> Self {
        self.truncate = true;
        self
    }
}

/// Encode a service check as `_sc|name|status` followed by the optional
/// timestamp and hostname fields, tags, and the message always last.
///
/// The name is newline-escaped and must not contain `|` afterwards. The
/// message is newline-escaped and any `m:` occurrence becomes `m\:` so
/// the message cannot be mistaken for a field marker. When the encoded
/// command exceeds [`MAX_PAYLOAD_LEN`] bytes and `truncate` is set, only
/// the message may absorb the overage.
pub(crate) fn format_service_check(
    check: &ServiceCheck<'_>,
    constant_tags: &[String],
    tags: &[&str],
    truncate: bool,
) -> MetricResult<String> {
    let truncate = truncate || check.truncate;
    let name = escape_newlines(&strip_cr(check.name));
    if name.contains('|') {
        return Err(MetricError::InvalidInput("service check name may not contain '|'"));
    }

    let message = check
        .message
        .map(|m| escape_newlines(&strip_cr(m)).replace("m:", "m\\:"));

    let encoded = encode(&name, message.as_deref(), check, constant_tags, tags);
    if encoded.len() <= MAX_PAYLOAD_LEN {
        return Ok(encoded);
    }

    if !truncate {
        return Err(MetricError::PayloadTooBig { len: encoded.len() });
    }

    let overage = encoded.len() - MAX_PAYLOAD_LEN;
    let message = match message {
        Some(m) => shorten_by(&m, overage, encoded.len())?,
        None => return Err(MetricError::PayloadTooBig { len: encoded.len() }),
    };

    Ok(encode(&name, Some(&message), check, constant_tags, tags))
}

fn encode(
    name: &str,
    message: Option<&str>,
    check: &ServiceCheck<'_>,
    constant_tags: &[String],
    tags: &[&str],
) -> String {
    let base = 8 + name.len() + message.map_or(0, |m| m.len() + 3);
    let mut out = String::with_capacity(base + 32 + tag_suffix_len(constant_tags, tags));

    let _ = write!(out, "_sc|{}|{}", name, check.status);

    if let Some(timestamp) = check.timestamp {
        let _ = write!(out, "|d:{}", timestamp);
    }

    if let Some(hostname) = check.hostname {
        let _ = write!(out, "|h:{}", hostname);
    }

    write_tag_suffix(&mut out, constant_tags, tags);

    if let Some(message) = message {
        let _ = write!(out, "|m:{}", message);
    }

    out
}
