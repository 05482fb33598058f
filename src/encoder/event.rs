// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{self, Write};

use crate::encoder::{escape_newlines, shorten_by, strip_cr, tag_suffix_len, write_tag_suffix};
use crate::types::{MetricError, MetricResult, MAX_PAYLOAD_LEN};

/// Priority of a DogStatsD event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPriority {
    Low,
    Normal,
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPriority::Low => "low".fmt(f),
            EventPriority::Normal => "normal".fmt(f),
        }
    }
}

/// Alert type of a DogStatsD event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAlertType {
    Info,
    Error,
    Warning,
    Success,
}

impl fmt::Display for EventAlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventAlertType::Info => "info".fmt(f),
            EventAlertType::Error => "error".fmt(f),
            EventAlertType::Warning => "warning".fmt(f),
            EventAlertType::Success => "success".fmt(f),
        }
    }
}

/// A DogStatsD event, sent to the server's event stream rather than as
/// a metric sample.
///
/// Title and text are required, everything else is optional and only
/// written to the wire when set.
///
/// # Example
///
/// ```
/// use dogstatsd::{Event, EventAlertType, EventPriority};
///
/// let event = Event::new("deploy", "version 2 is live")
///     .with_alert_type(EventAlertType::Info)
///     .with_priority(EventPriority::Low)
///     .with_hostname("web01.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct Event<'a> {
    title: &'a str,
    text: &'a str,
    date_happened: Option<i64>,
    hostname: Option<&'a str>,
    aggregation_key: Option<&'a str>,
    priority: Option<EventPriority>,
    source_type_name: Option<&'a str>,
    alert_type: Option<EventAlertType>,
    truncate: bool,
}

impl<'a> Event<'a> {
    pub fn new(title: &'a str, text: &'a str) -> Self {
        Event {
            title,
            text,
            date_happened: None,
            hostname: None,
            aggregation_key: None,
            priority: None,
            source_type_name: None,
            alert_type: None,
            truncate: false,
        }
    }

    /// Unix timestamp, in seconds, of when the event happened.
    pub fn with_date_happened(mut self, timestamp: i64) -> Self {
        self.date_happened = Some(timestamp);
        self
    }

    pub fn with_hostname(mut self, hostname: &'a str) -> Self {
        self.hostname = Some(hostname);
        self
    }

    pub fn with_aggregation_key(mut self, key: &'a str) -> Self {
        self.aggregation_key = Some(key);
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_source_type_name(mut self, name: &'a str) -> Self {
        self.source_type_name = Some(name);
        self
    }

    pub fn with_alert_type(mut self, alert_type: EventAlertType) -> Self {
        self.alert_type = Some(alert_type);
        self
    }

    /// Shorten this event to fit the payload limit even when the
    /// client was not built with truncation enabled.
    pub fn truncate_oversize(mut self) -> Self {
        self.truncate = true;
        self
    }
}

/// Encode an event as `_e{titleLen,textLen}:title|text` followed by the
/// optional fields in their fixed order and then any tags.
///
/// The header lengths count the characters of the title and text after
/// carriage returns are stripped but before newlines are escaped. When
/// the encoded command exceeds [`MAX_PAYLOAD_LEN`] bytes and `truncate`
/// is set, the longer of title and text is shortened by the overage and
/// the command encoded again. All other fields are never altered.
pub(crate) fn format_event(
    event: &Event<'_>,
    constant_tags: &[String],
    tags: &[&str],
    truncate: bool,
) -> MetricResult<String> {
    let truncate = truncate || event.truncate;
    let title = strip_cr(event.title);
    let text = strip_cr(event.text);

    let encoded = encode(&title, &text, event, constant_tags, tags);
    if encoded.len() <= MAX_PAYLOAD_LEN {
        return Ok(encoded);
    }

    if !truncate {
        return Err(MetricError::PayloadTooBig { len: encoded.len() });
    }

    let overage = encoded.len() - MAX_PAYLOAD_LEN;
    let (title, text) = if title.chars().count() > text.chars().count() {
        (shorten_by(&title, overage, encoded.len())?, text)
    } else {
        (title, shorten_by(&text, overage, encoded.len())?)
    };

    Ok(encode(&title, &text, event, constant_tags, tags))
}

fn encode(title: &str, text: &str, event: &Event<'_>, constant_tags: &[String], tags: &[&str]) -> String {
    let escaped_title = escape_newlines(title);
    let escaped_text = escape_newlines(text);

    let base = 16 + escaped_title.len() + escaped_text.len();
    let mut out = String::with_capacity(base + 64 + tag_suffix_len(constant_tags, tags));

    let _ = write!(
        out,
        "_e{{{},{}}}:{}|{}",
        title.chars().count(),
        text.chars().count(),
        escaped_title,
        escaped_text
    );

    if let Some(timestamp) = event.date_happened {
        let _ = write!(out, "|d:{}", timestamp);
    }

    if let Some(hostname) = event.hostname {
        let _ = write!(out, "|h:{}", hostname);
    }

    if let Some(key) = event.aggregation_key {
        let _ = write!(out, "|k:{}", key);
    }

    if let Some(priority) = event.priority {
        let _ = write!(out, "|p:{}", priority);
    }

    if let Some(name) = event.source_type_name {
        let _ = write!(out, "|s:{}", name);
    }

    if let Some(alert_type) = event.alert_type {
        let _ = write!(out, "|t:{}", alert_type);
    }

    write_tag_suffix(&mut out, constant_tags, tags);
    out
}
