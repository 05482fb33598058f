// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Encoders that turn metrics, events, and service checks into the
//! Statsd/DogStatsD text protocol.

use crate::types::{MetricError, MetricResult};

mod check;
mod event;
mod metric;

pub use self::check::ServiceCheck;
pub use self::event::{Event, EventAlertType, EventPriority};

pub(crate) use self::check::format_service_check;
pub(crate) use self::event::format_event;
pub(crate) use self::metric::MetricFormatter;

const TAG_PREFIX: &str = "|#";

/// Append the `|#tag1,tag2` suffix for the combined constant and
/// per-call tags, writing nothing when both are empty. Tags are sent
/// verbatim, in order, constant tags first.
pub(crate) fn write_tag_suffix(out: &mut String, constant_tags: &[String], tags: &[&str]) {
    if constant_tags.is_empty() && tags.is_empty() {
        return;
    }

    out.push_str(TAG_PREFIX);

    let mut first = true;
    for tag in constant_tags.iter().map(String::as_str).chain(tags.iter().copied()) {
        if !first {
            out.push(',');
        }
        out.push_str(tag);
        first = false;
    }
}

/// Number of bytes `write_tag_suffix` will append, used for sizing
/// string allocations before writing a command.
pub(crate) fn tag_suffix_len(constant_tags: &[String], tags: &[&str]) -> usize {
    let count = constant_tags.len() + tags.len();
    if count == 0 {
        return 0;
    }

    let values: usize = constant_tags.iter().map(|t| t.len()).sum::<usize>() + tags.iter().map(|t| t.len()).sum::<usize>();

    TAG_PREFIX.len() + values + count - 1
}

/// Strip carriage returns from free-form text fields.
fn strip_cr(val: &str) -> String {
    val.replace('\r', "")
}

/// Escape embedded newlines as the literal two characters `\n`.
fn escape_newlines(val: &str) -> String {
    val.replace('\n', "\\n")
}

/// Drop `overage` characters from the end of `val`, failing when the
/// field is too short to absorb the excess.
fn shorten_by(val: &str, overage: usize, encoded_len: usize) -> MetricResult<String> {
    let chars = val.chars().count();
    if chars < overage {
        return Err(MetricError::PayloadTooBig { len: encoded_len });
    }

    Ok(val.chars().take(chars - overage).collect())
}

#[cfg(test)]
mod tests {
    use super::{escape_newlines, shorten_by, strip_cr, tag_suffix_len, write_tag_suffix};

    fn suffix(constant_tags: &[String], tags: &[&str]) -> String {
        let mut out = String::new();
        write_tag_suffix(&mut out, constant_tags, tags);
        out
    }

    #[test]
    fn test_tag_suffix_empty() {
        assert_eq!("", &suffix(&[], &[]));
    }

    #[test]
    fn test_tag_suffix_call_tags_only() {
        assert_eq!("|#host:web01,env:prod", &suffix(&[], &["host:web01", "env:prod"]));
    }

    #[test]
    fn test_tag_suffix_constant_tags_first() {
        let constant = vec!["region:us-east-1".to_owned()];
        assert_eq!("|#region:us-east-1,host:web01", &suffix(&constant, &["host:web01"]));
    }

    #[test]
    fn test_tag_suffix_no_dedup() {
        let constant = vec!["env:prod".to_owned()];
        assert_eq!("|#env:prod,env:prod", &suffix(&constant, &["env:prod"]));
    }

    #[test]
    fn test_tag_suffix_len_matches_written() {
        let constant = vec!["region:us-east-1".to_owned()];
        let tags = ["host:web01", "env:prod"];
        let written = suffix(&constant, &tags);
        assert_eq!(written.len(), tag_suffix_len(&constant, &tags));
        assert_eq!(0, tag_suffix_len(&[], &[]));
    }

    #[test]
    fn test_strip_cr_and_escape_newlines() {
        assert_eq!("line1\\nline2", escape_newlines(&strip_cr("line1\r\nline2")));
        assert_eq!("plain", escape_newlines(&strip_cr("plain")));
    }

    #[test]
    fn test_shorten_by() {
        assert_eq!("abc", shorten_by("abcde", 2, 9000).unwrap());
        assert_eq!("", shorten_by("ab", 2, 9000).unwrap());
        assert!(shorten_by("ab", 3, 9000).is_err());
    }
}
