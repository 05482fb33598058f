// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::Write;

use crate::encoder::{tag_suffix_len, write_tag_suffix};
use crate::types::{MetricKind, MetricValue};

/// Encoder for a single metric line.
///
/// Produces `{prefix}{name}:{value}|{unit}[|@{rate}]{tags}`. The prefix
/// is written verbatim in front of the name, the sample rate segment is
/// omitted when the rate is `1.0`, and the rate is embedded whether or
/// not the command actually went through a sampling gate.
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    key: &'a str,
    val: MetricValue,
    kind: MetricKind,
    sample_rate: f64,
    constant_tags: &'a [String],
    tags: &'a [&'a str],
}

impl<'a> MetricFormatter<'a> {
    pub(crate) fn new(
        prefix: &'a str,
        key: &'a str,
        val: MetricValue,
        kind: MetricKind,
        sample_rate: f64,
        constant_tags: &'a [String],
        tags: &'a [&'a str],
    ) -> Self {
        MetricFormatter {
            prefix,
            key,
            val,
            kind,
            sample_rate,
            constant_tags,
            tags,
        }
    }

    fn base_size(&self) -> usize {
        // the ':' separator, up to 20 digits of value, '|' and a two
        // character unit, and "|@" plus a short rate
        self.prefix.len() + self.key.len() + 1 + 20 + 3 + 8
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.base_size() + tag_suffix_len(self.constant_tags, self.tags));

        let _ = write!(out, "{}{}:{}|{}", self.prefix, self.key, self.val, self.kind.unit());
        if self.sample_rate != 1.0 {
            let _ = write!(out, "|@{}", self.sample_rate);
        }

        write_tag_suffix(&mut out, self.constant_tags, self.tags);
        out
    }
}
