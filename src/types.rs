// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io;
use thiserror::Error;

/// Maximum length, in bytes, of an encoded event or service check.
///
/// Payloads over this limit are either truncated (when the client was
/// built with truncation enabled) or rejected with
/// [`MetricError::PayloadTooBig`].
pub const MAX_PAYLOAD_LEN: usize = 8 * 1024;

/// Kind of metric to emit, determining the unit written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counting,
    Timing,
    Gauge,
    Histogram,
    Distribution,
    Meter,
    Set,
}

impl MetricKind {
    pub(crate) fn unit(self) -> &'static str {
        match self {
            MetricKind::Counting => "c",
            MetricKind::Timing => "ms",
            MetricKind::Gauge => "g",
            MetricKind::Histogram => "h",
            MetricKind::Distribution => "d",
            MetricKind::Meter => "m",
            MetricKind::Set => "s",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit())
    }
}

/// Value of a metric, wrapping the numeric types a Statsd server accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
            MetricValue::Float(v) => v.fmt(f),
        }
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        MetricValue::Signed(v.into())
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Signed(v)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Unsigned(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

/// Potential errors raised while encoding commands or setting up sockets.
///
/// Transmission failures are never surfaced through this type. Once a
/// command has been encoded the client logs socket errors and discards
/// them, so only caller mistakes and oversize payloads show up here.
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("encoded payload of {len} bytes exceeds the {MAX_PAYLOAD_LEN} byte limit")]
    PayloadTooBig { len: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type MetricResult<T> = Result<T, MetricError>;
