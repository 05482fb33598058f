// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use async_trait::async_trait;
use std::io;

/// Trait for various backends that send DogStatsD payloads somewhere.
///
/// The payload will be in the canonical text format, one or more
/// commands joined with newlines and no trailing newline. Sinks are
/// handed complete payloads; batching decisions are made by the client
/// and its command buffer, not here.
///
/// ``` text
/// some.counter:123|c
/// some.timer:456|ms|@0.5
/// _e{6,4}:deploy|done
/// _sc|app.ok|0
/// ```
pub trait MetricSink {
    /// Send the payload using this sink and return the number of bytes
    /// written or an I/O error.
    fn emit(&self, metric: &str) -> io::Result<usize>;
}

/// Asynchronous counterpart to `MetricSink` for transports that suspend
/// on the socket write instead of blocking the calling thread.
#[async_trait]
pub trait AsyncMetricSink {
    /// Send the payload using this sink and return the number of bytes
    /// written or an I/O error.
    async fn emit(&self, metric: &str) -> io::Result<usize>;
}

/// Implementation of a `MetricSink` that discards all payloads.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopMetricSink;

impl MetricSink for NopMetricSink {
    fn emit(&self, _metric: &str) -> io::Result<usize> {
        Ok(0)
    }
}

#[async_trait]
impl AsyncMetricSink for NopMetricSink {
    async fn emit(&self, _metric: &str) -> io::Result<usize> {
        Ok(0)
    }
}
