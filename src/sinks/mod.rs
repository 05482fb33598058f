// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod core;
mod spy;
mod tokio;
mod udp;

pub use crate::sinks::core::{AsyncMetricSink, MetricSink, NopMetricSink};
pub use crate::sinks::spy::SpyMetricSink;
pub use crate::sinks::tokio::TokioUdpMetricSink;
pub use crate::sinks::udp::UdpMetricSink;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use crate::sinks::tokio::TokioUnixMetricSink;
#[cfg(unix)]
pub use crate::sinks::unix::UnixMetricSink;
