// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use crate::sinks::core::MetricSink;

/// Implementation of a `MetricSink` that emits payloads over a Unix
/// datagram socket, the transport the Datadog agent exposes on hosts
/// where UDP is undesirable.
///
/// Each payload is sent to the socket path when the `.emit()` method is
/// called, in the thread of the caller.
#[derive(Debug)]
pub struct UnixMetricSink {
    path: PathBuf,
    socket: UnixDatagram,
}

impl UnixMetricSink {
    /// Construct a new `UnixMetricSink` instance.
    ///
    /// The socket does not need to be bound or connected, only created.
    /// Any desired configuration (non-blocking mode, timeouts, etc.)
    /// should be applied before constructing the sink.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::os::unix::net::UnixDatagram;
    /// use dogstatsd::UnixMetricSink;
    ///
    /// let socket = UnixDatagram::unbound().unwrap();
    /// let sink = UnixMetricSink::from("/var/run/datadog/dsd.socket", socket);
    /// ```
    pub fn from<P>(path: P, socket: UnixDatagram) -> UnixMetricSink
    where
        P: AsRef<Path>,
    {
        UnixMetricSink {
            path: path.as_ref().to_path_buf(),
            socket,
        }
    }
}

impl MetricSink for UnixMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        self.socket.send_to(metric.as_bytes(), &self.path)
    }
}
