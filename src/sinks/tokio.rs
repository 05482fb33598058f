// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use async_trait::async_trait;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::net::UdpSocket;

use crate::sinks::core::AsyncMetricSink;
use crate::sinks::udp::get_addr;
use crate::types::MetricResult;

/// Implementation of an `AsyncMetricSink` that emits payloads over UDP
/// using a Tokio socket, suspending the calling task instead of
/// blocking its thread.
#[derive(Debug)]
pub struct TokioUdpMetricSink {
    addr: SocketAddr,
    socket: UdpSocket,
}

impl TokioUdpMetricSink {
    /// Construct a new `TokioUdpMetricSink` instance.
    ///
    /// The socket should already be bound to a local address. Must be
    /// called from within a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tokio::net::UdpSocket;
    /// use dogstatsd::{TokioUdpMetricSink, DEFAULT_PORT};
    ///
    /// # async fn example() {
    /// let socket = UdpSocket::bind("0.0.0.0:0").await.unwrap();
    /// let host = ("metrics.example.com", DEFAULT_PORT);
    /// let sink = TokioUdpMetricSink::from(host, socket).unwrap();
    /// # }
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn from<A>(to_addr: A, socket: UdpSocket) -> MetricResult<TokioUdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        Ok(TokioUdpMetricSink { addr, socket })
    }
}

#[async_trait]
impl AsyncMetricSink for TokioUdpMetricSink {
    async fn emit(&self, metric: &str) -> io::Result<usize> {
        self.socket.send_to(metric.as_bytes(), self.addr).await
    }
}

#[cfg(unix)]
pub use self::unix::TokioUnixMetricSink;

#[cfg(unix)]
mod unix {
    use async_trait::async_trait;
    use std::io;
    use std::path::{Path, PathBuf};
    use tokio::net::UnixDatagram;

    use crate::sinks::core::AsyncMetricSink;

    /// Implementation of an `AsyncMetricSink` that emits payloads over
    /// a Unix datagram socket using Tokio.
    #[derive(Debug)]
    pub struct TokioUnixMetricSink {
        path: PathBuf,
        socket: UnixDatagram,
    }

    impl TokioUnixMetricSink {
        /// Construct a new `TokioUnixMetricSink` instance.
        ///
        /// The socket does not need to be bound or connected, only
        /// created. Must be called from within a Tokio runtime.
        ///
        /// # Example
        ///
        /// ```no_run
        /// use tokio::net::UnixDatagram;
        /// use dogstatsd::TokioUnixMetricSink;
        ///
        /// let socket = UnixDatagram::unbound().unwrap();
        /// let sink = TokioUnixMetricSink::from("/var/run/datadog/dsd.socket", socket);
        /// ```
        pub fn from<P>(path: P, socket: UnixDatagram) -> TokioUnixMetricSink
        where
            P: AsRef<Path>,
        {
            TokioUnixMetricSink {
                path: path.as_ref().to_path_buf(),
                socket,
            }
        }
    }

    #[async_trait]
    impl AsyncMetricSink for TokioUnixMetricSink {
        async fn emit(&self, metric: &str) -> io::Result<usize> {
            self.socket.send_to(metric.as_bytes(), &self.path).await
        }
    }
}
