// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A DogStatsD client written in Rust.
//!
//! Dogstatsd is a client for the Datadog flavor of the Statsd protocol.
//! It encodes counters, timers, gauges, histograms, distributions,
//! meters, and sets along with DogStatsD events and service checks, and
//! sends them to a server over UDP or Unix datagram sockets, blocking
//! or async.
//!
//! ## Features
//!
//! * Support for all DogStatsD metric types plus events and service
//!   checks
//! * Client side sampling of immediate sends
//! * Buffering of commands into multi-metric payloads under the
//!   caller's control
//! * Constant tags, including the `dd.internal.entity_id` tag derived
//!   from the environment
//! * Timing wrappers that record how long a closure ran, even when it
//!   panics
//! * UDP and Unix datagram transports with blocking and Tokio-based
//!   async sinks
//!
//! ## Usage
//!
//! Typical usage binds a local UDP socket, points a sink at the
//! DogStatsD server, and wraps it in a client:
//!
//! ```no_run
//! use std::net::UdpSocket;
//! use dogstatsd::{MetricKind, StatsdClient, UdpMetricSink, DEFAULT_PORT};
//!
//! let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
//! let sink = UdpMetricSink::from(("localhost", DEFAULT_PORT), socket).unwrap();
//! let mut client = StatsdClient::builder("my.app.", sink)
//!     .with_tag("env", "prod")
//!     .build();
//!
//! // sent immediately, one datagram each
//! client.send(MetricKind::Counting, "requests", 1, &["route:index"]);
//! client.send_sampled(MetricKind::Timing, "latency", 35, 0.5, &[]);
//!
//! // buffered and sent as a single datagram
//! client.add(MetricKind::Gauge, "connections", 42, &[]);
//! client.add(MetricKind::Set, "users", 508, &[]);
//! client.flush();
//! ```
//!
//! Events and service checks use the same client:
//!
//! ```no_run
//! use dogstatsd::{Event, EventAlertType, NopMetricSink, ServiceCheck, StatsdClient};
//!
//! let mut client = StatsdClient::from_sink("my.app.", NopMetricSink);
//!
//! let event = Event::new("deploy", "version 2 is live")
//!     .with_alert_type(EventAlertType::Info);
//! client.send_event(&event, &["service:api"]).unwrap();
//!
//! let check = ServiceCheck::new("app.healthcheck", 0)
//!     .with_message("all good");
//! client.send_service_check(&check, &[]).unwrap();
//! ```
//!
//! Async transports work the same way through the `*_async` methods:
//!
//! ```no_run
//! use dogstatsd::{MetricKind, StatsdClient, TokioUdpMetricSink, DEFAULT_PORT};
//! use tokio::net::UdpSocket;
//!
//! # async fn example() {
//! let socket = UdpSocket::bind("0.0.0.0:0").await.unwrap();
//! let sink = TokioUdpMetricSink::from(("localhost", DEFAULT_PORT), socket).unwrap();
//! let mut client = StatsdClient::from_sink("my.app.", sink);
//!
//! client.send_async(MetricKind::Counting, "requests", 1, &[]).await;
//! # }
//! ```
//!
//! ## Errors and transport failures
//!
//! Encoding problems (an oversize event, a `|` in a service check name)
//! are returned to the caller as [`MetricError`]. Socket failures never
//! are: every send variant logs them via `tracing` and drops the
//! payload, so emitting metrics cannot take the application down with
//! it.

#![forbid(unsafe_code)]

mod buffer;
mod client;
mod encoder;
mod sampler;
mod sinks;
mod stopwatch;
mod types;


pub use crate::client::{StatsdClient, StatsdClientBuilder, DD_ENTITY_ID_ENV_VAR, ENTITY_ID_TAG_KEY};
pub use crate::encoder::{Event, EventAlertType, EventPriority, ServiceCheck};
pub use crate::sampler::{RandomSampler, Sampler};
pub use crate::sinks::{AsyncMetricSink, MetricSink, NopMetricSink, SpyMetricSink, TokioUdpMetricSink, UdpMetricSink};
pub use crate::stopwatch::{Stopwatch, StopwatchFactory, SystemStopwatchFactory};
pub use crate::types::{MetricError, MetricKind, MetricResult, MetricValue, MAX_PAYLOAD_LEN};

#[cfg(unix)]
pub use crate::sinks::{TokioUnixMetricSink, UnixMetricSink};

/// Default port that a DogStatsD server listens on.
pub const DEFAULT_PORT: u16 = 8125;
