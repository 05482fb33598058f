// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

use crate::buffer::CommandBuffer;
use crate::encoder::{format_event, format_service_check, Event, MetricFormatter, ServiceCheck};
use crate::sampler::{RandomSampler, Sampler};
use crate::sinks::{AsyncMetricSink, MetricSink};
use crate::stopwatch::{Stopwatch, StopwatchFactory, SystemStopwatchFactory};
use crate::types::{MetricKind, MetricResult, MetricValue};

/// Environment variable holding the id of the entity (pod, container)
/// the process runs in, injected by the Datadog agent's admission
/// controller.
pub const DD_ENTITY_ID_ENV_VAR: &str = "DD_ENTITY_ID";

/// Tag key the entity id is reported under.
pub const ENTITY_ID_TAG_KEY: &str = "dd.internal.entity_id";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builder for creating and customizing `StatsdClient` instances.
///
/// Instances of the builder should be created by calling the `builder`
/// method on the `StatsdClient` struct.
///
/// # Example
///
/// ```
/// use dogstatsd::{MetricKind, NopMetricSink, StatsdClient};
///
/// let mut client = StatsdClient::builder("my.prefix.", NopMetricSink)
///     .with_tag("env", "prod")
///     .with_tag_value("runs-in-containers")
///     .build();
///
/// client.send(MetricKind::Counting, "requests", 1, &[]);
/// ```
#[must_use]
pub struct StatsdClientBuilder<S> {
    prefix: String,
    sink: S,
    sampler: Box<dyn Sampler + Send + Sync>,
    stopwatches: Box<dyn StopwatchFactory + Send + Sync>,
    constant_tags: Vec<String>,
    truncate_oversize: bool,
    env_lookup: EnvLookup,
}

impl<S> StatsdClientBuilder<S> {
    fn new(prefix: &str, sink: S) -> Self {
        StatsdClientBuilder {
            prefix: prefix.to_owned(),
            sink,
            sampler: Box::new(RandomSampler),
            stopwatches: Box::new(SystemStopwatchFactory),
            constant_tags: Vec::new(),
            truncate_oversize: false,
            env_lookup: Box::new(|name| env::var(name).ok()),
        }
    }

    /// Add a constant key-value tag applied to every command.
    pub fn with_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.constant_tags.push(format!("{}:{}", key, value));
        self
    }

    /// Add a constant value-only tag applied to every command.
    pub fn with_tag_value<V>(mut self, value: V) -> Self
    where
        V: fmt::Display,
    {
        self.constant_tags.push(value.to_string());
        self
    }

    /// Use a custom gate for deciding whether sampled sends go out.
    pub fn with_sampler<M>(mut self, sampler: M) -> Self
    where
        M: Sampler + Send + Sync + 'static,
    {
        self.sampler = Box::new(sampler);
        self
    }

    /// Use a custom source of stopwatches for the timing wrappers.
    pub fn with_stopwatch_factory<F>(mut self, factory: F) -> Self
    where
        F: StopwatchFactory + Send + Sync + 'static,
    {
        self.stopwatches = Box::new(factory);
        self
    }

    /// Use a custom environment lookup when deriving the entity id tag,
    /// instead of reading the process environment.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Shorten oversize events and service checks to fit the payload
    /// limit instead of rejecting them. Individual events and checks
    /// can also opt in via their own `truncate_oversize` method.
    pub fn truncate_oversize(mut self, truncate: bool) -> Self {
        self.truncate_oversize = truncate;
        self
    }

    /// Construct a new `StatsdClient` from the builder.
    ///
    /// If none of the constant tags carries an entity id and the
    /// `DD_ENTITY_ID` environment variable is set to a non-empty value,
    /// a `dd.internal.entity_id` tag is appended.
    pub fn build(self) -> StatsdClient<S> {
        let mut constant_tags = self.constant_tags;

        let already_tagged = constant_tags.iter().any(|t| t.starts_with(ENTITY_ID_TAG_KEY));
        if !already_tagged {
            if let Some(entity_id) = (self.env_lookup)(DD_ENTITY_ID_ENV_VAR).filter(|v| !v.is_empty()) {
                constant_tags.push(format!("{}:{}", ENTITY_ID_TAG_KEY, entity_id));
            }
        }

        StatsdClient {
            prefix: self.prefix,
            sink: self.sink,
            sampler: self.sampler,
            stopwatches: self.stopwatches,
            constant_tags,
            truncate_oversize: self.truncate_oversize,
            commands: CommandBuffer::new(),
        }
    }
}

/// Client for DogStatsD servers that encodes metrics, events, and
/// service checks and hands the resulting payloads to a sink.
///
/// Commands are either sent immediately (`send*` methods) or buffered
/// (`add*` methods) until a dispatch operation transmits them in a
/// single datagram. The client is generic over the sink type: sinks
/// implementing [`MetricSink`](crate::MetricSink) get the blocking send
/// methods, sinks implementing
/// [`AsyncMetricSink`](crate::AsyncMetricSink) get the `*_async`
/// counterparts, and sinks implementing both get both.
///
/// The prefix is written in front of every metric name exactly as
/// given, so it usually ends with a `.` separator.
///
/// Methods take `&mut self`: a client instance belongs to a single
/// owner and does no locking of its own. Wrap it yourself if it needs
/// to be shared.
///
/// Transmission failures are logged and swallowed by every send
/// variant. Errors returned by event and service check methods are
/// encoding failures, detected before anything touches the network.
///
/// # Example
///
/// ```no_run
/// use std::net::UdpSocket;
/// use dogstatsd::{MetricKind, StatsdClient, UdpMetricSink, DEFAULT_PORT};
///
/// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
/// let sink = UdpMetricSink::from(("localhost", DEFAULT_PORT), socket).unwrap();
/// let mut client = StatsdClient::from_sink("my.app.", sink);
///
/// client.send(MetricKind::Counting, "requests", 1, &["route:index"]);
/// client.add(MetricKind::Gauge, "connections", 42, &[]);
/// client.add(MetricKind::Timing, "latency", 35, &[]);
/// client.flush();
/// ```
pub struct StatsdClient<S> {
    prefix: String,
    sink: S,
    sampler: Box<dyn Sampler + Send + Sync>,
    stopwatches: Box<dyn StopwatchFactory + Send + Sync>,
    constant_tags: Vec<String>,
    truncate_oversize: bool,
    commands: CommandBuffer,
}

impl<S> StatsdClient<S> {
    /// Create a new client with the default sampler, stopwatch source,
    /// and no constant tags.
    pub fn from_sink(prefix: &str, sink: S) -> Self {
        Self::builder(prefix, sink).build()
    }

    /// Create a builder for constructing a new client with custom
    /// tags, sampling, or timing behavior.
    pub fn builder(prefix: &str, sink: S) -> StatsdClientBuilder<S> {
        StatsdClientBuilder::new(prefix, sink)
    }

    /// Encode a metric and append it to the command buffer.
    ///
    /// Nothing is transmitted until a dispatch operation such as
    /// [`flush`](StatsdClient::flush) runs.
    pub fn add<V>(&mut self, kind: MetricKind, key: &str, value: V, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        self.add_sampled(kind, key, value, 1.0, tags)
    }

    /// Encode a metric with a sample rate and append it to the command
    /// buffer.
    ///
    /// The rate is embedded in the encoded line but the sampling gate
    /// is never consulted for buffered commands. Every `add` is
    /// recorded.
    pub fn add_sampled<V>(&mut self, kind: MetricKind, key: &str, value: V, sample_rate: f64, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        let command = self.metric_command(kind, key, value.into(), sample_rate, tags);
        self.commands.append(command);
    }

    /// Encode an event and append it to the command buffer.
    pub fn add_event(&mut self, event: &Event<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_event(event, &self.constant_tags, tags, self.truncate_oversize)?;
        self.commands.append(command);
        Ok(())
    }

    /// Encode a service check and append it to the command buffer.
    pub fn add_service_check(&mut self, check: &ServiceCheck<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_service_check(check, &self.constant_tags, tags, self.truncate_oversize)?;
        self.commands.append(command);
        Ok(())
    }

    /// Time the execution of a closure and buffer the elapsed
    /// milliseconds as a Timing metric.
    ///
    /// The metric is recorded even when the closure panics, and the
    /// panic still propagates to the caller.
    pub fn add_timed<F, R>(&mut self, key: &str, sample_rate: f64, tags: &[&str], operation: F) -> R
    where
        F: FnOnce() -> R,
    {
        let mut watch = self.stopwatches.get();
        watch.start();

        let _guard = BufferTimingGuard {
            client: self,
            watch,
            key,
            sample_rate,
            tags,
        };
        operation()
    }

    /// Number of commands currently held in the buffer.
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    fn metric_command(&self, kind: MetricKind, key: &str, value: MetricValue, sample_rate: f64, tags: &[&str]) -> String {
        MetricFormatter::new(&self.prefix, key, value, kind, sample_rate, &self.constant_tags, tags).format()
    }
}

impl<S> StatsdClient<S>
where
    S: MetricSink,
{
    /// Encode a metric and transmit it immediately.
    pub fn send<V>(&mut self, kind: MetricKind, key: &str, value: V, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        self.send_sampled(kind, key, value, 1.0, tags)
    }

    /// Encode a metric with a sample rate and transmit it immediately,
    /// subject to the sampling gate.
    ///
    /// When the gate vetoes the rate this is a complete no-op: nothing
    /// is transmitted and the command buffer is left alone.
    pub fn send_sampled<V>(&mut self, kind: MetricKind, key: &str, value: V, sample_rate: f64, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        if !self.sampler.should_send(sample_rate) {
            return;
        }

        let command = self.metric_command(kind, key, value.into(), sample_rate, tags);
        self.send_raw(&command);
    }

    /// Encode an event and transmit it immediately. Events are never
    /// sampled.
    pub fn send_event(&mut self, event: &Event<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_event(event, &self.constant_tags, tags, self.truncate_oversize)?;
        self.send_raw(&command);
        Ok(())
    }

    /// Encode a service check and transmit it immediately. Service
    /// checks are never sampled.
    pub fn send_service_check(&mut self, check: &ServiceCheck<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_service_check(check, &self.constant_tags, tags, self.truncate_oversize)?;
        self.send_raw(&command);
        Ok(())
    }

    /// Transmit a single pre-encoded command.
    ///
    /// Every transmission empties the command buffer first, whether or
    /// not the payload came from the buffer. Callers relying on
    /// buffered commands must flush before any immediate send.
    pub fn send_raw(&mut self, command: &str) {
        self.commands.clear();
        if let Err(err) = self.sink.emit(command) {
            warn!(error = %err, "discarding payload after transport failure");
        }
    }

    /// Transmit all buffered commands as one newline-joined payload,
    /// emptying the buffer. Does nothing when the buffer is empty.
    pub fn flush(&mut self) {
        if let Some(payload) = self.commands.flush() {
            self.send_raw(&payload);
        }
    }

    /// Time the execution of a closure and transmit the elapsed
    /// milliseconds as a Timing metric, subject to the sampling gate.
    ///
    /// The metric is recorded even when the closure panics, and the
    /// panic still propagates to the caller.
    pub fn send_timed<F, R>(&mut self, key: &str, sample_rate: f64, tags: &[&str], operation: F) -> R
    where
        F: FnOnce() -> R,
    {
        let mut watch = self.stopwatches.get();
        watch.start();

        let _guard = SendTimingGuard {
            client: self,
            watch,
            key,
            sample_rate,
            tags,
        };
        operation()
    }
}

impl<S> StatsdClient<S>
where
    S: AsyncMetricSink,
{
    /// Encode a metric and transmit it immediately, suspending on the
    /// socket write.
    pub async fn send_async<V>(&mut self, kind: MetricKind, key: &str, value: V, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        self.send_sampled_async(kind, key, value, 1.0, tags).await
    }

    /// Encode a metric with a sample rate and transmit it immediately,
    /// subject to the sampling gate, suspending on the socket write.
    pub async fn send_sampled_async<V>(&mut self, kind: MetricKind, key: &str, value: V, sample_rate: f64, tags: &[&str])
    where
        V: Into<MetricValue>,
    {
        if !self.sampler.should_send(sample_rate) {
            return;
        }

        let command = self.metric_command(kind, key, value.into(), sample_rate, tags);
        self.send_raw_async(&command).await;
    }

    /// Encode an event and transmit it immediately, suspending on the
    /// socket write. Events are never sampled.
    pub async fn send_event_async(&mut self, event: &Event<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_event(event, &self.constant_tags, tags, self.truncate_oversize)?;
        self.send_raw_async(&command).await;
        Ok(())
    }

    /// Encode a service check and transmit it immediately, suspending
    /// on the socket write. Service checks are never sampled.
    pub async fn send_service_check_async(&mut self, check: &ServiceCheck<'_>, tags: &[&str]) -> MetricResult<()> {
        let command = format_service_check(check, &self.constant_tags, tags, self.truncate_oversize)?;
        self.send_raw_async(&command).await;
        Ok(())
    }

    /// Transmit a single pre-encoded command, suspending on the socket
    /// write. Like [`send_raw`](StatsdClient::send_raw) this empties
    /// the command buffer first.
    pub async fn send_raw_async(&mut self, command: &str) {
        self.commands.clear();
        if let Err(err) = self.sink.emit(command).await {
            warn!(error = %err, "discarding payload after transport failure");
        }
    }

    /// Transmit all buffered commands as one newline-joined payload,
    /// emptying the buffer. Does nothing when the buffer is empty.
    pub async fn flush_async(&mut self) {
        if let Some(payload) = self.commands.flush() {
            self.send_raw_async(&payload).await;
        }
    }

    /// Time the execution of a closure and transmit the elapsed
    /// milliseconds as a Timing metric, subject to the sampling gate.
    ///
    /// The metric is recorded even when the closure panics, and the
    /// panic still propagates to the caller after the transport write
    /// completes.
    pub async fn send_timed_async<F, R>(&mut self, key: &str, sample_rate: f64, tags: &[&str], operation: F) -> R
    where
        F: FnOnce() -> R,
    {
        let mut watch = self.stopwatches.get();
        watch.start();

        let outcome = panic::catch_unwind(AssertUnwindSafe(operation));

        watch.stop();
        self.send_sampled_async(MetricKind::Timing, key, watch.elapsed_ms(), sample_rate, tags)
            .await;

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<S> fmt::Debug for StatsdClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClient {{ prefix: {:?}, constant_tags: {:?}, pending: {}, sink: ..., sampler: ... }}",
            self.prefix,
            self.constant_tags,
            self.commands.len()
        )
    }
}

struct BufferTimingGuard<'a, 'k, S> {
    client: &'a mut StatsdClient<S>,
    watch: Box<dyn Stopwatch + Send>,
    key: &'k str,
    sample_rate: f64,
    tags: &'k [&'k str],
}

impl<S> Drop for BufferTimingGuard<'_, '_, S> {
    fn drop(&mut self) {
        self.watch.stop();
        let elapsed = self.watch.elapsed_ms();
        self.client
            .add_sampled(MetricKind::Timing, self.key, elapsed, self.sample_rate, self.tags);
    }
}

struct SendTimingGuard<'a, 'k, S: MetricSink> {
    client: &'a mut StatsdClient<S>,
    watch: Box<dyn Stopwatch + Send>,
    key: &'k str,
    sample_rate: f64,
    tags: &'k [&'k str],
}

impl<S: MetricSink> Drop for SendTimingGuard<'_, '_, S> {
    fn drop(&mut self) {
        self.watch.stop();
        let elapsed = self.watch.elapsed_ms();
        self.client
            .send_sampled(MetricKind::Timing, self.key, elapsed, self.sample_rate, self.tags);
    }
}

#[cfg(test)]
mod tests {
    use super::{StatsdClient, DD_ENTITY_ID_ENV_VAR};
    use crate::sampler::Sampler;
    use crate::sinks::{MetricSink, NopMetricSink, SpyMetricSink};
    use crate::stopwatch::{Stopwatch, StopwatchFactory};
    use crate::types::{MetricError, MetricKind};
    use crate::{Event, ServiceCheck};
    use std::io;
    use std::panic::{self, AssertUnwindSafe};

    struct RejectSampler;

    impl Sampler for RejectSampler {
        fn should_send(&self, _rate: f64) -> bool {
            false
        }
    }

    struct AcceptSampler;

    impl Sampler for AcceptSampler {
        fn should_send(&self, _rate: f64) -> bool {
            true
        }
    }

    struct FixedStopwatchFactory(u64);

    struct FixedStopwatch(u64);

    impl Stopwatch for FixedStopwatch {
        fn start(&mut self) {}

        fn stop(&mut self) {}

        fn elapsed_ms(&self) -> u64 {
            self.0
        }
    }

    impl StopwatchFactory for FixedStopwatchFactory {
        fn get(&self) -> Box<dyn Stopwatch + Send> {
            Box::new(FixedStopwatch(self.0))
        }
    }

    struct ErrorMetricSink;

    impl MetricSink for ErrorMetricSink {
        fn emit(&self, _metric: &str) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::Other))
        }
    }

    fn received(rx: &crossbeam_channel::Receiver<Vec<u8>>) -> Vec<String> {
        rx.try_iter().map(|v| String::from_utf8(v).unwrap()).collect()
    }

    #[test]
    fn test_send_counter() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        client.send(MetricKind::Counting, "counter", 5, &[]);
        assert_eq!(vec!["counter:5|c"], received(&rx));
    }

    #[test]
    fn test_send_counter_with_sample_rate() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink).with_sampler(AcceptSampler).build();

        client.send_sampled(MetricKind::Counting, "counter", 5, 0.1, &[]);
        assert_eq!(vec!["counter:5|c|@0.1"], received(&rx));
    }

    #[test]
    fn test_send_applies_prefix() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("a.prefix.", sink);

        client.send(MetricKind::Counting, "counter", 5, &[]);
        assert_eq!(vec!["a.prefix.counter:5|c"], received(&rx));
    }

    #[test]
    fn test_sampler_veto_is_a_complete_noop() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink).with_sampler(RejectSampler).build();

        client.add(MetricKind::Counting, "counter", 1, &[]);
        client.send_sampled(MetricKind::Counting, "sampled", 1, 0.5, &[]);

        assert!(received(&rx).is_empty());
        assert_eq!(1, client.pending());
    }

    #[test]
    fn test_add_never_consults_sampler() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink).with_sampler(RejectSampler).build();

        client.add_sampled(MetricKind::Counting, "counter", 1, 0.1, &[]);
        client.flush();

        assert_eq!(vec!["counter:1|c|@0.1"], received(&rx));
    }

    #[test]
    fn test_flush_joins_buffered_commands() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        client.add_sampled(MetricKind::Counting, "counter", 1, 0.1, &[]);
        client.add(MetricKind::Timing, "timer", 1, &[]);
        client.flush();

        assert_eq!(vec!["counter:1|c|@0.1\ntimer:1|ms"], received(&rx));
        assert_eq!(0, client.pending());
    }

    #[test]
    fn test_flush_with_empty_buffer_transmits_nothing() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        client.flush();
        assert!(received(&rx).is_empty());
    }

    #[test]
    fn test_immediate_send_discards_buffered_commands() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        client.add(MetricKind::Counting, "counter", 1, &[]);
        client.send(MetricKind::Timing, "timer", 1, &[]);

        assert_eq!(vec!["timer:1|ms"], received(&rx));
        assert_eq!(0, client.pending());
    }

    #[test]
    fn test_constant_tags_precede_call_tags() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink).with_tag("env", "prod").build();

        client.send(MetricKind::Gauge, "gauge", 5, &["host:web01"]);
        assert_eq!(vec!["gauge:5|g|#env:prod,host:web01"], received(&rx));
    }

    #[test]
    fn test_entity_id_tag_from_environment() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_env_lookup(|name| {
                if name == DD_ENTITY_ID_ENV_VAR {
                    Some("04652bb7-19b7".to_owned())
                } else {
                    None
                }
            })
            .build();

        client.send(MetricKind::Counting, "counter", 1, &[]);
        assert_eq!(vec!["counter:1|c|#dd.internal.entity_id:04652bb7-19b7"], received(&rx));
    }

    #[test]
    fn test_entity_id_tag_not_duplicated() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_tag("dd.internal.entity_id", "already-set")
            .with_env_lookup(|_| Some("04652bb7-19b7".to_owned()))
            .build();

        client.send(MetricKind::Counting, "counter", 1, &[]);
        assert_eq!(vec!["counter:1|c|#dd.internal.entity_id:already-set"], received(&rx));
    }

    #[test]
    fn test_empty_entity_id_adds_no_tag() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_env_lookup(|_| Some(String::new()))
            .build();

        client.send(MetricKind::Counting, "counter", 1, &[]);
        assert_eq!(vec!["counter:1|c"], received(&rx));
    }

    #[test]
    fn test_transport_failure_is_swallowed() {
        let mut client = StatsdClient::from_sink("", ErrorMetricSink);
        client.send(MetricKind::Counting, "counter", 5, &[]);
        client.flush();
    }

    #[test]
    fn test_send_event() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        let event = Event::new("t", "line1\r\nline2");
        client.send_event(&event, &[]).unwrap();

        assert_eq!(vec!["_e{1,11}:t|line1\\nline2"], received(&rx));
    }

    #[test]
    fn test_event_encode_error_propagates() {
        let mut client = StatsdClient::from_sink("", NopMetricSink);
        let text = "x".repeat(9000);
        let event = Event::new("t", &text);

        match client.send_event(&event, &[]) {
            Err(MetricError::PayloadTooBig { .. }) => (),
            res => panic!("expected PayloadTooBig, got {:?}", res),
        }
    }

    #[test]
    fn test_truncate_oversize_flag_applies_to_events() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink).truncate_oversize(true).build();

        let text = "x".repeat(9000);
        let event = Event::new("t", &text);
        client.send_event(&event, &[]).unwrap();

        let sent = received(&rx);
        assert_eq!(1, sent.len());
        assert_eq!(crate::MAX_PAYLOAD_LEN, sent[0].len());
    }

    #[test]
    fn test_per_event_truncation_without_client_flag() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        let text = "x".repeat(9000);
        let event = Event::new("t", &text).truncate_oversize();
        client.send_event(&event, &[]).unwrap();

        let sent = received(&rx);
        assert_eq!(1, sent.len());
        assert_eq!(crate::MAX_PAYLOAD_LEN, sent[0].len());
    }

    #[test]
    fn test_send_service_check() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("", sink);

        let check = ServiceCheck::new("app.ok", 0).with_message("fine");
        client.send_service_check(&check, &[]).unwrap();

        assert_eq!(vec!["_sc|app.ok|0|m:fine"], received(&rx));
    }

    #[test]
    fn test_prefix_not_applied_to_events_or_checks() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::from_sink("a.prefix.", sink);

        client.send_event(&Event::new("t", "text"), &[]).unwrap();
        client.send_service_check(&ServiceCheck::new("app.ok", 0), &[]).unwrap();

        assert_eq!(vec!["_e{1,4}:t|text", "_sc|app.ok|0"], received(&rx));
    }

    #[test]
    fn test_add_timed_buffers_elapsed_time() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_stopwatch_factory(FixedStopwatchFactory(500))
            .build();

        let result = client.add_timed("name", 1.0, &[], || 5);

        assert_eq!(5, result);
        assert_eq!(1, client.pending());
        client.flush();
        assert_eq!(vec!["name:500|ms"], received(&rx));
    }

    #[test]
    fn test_add_timed_records_on_panic() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_stopwatch_factory(FixedStopwatchFactory(500))
            .build();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            client.add_timed("name", 1.0, &[], || panic!("boom"));
        }));

        assert!(outcome.is_err());
        assert_eq!(1, client.pending());
        client.flush();
        assert_eq!(vec!["name:500|ms"], received(&rx));
    }

    #[test]
    fn test_send_timed_transmits_elapsed_time() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_stopwatch_factory(FixedStopwatchFactory(500))
            .build();

        client.send_timed("name", 1.0, &[], || ());
        assert_eq!(vec!["name:500|ms"], received(&rx));
    }

    #[test]
    fn test_send_timed_records_on_panic() {
        let (rx, sink) = SpyMetricSink::new();
        let mut client = StatsdClient::builder("", sink)
            .with_stopwatch_factory(FixedStopwatchFactory(500))
            .build();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            client.send_timed("name", 1.0, &[], || panic!("boom"));
        }));

        assert!(outcome.is_err());
        assert_eq!(vec!["name:500|ms"], received(&rx));
    }
}
