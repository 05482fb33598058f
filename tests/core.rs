// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crossbeam_channel::Receiver;
use dogstatsd::{Event, MetricKind, ServiceCheck, SpyMetricSink, StatsdClient};

fn new_spy_client(prefix: &str) -> (Receiver<Vec<u8>>, StatsdClient<SpyMetricSink>) {
    let (rx, sink) = SpyMetricSink::new();
    (rx, StatsdClient::from_sink(prefix, sink))
}

fn payloads(rx: &Receiver<Vec<u8>>) -> Vec<String> {
    rx.try_iter().map(|v| String::from_utf8(v).unwrap()).collect()
}

#[test]
fn test_buffered_commands_flush_as_one_payload() {
    let (rx, mut client) = new_spy_client("");

    client.add_sampled(MetricKind::Counting, "counter", 1, 0.1, &[]);
    client.add(MetricKind::Timing, "timer", 1, &[]);

    assert_eq!(2, client.pending());
    client.flush();

    assert_eq!(vec!["counter:1|c|@0.1\ntimer:1|ms"], payloads(&rx));
    assert_eq!(0, client.pending());
}

#[test]
fn test_single_buffered_command_sent_verbatim() {
    let (rx, mut client) = new_spy_client("");

    client.add(MetricKind::Counting, "counter", 1, &[]);
    client.flush();

    assert_eq!(vec!["counter:1|c"], payloads(&rx));
}

#[test]
fn test_immediate_send_with_default_rate() {
    let (rx, mut client) = new_spy_client("");

    client.send(MetricKind::Counting, "counter", 5, &[]);
    assert_eq!(vec!["counter:5|c"], payloads(&rx));
}

#[test]
fn test_each_metric_kind_on_the_wire() {
    let (rx, mut client) = new_spy_client("");

    client.send(MetricKind::Counting, "counter", 5, &[]);
    client.send(MetricKind::Timing, "timer", 5, &[]);
    client.send(MetricKind::Gauge, "gauge", 5, &[]);
    client.send(MetricKind::Histogram, "histogram", 5, &[]);
    client.send(MetricKind::Distribution, "dist", 5, &[]);
    client.send(MetricKind::Meter, "meter", 5, &[]);
    client.send(MetricKind::Set, "set", 5, &[]);

    assert_eq!(
        vec![
            "counter:5|c",
            "timer:5|ms",
            "gauge:5|g",
            "histogram:5|h",
            "dist:5|d",
            "meter:5|m",
            "set:5|s",
        ],
        payloads(&rx)
    );
}

#[test]
fn test_prefix_applied_to_buffered_and_sent_metrics() {
    let (rx, mut client) = new_spy_client("another.prefix.");

    client.add_sampled(MetricKind::Counting, "counter", 1, 0.1, &[]);
    client.add(MetricKind::Timing, "timer", 1, &[]);
    client.flush();

    assert_eq!(
        vec!["another.prefix.counter:1|c|@0.1\nanother.prefix.timer:1|ms"],
        payloads(&rx)
    );
}

#[test]
fn test_any_send_discards_buffered_commands() {
    let (rx, mut client) = new_spy_client("");

    client.add(MetricKind::Counting, "counter", 1, &[]);
    client.send(MetricKind::Timing, "timer", 1, &[]);

    assert_eq!(vec!["timer:1|ms"], payloads(&rx));

    // nothing left over from before the send
    client.flush();
    assert!(payloads(&rx).is_empty());
}

#[test]
fn test_event_newlines_and_header_lengths() {
    let (rx, mut client) = new_spy_client("");

    let event = Event::new("t", "line1\r\nline2");
    client.send_event(&event, &[]).unwrap();

    assert_eq!(vec!["_e{1,11}:t|line1\\nline2"], payloads(&rx));
}

#[test]
fn test_service_check_round_trip() {
    let (rx, mut client) = new_spy_client("");

    let check = ServiceCheck::new("app.ok", 2)
        .with_hostname("web01")
        .with_message("on fire");
    client.send_service_check(&check, &["env:prod"]).unwrap();

    assert_eq!(vec!["_sc|app.ok|2|h:web01|#env:prod|m:on fire"], payloads(&rx));
}

#[test]
fn test_buffered_events_and_checks_mix_with_metrics() {
    let (rx, mut client) = new_spy_client("");

    client.add(MetricKind::Counting, "counter", 1, &[]);
    client.add_event(&Event::new("deploy", "done"), &[]).unwrap();
    client.add_service_check(&ServiceCheck::new("app.ok", 0), &[]).unwrap();
    client.flush();

    assert_eq!(vec!["counter:1|c\n_e{6,4}:deploy|done\n_sc|app.ok|0"], payloads(&rx));
}
