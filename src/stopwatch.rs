// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::{Duration, Instant};

/// Elapsed-time measurement used by the timing wrappers.
///
/// Implementations accumulate time between `start` and `stop` calls
/// and report the total in whole milliseconds.
pub trait Stopwatch {
    fn start(&mut self);
    fn stop(&mut self);
    fn elapsed_ms(&self) -> u64;
}

/// Factory handing out fresh stopwatches, injectable on the client
/// builder so tests can control measured durations.
pub trait StopwatchFactory {
    fn get(&self) -> Box<dyn Stopwatch + Send>;
}

/// Default factory producing monotonic-clock stopwatches.
#[derive(Debug, Clone, Default)]
pub struct SystemStopwatchFactory;

impl StopwatchFactory for SystemStopwatchFactory {
    fn get(&self) -> Box<dyn Stopwatch + Send> {
        Box::new(SystemStopwatch::default())
    }
}

#[derive(Debug, Default)]
struct SystemStopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch for SystemStopwatch {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}
