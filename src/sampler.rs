// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::Rng;

/// Gate deciding whether a sampled command is transmitted.
///
/// Only the immediate send path consults the gate. Buffered commands
/// are always recorded, with the sample rate merely embedded in the
/// encoded line. Implementations can be swapped on the client builder
/// to make tests deterministic.
pub trait Sampler {
    /// Should a command with the given sample rate be sent? Rates are
    /// expected in `(0.0, 1.0]` where `1.0` means always send.
    fn should_send(&self, rate: f64) -> bool;
}

/// Default `Sampler` backed by the thread-local RNG.
#[derive(Debug, Clone, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn should_send(&self, rate: f64) -> bool {
        if rate >= 1.0 {
            return true;
        }

        rand::thread_rng().gen_bool(rate.max(0.0))
    }
}
