// Dogstatsd - A DogStatsD client for Rust!
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Ordered buffer of encoded commands waiting to be sent as one payload.
///
/// Commands are held exactly as encoded. Flushing joins them with
/// newlines and empties the buffer in the same call so no command can
/// be sent twice.
#[derive(Debug, Default)]
pub(crate) struct CommandBuffer {
    commands: Vec<String>,
}

impl CommandBuffer {
    pub(crate) fn new() -> Self {
        CommandBuffer { commands: Vec::new() }
    }

    pub(crate) fn append(&mut self, command: String) {
        self.commands.push(command);
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the buffered commands as a single newline-joined payload,
    /// leaving the buffer empty. Returns `None` when there is nothing
    /// buffered. A single command is returned verbatim.
    pub(crate) fn flush(&mut self) -> Option<String> {
        if self.commands.is_empty() {
            return None;
        }

        let payload = self.commands.join("\n");
        self.commands.clear();
        Some(payload)
    }
}
