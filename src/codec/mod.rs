#![doc = r#"
Event level encoding and decoding

Both directions thread a [`RunningStatus`] through consecutive events of one
chunk. It holds the status byte of the last channel voice message, which a
reader falls back on when an event starts with a data byte, and a writer may
leave out when it repeats.

```text
90 3C 40 | 3E 40 | 80 3C 00
^ status   ^ running status reused
```
"#]

mod decode;
pub use decode::*;

mod encode;
pub use encode::*;

/// The status byte of the last channel message in the current chunk pass.
///
/// A fresh value is created for every chunk read or written and dropped
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningStatus(Option<u8>);

impl RunningStatus {
    /// No running status
    pub const fn new() -> Self {
        Self(None)
    }
    /// The current status byte
    pub const fn get(&self) -> Option<u8> {
        self.0
    }
    /// Remember `status` for the following events
    pub fn set(&mut self, status: u8) {
        self.0 = Some(status);
    }
    /// Forget the running status
    pub fn clear(&mut self) {
        self.0 = None;
    }
}
