#![doc = r#"
The events held by a track chunk.

```text
                       |-------------|
                       | TrackEvent  |  delta ticks + message
                       |-------------|
                              |
     |---------------------------------------------------------|
     |              |            |               |             |
 ChannelVoice     Meta     SystemExclusive  SystemCommon  SystemRealTime
```

A [`TrackEvent`] only knows its distance in ticks from the previous event of
the same chunk. [`Ticked`] pairs an event with its absolute tick for the
algorithms that reorder events across chunks.
"#]

pub mod channel;
pub mod meta;
pub mod system;

use channel::ChannelVoiceMessage;
use meta::MetaMessage;
use system::{SystemCommonMessage, SystemExclusiveMessage, SystemRealTimeMessage};

use crate::Channel;

/// One event of a track chunk
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create an event `delta_ticks` after the previous one
    pub fn new(delta_ticks: u32, message: impl Into<TrackMessage>) -> Self {
        Self {
            delta_ticks,
            message: message.into(),
        }
    }
    /// Ticks since the previous event in the chunk
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }
    /// Replace the delta
    pub fn set_delta_ticks(&mut self, delta_ticks: u32) {
        self.delta_ticks = delta_ticks;
    }
    /// Builder form of [`TrackEvent::set_delta_ticks`]
    pub fn with_delta_ticks(mut self, delta_ticks: u32) -> Self {
        self.delta_ticks = delta_ticks;
        self
    }
    /// The event's content
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
    /// Mutable access to the event's content
    pub fn message_mut(&mut self) -> &mut TrackMessage {
        &mut self.message
    }
    /// Drop the delta
    pub fn into_message(self) -> TrackMessage {
        self.message
    }
}

/// The content of a [`TrackEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum TrackMessage {
    /// Status `0x80..=0xEF`
    ChannelVoice(ChannelVoiceMessage),
    /// Status `0xFF`
    Meta(MetaMessage),
    /// Status `0xF0` or `0xF7`
    SystemExclusive(SystemExclusiveMessage),
    /// Status `0xF1`, `0xF2`, `0xF3` or `0xF6`
    SystemCommon(SystemCommonMessage),
    /// Status `0xF8..=0xFE`
    SystemRealTime(SystemRealTimeMessage),
}

impl TrackMessage {
    /// True for meta events
    pub const fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }
    /// The channel of a channel voice message
    pub const fn channel(&self) -> Option<Channel> {
        match self {
            Self::ChannelVoice(m) => Some(m.channel()),
            _ => None,
        }
    }
    /// The meta message, if this is one
    pub const fn as_meta(&self) -> Option<&MetaMessage> {
        match self {
            Self::Meta(m) => Some(m),
            _ => None,
        }
    }
}

impl From<ChannelVoiceMessage> for TrackMessage {
    fn from(value: ChannelVoiceMessage) -> Self {
        Self::ChannelVoice(value)
    }
}
impl From<MetaMessage> for TrackMessage {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}
impl From<SystemExclusiveMessage> for TrackMessage {
    fn from(value: SystemExclusiveMessage) -> Self {
        Self::SystemExclusive(value)
    }
}
impl From<SystemCommonMessage> for TrackMessage {
    fn from(value: SystemCommonMessage) -> Self {
        Self::SystemCommon(value)
    }
}
impl From<SystemRealTimeMessage> for TrackMessage {
    fn from(value: SystemRealTimeMessage) -> Self {
        Self::SystemRealTime(value)
    }
}

/// A value positioned at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticked<T> {
    ticks: u64,
    event: T,
}

impl<T> Ticked<T> {
    /// Place `event` at `ticks`
    pub const fn new(ticks: u64, event: T) -> Self {
        Self { ticks, event }
    }
    /// Absolute position in ticks
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
    /// The positioned value
    pub const fn event(&self) -> &T {
        &self.event
    }
    /// Unwrap the positioned value
    pub fn into_event(self) -> T {
        self.event
    }
}
