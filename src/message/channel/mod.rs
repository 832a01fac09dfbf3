#![doc = r#"
Channel voice messages

A channel status byte carries the message type in its high nibble and the
channel in its low nibble:

```text
 status  | params | message
---------+--------+------------------
 0x8n    |   2    | Note Off
 0x9n    |   2    | Note On
 0xAn    |   2    | Polyphonic Aftertouch
 0xBn    |   2    | Control Change
 0xCn    |   1    | Program Change
 0xDn    |   1    | Channel Pressure
 0xEn    |   2    | Pitch Bend
```

Mode messages (controllers 120 to 127) are carried as Control Change.
"#]

use crate::{Channel, DataByte};

/// A channel voice message: a [`VoiceEvent`] addressed to a [`Channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Address `event` to `channel`
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Note On. Parameters are masked to seven bits.
    pub const fn note_on(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(
            channel,
            VoiceEvent::NoteOn {
                note: DataByte::new_masked(note),
                velocity: DataByte::new_masked(velocity),
            },
        )
    }

    /// Note Off. Parameters are masked to seven bits.
    pub const fn note_off(channel: Channel, note: u8, velocity: u8) -> Self {
        Self::new(
            channel,
            VoiceEvent::NoteOff {
                note: DataByte::new_masked(note),
                velocity: DataByte::new_masked(velocity),
            },
        )
    }

    /// Control Change. Parameters are masked to seven bits.
    pub const fn control_change(channel: Channel, controller: u8, value: u8) -> Self {
        Self::new(
            channel,
            VoiceEvent::ControlChange {
                controller: DataByte::new_masked(controller),
                value: DataByte::new_masked(value),
            },
        )
    }

    /// Program Change. The program is masked to seven bits.
    pub const fn program_change(channel: Channel, program: u8) -> Self {
        Self::new(
            channel,
            VoiceEvent::ProgramChange {
                program: DataByte::new_masked(program),
            },
        )
    }

    /// The addressed channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// The full status byte
    pub const fn status(&self) -> u8 {
        self.event.kind().status_nibble() | self.channel.index()
    }

    /// Note On with zero velocity
    pub const fn is_silent_note_on(&self) -> bool {
        matches!(self.event, VoiceEvent::NoteOn { velocity, .. } if velocity.0 == 0)
    }

    /// Turns a zero velocity Note On into the equivalent Note Off
    pub(crate) fn silent_note_on_to_note_off(self) -> Self {
        match self.event {
            VoiceEvent::NoteOn { note, velocity } if velocity.0 == 0 => {
                Self::new(self.channel, VoiceEvent::NoteOff { note, velocity })
            }
            _ => self,
        }
    }

    /// Turns a Note Off into a Note On with zero velocity
    pub(crate) fn note_off_to_silent_note_on(self) -> Self {
        match self.event {
            VoiceEvent::NoteOff { note, .. } => Self::new(
                self.channel,
                VoiceEvent::NoteOn {
                    note,
                    velocity: DataByte(0),
                },
            ),
            _ => self,
        }
    }
}

/// The payload of a channel voice message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum VoiceEvent {
    NoteOff { note: DataByte, velocity: DataByte },
    NoteOn { note: DataByte, velocity: DataByte },
    Aftertouch { note: DataByte, pressure: DataByte },
    ControlChange { controller: DataByte, value: DataByte },
    ProgramChange { program: DataByte },
    ChannelPressure { pressure: DataByte },
    /// Fourteen bit bend, least significant byte first as on the wire
    PitchBend { lsb: DataByte, msb: DataByte },
}

impl VoiceEvent {
    /// The kind of this event
    pub const fn kind(&self) -> VoiceKind {
        match self {
            Self::NoteOff { .. } => VoiceKind::NoteOff,
            Self::NoteOn { .. } => VoiceKind::NoteOn,
            Self::Aftertouch { .. } => VoiceKind::Aftertouch,
            Self::ControlChange { .. } => VoiceKind::ControlChange,
            Self::ProgramChange { .. } => VoiceKind::ProgramChange,
            Self::ChannelPressure { .. } => VoiceKind::ChannelPressure,
            Self::PitchBend { .. } => VoiceKind::PitchBend,
        }
    }

    /// The parameters in wire order. Single parameter events leave the second unused.
    pub const fn params(&self) -> [DataByte; 2] {
        let unused = DataByte(0);
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => [note, velocity],
            Self::Aftertouch { note, pressure } => [note, pressure],
            Self::ControlChange { controller, value } => [controller, value],
            Self::ProgramChange { program } => [program, unused],
            Self::ChannelPressure { pressure } => [pressure, unused],
            Self::PitchBend { lsb, msb } => [lsb, msb],
        }
    }

    /// Pitch bend as a value in `0..=0x3FFF`, centered on `0x2000`
    pub const fn pitch_bend_value(&self) -> Option<u16> {
        match self {
            Self::PitchBend { lsb, msb } => Some(((msb.0 as u16) << 7) | lsb.0 as u16),
            _ => None,
        }
    }
}

/// The kinds of channel voice message, keyed by status nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum VoiceKind {
    NoteOff,
    NoteOn,
    Aftertouch,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl VoiceKind {
    /// Look up the kind from the high nibble of a status byte
    pub const fn from_status(status: u8) -> Option<Self> {
        Some(match status >> 4 {
            0x8 => Self::NoteOff,
            0x9 => Self::NoteOn,
            0xA => Self::Aftertouch,
            0xB => Self::ControlChange,
            0xC => Self::ProgramChange,
            0xD => Self::ChannelPressure,
            0xE => Self::PitchBend,
            _ => return None,
        })
    }

    /// The high nibble of the status byte
    pub const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff => 0x80,
            Self::NoteOn => 0x90,
            Self::Aftertouch => 0xA0,
            Self::ControlChange => 0xB0,
            Self::ProgramChange => 0xC0,
            Self::ChannelPressure => 0xD0,
            Self::PitchBend => 0xE0,
        }
    }

    /// Number of data bytes following the status
    pub const fn param_count(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// Build the event from its parameters in wire order
    pub const fn with_params(&self, first: DataByte, second: DataByte) -> VoiceEvent {
        match self {
            Self::NoteOff => VoiceEvent::NoteOff {
                note: first,
                velocity: second,
            },
            Self::NoteOn => VoiceEvent::NoteOn {
                note: first,
                velocity: second,
            },
            Self::Aftertouch => VoiceEvent::Aftertouch {
                note: first,
                pressure: second,
            },
            Self::ControlChange => VoiceEvent::ControlChange {
                controller: first,
                value: second,
            },
            Self::ProgramChange => VoiceEvent::ProgramChange { program: first },
            Self::ChannelPressure => VoiceEvent::ChannelPressure { pressure: first },
            Self::PitchBend => VoiceEvent::PitchBend {
                lsb: first,
                msb: second,
            },
        }
    }
}

#[test]
fn status_table() {
    use pretty_assertions::assert_eq;
    for status in 0x80..=0xEFu8 {
        let kind = VoiceKind::from_status(status).unwrap();
        assert_eq!(kind.status_nibble(), status & 0xF0);
    }
    assert_eq!(VoiceKind::from_status(0xF0), None);
    assert_eq!(VoiceKind::from_status(0x7F), None);
    assert_eq!(VoiceKind::ChannelPressure.param_count(), 1);
    assert_eq!(VoiceKind::PitchBend.param_count(), 2);
}

#[test]
fn silent_note_on_rewrites() {
    use pretty_assertions::assert_eq;
    let silent = ChannelVoiceMessage::note_on(Channel::Three, 64, 0);
    assert!(silent.is_silent_note_on());
    assert_eq!(
        silent.silent_note_on_to_note_off(),
        ChannelVoiceMessage::note_off(Channel::Three, 64, 0)
    );
    let off = ChannelVoiceMessage::note_off(Channel::Three, 64, 40);
    assert_eq!(off.note_off_to_silent_note_on(), silent);
    assert_eq!(off.status(), 0x82);
}
