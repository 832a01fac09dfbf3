use pretty_assertions::assert_eq;
use smfkit::{
    codec::{encoded_len, read_event, write_event},
    prelude::*,
};

fn read_all(bytes: &[u8], settings: &ReadSettings) -> ReadResult<Vec<TrackEvent>> {
    let mut reader = Reader::from_byte_slice(bytes);
    let mut running_status = RunningStatus::new();
    let mut events = Vec::new();
    while !reader.is_at_end() {
        if let Some(event) = read_event(&mut reader, &mut running_status, settings)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn write_all(events: &[TrackEvent], use_running_status: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let mut running_status = RunningStatus::new();
    for event in events {
        write_event(event, &mut out, &mut running_status, use_running_status).unwrap();
    }
    out
}

fn chord() -> Vec<TrackEvent> {
    vec![
        TrackEvent::new(0, ChannelVoiceMessage::note_on(Channel::Three, 60, 100)),
        TrackEvent::new(0, ChannelVoiceMessage::note_on(Channel::Three, 64, 100)),
        TrackEvent::new(0, ChannelVoiceMessage::note_on(Channel::Three, 67, 100)),
        TrackEvent::new(200, ChannelVoiceMessage::note_on(Channel::Three, 60, 0)),
    ]
}

#[test]
fn running_status_on_the_wire() {
    let events = chord();
    assert_eq!(
        write_all(&events, true),
        [
            0x00, 0x92, 60, 100, //
            0x00, 64, 100, //
            0x00, 67, 100, //
            0x81, 0x48, 60, 0,
        ]
    );
    assert_eq!(write_all(&events, false).len(), 4 * 4 + 1);

    let settings = ReadSettings::default().with_silent_note_on(SilentNoteOnPolicy::NoteOn);
    assert_eq!(read_all(&write_all(&events, true), &settings).unwrap(), events);
}

#[test]
fn sysex_clears_the_writers_running_status() {
    let events = [
        TrackEvent::new(0, ChannelVoiceMessage::control_change(Channel::One, 7, 100)),
        TrackEvent::new(0, SystemExclusiveMessage::Normal(vec![0x7E, 0x7F, 0x09, 0x01, 0xF7])),
        TrackEvent::new(0, ChannelVoiceMessage::control_change(Channel::One, 10, 64)),
    ];
    let bytes = write_all(&events, true);
    // the status byte is repeated after the system exclusive event
    assert_eq!(&bytes[bytes.len() - 3..], [0xB0, 10, 64]);
    assert_eq!(read_all(&bytes, &ReadSettings::default()).unwrap(), events);
}

#[test]
fn encoded_len_tracks_running_status() {
    let events = chord();
    for use_running_status in [false, true] {
        let mut running_status = RunningStatus::new();
        let predicted: usize = events
            .iter()
            .map(|e| encoded_len(e, &mut running_status, use_running_status).unwrap())
            .sum();
        assert_eq!(predicted, write_all(&events, use_running_status).len());
    }
}

#[test]
fn data_byte_without_status() {
    let err = read_all(&[0x00, 0x3C, 0x40], &ReadSettings::default()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::UnexpectedRunningStatus)
    );
    assert_eq!(err.position(), 1);
}

#[test]
fn invalid_data_bytes() {
    let bytes = [0x00, 0x90, 0x3C, 0xC0];
    let err = read_all(&bytes, &ReadSettings::default()).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::InvalidDataByte(0xC0))
    );

    let cases = [
        (InvalidDataBytePolicy::ReadValid, 0x40),
        (InvalidDataBytePolicy::SnapToLimits, 0x7F),
    ];
    for (policy, velocity) in cases {
        let settings = ReadSettings::default().with_invalid_data_byte(policy);
        assert_eq!(
            read_all(&bytes, &settings).unwrap(),
            [TrackEvent::new(
                0,
                ChannelVoiceMessage::note_on(Channel::One, 0x3C, velocity)
            )],
            "{policy:?}"
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Loop {
    start: u16,
}

impl CustomMetaEvent for Loop {
    fn read(&mut self, payload: &[u8]) -> Result<(), MetaError> {
        let [a, b, ..] = payload else {
            return Err(MetaError::Length {
                kind: "Loop",
                expected: 2,
                actual: payload.len(),
            });
        };
        self.start = u16::from_be_bytes([*a, *b]);
        Ok(())
    }
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.start.to_be_bytes());
    }
    fn clone_boxed(&self) -> Box<dyn CustomMetaEvent> {
        Box::new(self.clone())
    }
}

#[test]
fn registered_meta_types_are_decoded() {
    // the third payload byte is unknown to `Loop` and skipped
    let bytes = [0x00, 0xFF, 0x60, 0x03, 0x01, 0x02, 0x09];

    let plain = read_all(&bytes, &ReadSettings::default()).unwrap();
    assert_eq!(
        plain[0].message(),
        &TrackMessage::from(MetaMessage::Unknown {
            status: 0x60,
            data: vec![0x01, 0x02, 0x09]
        })
    );

    let settings = ReadSettings::default().with_custom_meta::<Loop>(0x60);
    let decoded = read_all(&bytes, &settings).unwrap();
    let expected = TrackEvent::new(
        0,
        MetaMessage::Custom(CustomMeta::new(0x60, Loop { start: 0x0102 })),
    );
    assert_eq!(decoded, [expected.clone()]);
    assert_eq!(write_all(&[expected], false), [0x00, 0xFF, 0x60, 0x02, 0x01, 0x02]);

    let short = read_all(&[0x00, 0xFF, 0x60, 0x01, 0x01], &settings).unwrap_err();
    assert_eq!(
        short.error_kind(),
        &ReaderErrorKind::ParseError(ParseError::Meta(MetaError::Length {
            kind: "Loop",
            expected: 2,
            actual: 1
        }))
    );
}

#[test]
fn known_meta_types_ignore_the_registry() {
    let settings = ReadSettings::default().with_custom_meta::<Loop>(0x51);
    let events = read_all(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20], &settings).unwrap();
    assert_eq!(
        events[0].message(),
        &TrackMessage::from(MetaMessage::Tempo(Tempo::new(500_000)))
    );
}
