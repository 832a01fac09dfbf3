use super::RunningStatus;
use crate::{
    Channel, DataByte, ParseError,
    message::{
        TrackEvent, TrackMessage,
        channel::{ChannelVoiceMessage, VoiceKind},
        meta::MetaMessage,
        system::{SystemCommonStatus, SystemExclusiveMessage, SystemRealTimeMessage},
    },
    reader::{ReadResult, Reader, ReaderError},
    settings::{InvalidDataBytePolicy, ReadSettings, SilentNoteOnPolicy},
};

/// Read a delta time followed by a message.
///
/// Returns `None` for system common and real-time status bytes that have no
/// defined message. The delta of such an event is lost; use [`read_message`]
/// to keep it.
pub fn read_event(
    reader: &mut Reader<'_>,
    running_status: &mut RunningStatus,
    settings: &ReadSettings,
) -> ReadResult<Option<TrackEvent>> {
    let delta_ticks = reader.read_varlen()?;
    Ok(read_message(reader, running_status, settings)?
        .map(|message| TrackEvent::new(delta_ticks, message)))
}

/// Read one message starting at a status byte or, under running status, at
/// its first data byte.
///
/// Only channel messages update `running_status`. Meta and system exclusive
/// events in between leave it untouched.
pub fn read_message(
    reader: &mut Reader<'_>,
    running_status: &mut RunningStatus,
    settings: &ReadSettings,
) -> ReadResult<Option<TrackMessage>> {
    let status_position = reader.buffer_position();
    let byte = reader.read_byte()?;

    let status = if byte < 0x80 {
        let Some(status) = running_status.get() else {
            return Err(ReaderError::parse_error(
                status_position,
                ParseError::UnexpectedRunningStatus,
            ));
        };
        reader.step_back();
        status
    } else {
        byte
    };

    match status {
        0x00..=0x7F => Err(ReaderError::parse_error(
            status_position,
            ParseError::UnexpectedRunningStatus,
        )),
        0x80..=0xEF => read_channel(reader, status, running_status, settings)
            .map(|message| Some(message.into())),
        0xFF => read_meta(reader, settings).map(|message| Some(message.into())),
        0xF0 | 0xF7 => {
            let len = reader.read_varlen()? as usize;
            let data = reader.read_exact(len)?.to_vec();
            let message = if status == 0xF0 {
                SystemExclusiveMessage::Normal(data)
            } else {
                SystemExclusiveMessage::Escape(data)
            };
            Ok(Some(message.into()))
        }
        0xF1..=0xFE => {
            if let Ok(common) = SystemCommonStatus::try_from(status) {
                let mut params = [DataByte::default(); 2];
                for param in params.iter_mut().take(common.param_count()) {
                    *param = read_data_byte(reader, settings.invalid_data_byte)?;
                }
                return Ok(Some(common.with_params(params[0], params[1]).into()));
            }
            Ok(SystemRealTimeMessage::try_from(status)
                .ok()
                .map(TrackMessage::from))
        }
    }
}

fn read_channel(
    reader: &mut Reader<'_>,
    status: u8,
    running_status: &mut RunningStatus,
    settings: &ReadSettings,
) -> ReadResult<ChannelVoiceMessage> {
    let kind = VoiceKind::from_status(status).ok_or_else(|| {
        reader.parse_error(ParseError::UnknownChannelEvent {
            status: status & 0xF0,
            channel: status & 0x0F,
        })
    })?;

    let first = read_data_byte(reader, settings.invalid_data_byte)?;
    let second = if kind.param_count() == 2 {
        read_data_byte(reader, settings.invalid_data_byte)?
    } else {
        DataByte::default()
    };
    running_status.set(status);

    let message =
        ChannelVoiceMessage::new(Channel::from_status(status), kind.with_params(first, second));
    Ok(match settings.silent_note_on {
        SilentNoteOnPolicy::NoteOff => message.silent_note_on_to_note_off(),
        SilentNoteOnPolicy::NoteOn => message,
    })
}

fn read_meta(reader: &mut Reader<'_>, settings: &ReadSettings) -> ReadResult<MetaMessage> {
    let meta_type = reader.read_byte()?;
    let len = reader.read_varlen()? as usize;
    let payload_position = reader.buffer_position();
    let payload = reader.read_exact(len)?;

    let (message, used) = MetaMessage::decode(meta_type, payload, settings)
        .map_err(|e| ReaderError::parse_error(payload_position, e))?;
    if used < len {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            "Meta event {meta_type:#04X} used {used} of {len} payload bytes, skipping the rest"
        );
    }
    Ok(message)
}

fn read_data_byte(reader: &mut Reader<'_>, policy: InvalidDataBytePolicy) -> ReadResult<DataByte> {
    let position = reader.buffer_position();
    let byte = reader.read_byte()?;
    match DataByte::new(byte) {
        Ok(data) => Ok(data),
        Err(e) => match policy {
            InvalidDataBytePolicy::Abort => Err(ReaderError::parse_error(position, e)),
            InvalidDataBytePolicy::ReadValid => Ok(DataByte::new_masked(byte)),
            InvalidDataBytePolicy::SnapToLimits => Ok(DataByte::new_saturating(byte)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{meta::Tempo, system::SystemCommonMessage};
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    fn messages(bytes: &[u8], settings: &ReadSettings) -> ReadResult<Vec<TrackMessage>> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut running_status = RunningStatus::new();
        let mut out = Vec::new();
        while !reader.is_at_end() {
            if let Some(message) = read_message(&mut reader, &mut running_status, settings)? {
                out.push(message);
            }
        }
        Ok(out)
    }

    #[test]
    fn explicit_status_bytes() {
        let read = messages(
            &[0x90, 0x75, 0x56, 0x80, 0x55, 0x65, 0x90, 0x75, 0x56],
            &ReadSettings::default(),
        )
        .unwrap();
        assert_eq!(
            read,
            [
                TrackMessage::from(ChannelVoiceMessage::note_on(Channel::One, 0x75, 0x56)),
                TrackMessage::from(ChannelVoiceMessage::note_off(Channel::One, 0x55, 0x65)),
                TrackMessage::from(ChannelVoiceMessage::note_on(Channel::One, 0x75, 0x56)),
            ]
        );
    }

    #[test]
    fn running_status_continues() {
        let read = messages(
            &[0x90, 0x15, 0x56, 0x55, 0x65, 0x45, 0x60],
            &ReadSettings::default(),
        )
        .unwrap();
        assert_eq!(
            read,
            [
                TrackMessage::from(ChannelVoiceMessage::note_on(Channel::One, 0x15, 0x56)),
                TrackMessage::from(ChannelVoiceMessage::note_on(Channel::One, 0x55, 0x65)),
                TrackMessage::from(ChannelVoiceMessage::note_on(Channel::One, 0x45, 0x60)),
            ]
        );
    }

    #[test]
    fn running_status_survives_meta() {
        let read = messages(
            &[0xC3, 0x05, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, 0x07],
            &ReadSettings::default(),
        )
        .unwrap();
        assert_eq!(
            read,
            [
                TrackMessage::from(ChannelVoiceMessage::program_change(Channel::Four, 5)),
                TrackMessage::from(MetaMessage::Tempo(Tempo::DEFAULT)),
                TrackMessage::from(ChannelVoiceMessage::program_change(Channel::Four, 7)),
            ]
        );
    }

    #[test]
    fn data_byte_without_status() {
        let err = messages(&[0x40, 0x40], &ReadSettings::default()).unwrap_err();
        assert_eq!(
            err,
            ReaderError::parse_error(0, ParseError::UnexpectedRunningStatus)
        );
    }

    #[test]
    fn silent_note_on_policy() {
        let bytes = [0x91, 0x40, 0x00];
        let as_off = messages(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(
            as_off,
            [TrackMessage::from(ChannelVoiceMessage::note_off(Channel::Two, 0x40, 0))]
        );
        let kept = messages(
            &bytes,
            &ReadSettings::default().with_silent_note_on(SilentNoteOnPolicy::NoteOn),
        )
        .unwrap();
        assert_eq!(kept, [TrackMessage::from(ChannelVoiceMessage::note_on(Channel::Two, 0x40, 0))]);
    }

    #[test]
    fn invalid_parameter_policies() {
        let bytes = [0xB0, 0x07, 0x90];
        let err = messages(&bytes, &ReadSettings::default()).unwrap_err();
        assert_eq!(err, ReaderError::parse_error(2, ParseError::InvalidDataByte(0x90)));

        let masked = messages(
            &bytes,
            &ReadSettings::default().with_invalid_data_byte(InvalidDataBytePolicy::ReadValid),
        )
        .unwrap();
        assert_eq!(
            masked,
            [TrackMessage::from(ChannelVoiceMessage::control_change(Channel::One, 7, 0x10))]
        );

        let snapped = messages(
            &bytes,
            &ReadSettings::default().with_invalid_data_byte(InvalidDataBytePolicy::SnapToLimits),
        )
        .unwrap();
        assert_eq!(
            snapped,
            [TrackMessage::from(ChannelVoiceMessage::control_change(Channel::One, 7, 0x7F))]
        );
    }

    #[test]
    fn undefined_system_statuses_are_dropped() {
        let bytes = [0xF4, 0xF9, 0xF6, 0xF8, 0xF3, 0x02];
        let read = messages(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(
            read,
            [
                TrackMessage::from(SystemCommonMessage::TuneRequest),
                TrackMessage::from(SystemRealTimeMessage::TimingClock),
                TrackMessage::from(SystemCommonMessage::SongSelect(DataByte::new_masked(2))),
            ]
        );
    }

    #[test]
    fn sysex_packets() {
        let read = messages(
            &[0xF0, 0x03, 0x43, 0x12, 0xF7, 0xF7, 0x02, 0xF8, 0xFA],
            &ReadSettings::default(),
        )
        .unwrap();
        assert_eq!(
            read,
            [
                TrackMessage::from(SystemExclusiveMessage::Normal(alloc::vec![0x43, 0x12, 0xF7])),
                TrackMessage::from(SystemExclusiveMessage::Escape(alloc::vec![0xF8, 0xFA])),
            ]
        );
    }

    #[test]
    fn truncated_event() {
        let err = messages(&[0x90, 0x40], &ReadSettings::default()).unwrap_err();
        assert!(err.is_insufficient_bytes());
    }
}
