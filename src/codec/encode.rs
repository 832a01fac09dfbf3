use alloc::vec::Vec;

use super::RunningStatus;
use crate::{
    WriteError, WriteResult,
    message::{TrackEvent, TrackMessage},
    writer::{ByteCounter, ByteSink},
};

/// Append the bytes of `event`, delta time included.
///
/// With `use_running_status`, a channel status byte equal to the one in
/// `running_status` is left out. Every other event clears the running status.
pub fn write_event(
    event: &TrackEvent,
    out: &mut Vec<u8>,
    running_status: &mut RunningStatus,
    use_running_status: bool,
) -> WriteResult<()> {
    encode_event(event, out, running_status, use_running_status)
}

/// The number of bytes [`write_event`] would append given the same running status.
///
/// `running_status` is updated exactly as a real write would update it.
pub fn encoded_len(
    event: &TrackEvent,
    running_status: &mut RunningStatus,
    use_running_status: bool,
) -> WriteResult<usize> {
    let mut counter = ByteCounter::default();
    encode_event(event, &mut counter, running_status, use_running_status)?;
    Ok(counter.count())
}

pub(crate) fn encode_event<S: ByteSink>(
    event: &TrackEvent,
    sink: &mut S,
    running_status: &mut RunningStatus,
    use_running_status: bool,
) -> WriteResult<()> {
    sink.put_varlen(event.delta_ticks())?;
    encode_message(event.message(), sink, running_status, use_running_status)
}

fn encode_message<S: ByteSink>(
    message: &TrackMessage,
    sink: &mut S,
    running_status: &mut RunningStatus,
    use_running_status: bool,
) -> WriteResult<()> {
    match message {
        TrackMessage::ChannelVoice(voice) => {
            let status = voice.status();
            if !(use_running_status && running_status.get() == Some(status)) {
                sink.put(status);
            }
            running_status.set(status);

            let event = voice.event();
            let params = event.params();
            for param in &params[..event.kind().param_count()] {
                sink.put(param.value());
            }
        }
        TrackMessage::Meta(meta) => {
            running_status.clear();
            let mut counter = ByteCounter::default();
            meta.write_payload(&mut counter);
            let len = u32::try_from(counter.count())
                .map_err(|_| WriteError::VarLenOverflow(counter.count() as u64))?;

            sink.put(0xFF);
            sink.put(meta.status());
            sink.put_varlen(len)?;
            meta.write_payload(sink);
        }
        TrackMessage::SystemExclusive(sysex) => {
            running_status.clear();
            sink.put(sysex.status());
            sink.put_sized(sysex.data())?;
        }
        TrackMessage::SystemCommon(common) => {
            running_status.clear();
            common.write(sink);
        }
        TrackMessage::SystemRealTime(real_time) => {
            running_status.clear();
            sink.put(real_time.status());
        }
    }
    Ok(())
}
