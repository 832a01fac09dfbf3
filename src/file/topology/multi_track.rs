use alloc::vec::Vec;

use super::{ChunksConverter, assemble, track_chunks, track_count};
use crate::{
    Channel,
    file::chunk::{MidiChunk, TrackChunk},
    message::{TrackEvent, TrackMessage, meta::MetaMessage},
};

const LANES: usize = 17;

#[doc = r#"
Splits a single track chunk into one chunk per channel.

Lane 0 collects events that belong to no channel, lanes 1 to 16 collect the
channels. A channel prefix event goes to its channel's lane and selects that
lane for the next meta or system exclusive event. Any event other than a
channel prefix ends the selection.

Every event's delta advances all lanes, so a lane's events keep their absolute
ticks. Lanes without events are dropped.
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiTrack;

impl ChunksConverter for MultiTrack {
    fn convert(&self, chunks: &[MidiChunk]) -> Vec<MidiChunk> {
        if track_count(chunks) != 1 {
            return chunks.to_vec();
        }
        let Some(source) = track_chunks(chunks).next() else {
            return chunks.to_vec();
        };
        let lanes = split(source);
        #[cfg(feature = "tracing")]
        tracing::debug!("Split one track chunk into {} lanes", lanes.len());
        assemble(lanes, chunks)
    }
}

struct Lane {
    events: Vec<TrackEvent>,
    pending_delta: u64,
}

fn split(source: &TrackChunk) -> Vec<TrackChunk> {
    let mut lanes: [Lane; LANES] = core::array::from_fn(|_| Lane {
        events: Vec::new(),
        pending_delta: 0,
    });
    let mut prefix: Option<Channel> = None;

    for event in source.events() {
        for lane in &mut lanes {
            lane.pending_delta += u64::from(event.delta_ticks());
        }
        let target = match event.message() {
            TrackMessage::ChannelVoice(voice) => {
                prefix = None;
                lane_of(voice.channel())
            }
            TrackMessage::Meta(MetaMessage::ChannelPrefix(channel)) => {
                prefix = Some(*channel);
                lane_of(*channel)
            }
            _ => prefix.take().map_or(0, lane_of),
        };
        let lane = &mut lanes[target];
        let delta = u32::try_from(core::mem::take(&mut lane.pending_delta)).unwrap_or(u32::MAX);
        lane.events.push(event.clone().with_delta_ticks(delta));
    }

    lanes
        .into_iter()
        .filter(|lane| !lane.events.is_empty())
        .map(|lane| TrackChunk::new(lane.events))
        .collect()
}

const fn lane_of(channel: Channel) -> usize {
    channel.index() as usize + 1
}
