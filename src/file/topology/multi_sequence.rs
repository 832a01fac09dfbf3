use alloc::vec::Vec;

use super::{ChunksConverter, assemble, merge, track_chunks};
use crate::{
    file::chunk::{MidiChunk, TrackChunk},
    message::{TrackMessage, meta::MetaMessage},
};

/// Groups track chunks by sequence number and merges each group.
///
/// A chunk's sequence number comes from a sequence number event before its
/// first non-zero delta, and is otherwise its index among the track chunks.
/// Groups keep the order in which their numbers first appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiSequence;

impl ChunksConverter for MultiSequence {
    fn convert(&self, chunks: &[MidiChunk]) -> Vec<MidiChunk> {
        let mut groups: Vec<(u32, Vec<&TrackChunk>)> = Vec::new();
        for (index, track) in track_chunks(chunks).enumerate() {
            let number = sequence_number(track).unwrap_or(index as u32);
            match groups.iter_mut().find(|(n, _)| *n == number) {
                Some((_, members)) => members.push(track),
                None => groups.push((number, alloc::vec![track])),
            }
        }
        if groups.is_empty() {
            return chunks.to_vec();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Found {} sequences", groups.len());
        let tracks = groups
            .into_iter()
            .filter_map(|(_, members)| match members.as_slice() {
                [single] => Some((*single).clone()),
                _ => merge(members),
            })
            .collect();
        assemble(tracks, chunks)
    }
}

fn sequence_number(track: &TrackChunk) -> Option<u32> {
    track
        .events()
        .iter()
        .take_while(|event| event.delta_ticks() == 0)
        .find_map(|event| match event.message() {
            TrackMessage::Meta(MetaMessage::SequenceNumber(Some(number))) => {
                Some(u32::from(*number))
            }
            _ => None,
        })
}
