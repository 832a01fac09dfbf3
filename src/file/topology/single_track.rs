use alloc::vec::Vec;

use super::{ChunksConverter, assemble, merge, track_chunks, track_count};
use crate::file::chunk::MidiChunk;

/// Merges every track chunk into one, ordered by absolute tick.
///
/// Meta events sort before other events at the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleTrack;

impl ChunksConverter for SingleTrack {
    fn convert(&self, chunks: &[MidiChunk]) -> Vec<MidiChunk> {
        let count = track_count(chunks);
        if count < 2 {
            return chunks.to_vec();
        }
        let merged = merge(track_chunks(chunks));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Merged {count} track chunks into {} events",
            merged.as_ref().map_or(0, |t| t.len())
        );
        assemble(merged.into_iter().collect(), chunks)
    }
}
