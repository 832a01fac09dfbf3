use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::topology::{ChunksConverter, MultiSequence, MultiTrack, SingleTrack};

/// The layout of a file's track chunks, from the header's format word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track chunk carrying every channel
    SingleMultiChannel = 0,
    /// Format 1: several track chunks played together
    Simultaneous = 1,
    /// Format 2: several independent sequences, one per track chunk
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The converter that reshapes chunks into this format
    pub fn converter(&self) -> &'static dyn ChunksConverter {
        match self {
            Self::SingleMultiChannel => &SingleTrack,
            Self::Simultaneous => &MultiTrack,
            Self::SequentiallyIndependent => &MultiSequence,
        }
    }
}
