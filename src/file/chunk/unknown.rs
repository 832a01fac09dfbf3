use alloc::vec::Vec;

use super::ChunkId;

/// A chunk with an identifier this crate does not interpret.
///
/// The bytes are kept so the chunk can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChunk {
    id: ChunkId,
    data: Vec<u8>,
}

impl UnknownChunk {
    /// Create a chunk from an identifier and its content
    pub fn new(id: ChunkId, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }
    /// The identifier
    pub const fn id(&self) -> ChunkId {
        self.id
    }
    /// The content
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
