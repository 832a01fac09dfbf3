use super::{FormatType, timing::Timing};
use crate::{
    FileError,
    reader::{ReadResult, Reader, ReaderError},
    settings::{ReadSettings, UnknownFileFormatPolicy},
    writer::ByteSink,
};

/// Length of the content of a header chunk
pub(crate) const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The contents of the `MThd` chunk: format, track count and timing.

```text
4D 54 68 64 | 00 00 00 06 | ff ff | nn nn | dd dd
  "MThd"       length       format  tracks  division
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChunk {
    format: Option<FormatType>,
    track_count: u16,
    timing: Timing,
}

impl HeaderChunk {
    /// Create a header
    pub const fn new(format: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format: Some(format),
            track_count,
            timing,
        }
    }
    /// The format, or `None` if the file used an unknown format number
    pub const fn format(&self) -> Option<FormatType> {
        self.format
    }
    /// The number of track chunks announced
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// Get the timing props
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Decode the header from its chunk content. Bytes past the sixth are ignored.
    pub(crate) fn read(content: &mut Reader<'_>, settings: &ReadSettings) -> ReadResult<Self> {
        let format_position = content.buffer_position();
        let raw_format = content.read_u16()?;
        let track_count = content.read_u16()?;
        let timing_position = content.buffer_position();
        let timing = Timing::from_bytes(content.read_array()?)
            .map_err(|e| ReaderError::parse_error(timing_position, e))?;

        let format = match FormatType::try_from(raw_format) {
            Ok(format) => Some(format),
            Err(_) => match settings.unknown_file_format {
                UnknownFileFormatPolicy::Abort => {
                    return Err(ReaderError::parse_error(
                        format_position,
                        FileError::UnknownFileFormat(raw_format),
                    ));
                }
                UnknownFileFormatPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Unknown file format {raw_format}, reading chunks anyway");
                    None
                }
            },
        };
        Ok(Self {
            format,
            track_count,
            timing,
        })
    }

    /// Write the full chunk, identifier and length included
    pub(crate) fn write<S: ByteSink>(&self, sink: &mut S) {
        sink.put_slice(b"MThd");
        sink.put_u32(HEADER_LENGTH);
        sink.put_u16(self.format.map(u16::from).unwrap_or_default());
        sink.put_u16(self.track_count);
        sink.put_slice(&self.timing.to_bytes());
    }
}
