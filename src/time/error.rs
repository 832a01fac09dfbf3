use thiserror::Error;

/// A tick position or span could not be converted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// Conversions need ticks per quarter note; SMPTE timing is not supported
    #[error("Time conversion needs ticks per quarter note timing, the file uses SMPTE timing")]
    UnsupportedTimeDivision,
    /// The result does not fit the target type
    #[error("Time conversion overflowed")]
    Overflow,
    /// A length would end before it starts
    #[error("Length ends before its start")]
    NegativeLength,
    /// A time signature whose beat is not a whole positive number of ticks
    #[error("Time signature {numerator}/{denominator} has a fractional or empty beat")]
    InvalidTimeSignature {
        /// Beats per bar
        numerator: u8,
        /// Beat unit
        denominator: u32,
    },
}

/// The result of a time conversion
pub type ConversionResult<T> = Result<T, ConversionError>;
