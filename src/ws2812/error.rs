use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ws2812Error {
    /// Strip position outside 0..len
    InvalidPosition { pos: i64, len: usize },
    /// Colour string is not a 24-bit hex value
    InvalidColour(String),
    /// Malformed command line
    Usage(String),
    /// Rejected at transmitter construction
    InvalidConfig(String),
    /// Peripheral accepted fewer (or more) bytes than requested
    Transmission { expected: usize, written: usize },
    /// Bounded write did not complete in time
    Timeout { expected: usize },
    /// Any other driver failure
    Peripheral(String),
}

impl Ws2812Error {
    /// Faults that leave the physical strip showing an undefined frame
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Transmission { .. } | Self::Timeout { .. } | Self::Peripheral(_)
        )
    }
}

impl fmt::Display for Ws2812Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition { pos, len } => write!(
                f,
                "Invalid argument: pos must be between 0 and {} (got {pos})",
                len.saturating_sub(1)
            ),
            Self::InvalidColour(s) => write!(f, "Invalid argument: color must be valid hex ({s:?})"),
            Self::Usage(s) => write!(f, "Usage error: {s}"),
            Self::InvalidConfig(s) => write!(f, "Invalid config: {s}"),
            Self::Transmission { expected, written } => write!(
                f,
                "Transmission fault: wrote {written} of {expected} bytes"
            ),
            Self::Timeout { expected } => {
                write!(f, "Transmission timeout: {expected} byte write did not complete")
            }
            Self::Peripheral(s) => write!(f, "Peripheral error: {s}"),
        }
    }
}

impl std::error::Error for Ws2812Error {}
