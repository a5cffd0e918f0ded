//! Open modes for a mapped stream.

use std::str::FromStr;

use crate::errors::StreamError;

/// Access mode for a mapped stream, fixed at open time.
///
/// The four variants mirror the classic stdio mode strings:
///
/// | Variant       | String | Behavior                                      |
/// |---------------|--------|-----------------------------------------------|
/// | `Read`        | `"r"`  | Open existing file read-only; fails if absent |
/// | `ReadUpdate`  | `"r+"` | Open existing file read-write; fails if absent|
/// | `Write`       | `"w"`  | Create-or-truncate, write-only                |
/// | `WriteUpdate` | `"w+"` | Create-or-truncate, read-write                |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// Open an existing file read-only (`"r"`).
    Read,
    /// Open an existing file read-write (`"r+"`).
    ReadUpdate,
    /// Create-or-truncate, write-only (`"w"`).
    Write,
    /// Create-or-truncate, read-write (`"w+"`).
    WriteUpdate,
}

impl StreamMode {
    /// Whether reads are permitted in this mode.
    #[must_use]
    pub fn can_read(self) -> bool {
        !matches!(self, StreamMode::Write)
    }

    /// Whether writes are permitted in this mode.
    #[must_use]
    pub fn can_write(self) -> bool {
        !matches!(self, StreamMode::Read)
    }

    /// Whether opening creates the file if absent and truncates existing
    /// contents to zero length.
    #[must_use]
    pub fn truncates(self) -> bool {
        matches!(self, StreamMode::Write | StreamMode::WriteUpdate)
    }

    /// The stdio-style mode string this mode parses from.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StreamMode::Read => "r",
            StreamMode::ReadUpdate => "r+",
            StreamMode::Write => "w",
            StreamMode::WriteUpdate => "w+",
        }
    }
}

impl FromStr for StreamMode {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(StreamMode::Read),
            "r+" => Ok(StreamMode::ReadUpdate),
            "w" => Ok(StreamMode::Write),
            "w+" => Ok(StreamMode::WriteUpdate),
            _ => Err(StreamError::InvalidArgument(
                "mode must be one of \"r\", \"r+\", \"w\", \"w+\"",
            )),
        }
    }
}
