/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The encoder was given the wrong number of colors.
    #[error("invalid color count ({actual} colors, expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    /// The buffer handed to the decoder is not exactly one frame long.
    #[error("frame length mismatch ({actual} bytes, expected {expected})")]
    FrameLengthMismatch { expected: usize, actual: usize },

    /// The frame does not start with the `"WAMB"` header.
    #[error("invalid frame header {found:02x?} (expected \"WAMB\")")]
    HeaderMismatch { found: [u8; 4] },

    /// The frame does not end with the `"BMAW"` footer.
    #[error("invalid frame footer {found:02x?} (expected \"BMAW\")")]
    FooterMismatch { found: [u8; 4] },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received or written.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
