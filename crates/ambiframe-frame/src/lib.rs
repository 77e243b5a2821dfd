//! Fixed-size framing of RGB data for a serial-driven LED border.
//!
//! The border around a screen is wired as a single stripe. Every update is
//! one frame of exactly [`FRAME_LEN`] bytes:
//! - A 4-byte header, ASCII `"WAMB"`
//! - One `(R, G, B)` triple per LED, in stripe order
//! - A 4-byte footer, ASCII `"BMAW"`
//!
//! The LED count is a compile-time constant ([`LEDS_TOTAL`]) and is never
//! carried on the wire, so both ends must be built with the same layout.

pub mod codec;
pub mod color;
pub mod error;
pub mod layout;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{
    decode_frame, decode_next, encode_frame, Frame, FrameConfig, DEFAULT_FRAME_INTERVAL, FOOTER,
    FRAME_LEN, HEADER, MARKER_LEN, PAYLOAD_LEN,
};
pub use color::{Color, ParseColorError};
pub use error::{FrameError, Result};
pub use layout::{
    is_symmetric, Segment, LEDS_BOTTOM_LEFT, LEDS_BOTTOM_RIGHT, LEDS_LEFT, LEDS_RIGHT, LEDS_TOP,
    LEDS_TOTAL,
};
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::StripeCodec;
