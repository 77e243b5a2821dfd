use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::color::Color;
use crate::error::{FrameError, Result};
use crate::layout::{Segment, LEDS_TOTAL};

/// Length of the header and footer markers.
pub const MARKER_LEN: usize = 4;

/// Header bytes: "WAMB".
pub const HEADER: [u8; MARKER_LEN] = *b"WAMB";

/// Footer bytes: "BMAW".
pub const FOOTER: [u8; MARKER_LEN] = *b"BMAW";

/// Color payload: one RGB triple per LED.
pub const PAYLOAD_LEN: usize = 3 * LEDS_TOTAL;

/// Total wire size of a frame: header + payload + footer.
pub const FRAME_LEN: usize = MARKER_LEN + PAYLOAD_LEN + MARKER_LEN;

/// Update period used by the stock host (about 30 frames per second).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(34);

/// Colors for every LED on the stripe, indexed in stripe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    colors: [Color; LEDS_TOTAL],
}

impl Frame {
    /// Create a frame from exactly [`LEDS_TOTAL`] colors.
    pub fn new(colors: &[Color]) -> Result<Self> {
        let colors: [Color; LEDS_TOTAL] =
            colors.try_into().map_err(|_| FrameError::InvalidLength {
                expected: LEDS_TOTAL,
                actual: colors.len(),
            })?;
        Ok(Self { colors })
    }

    /// Create a frame with every LED set to `color`.
    pub fn filled(color: Color) -> Self {
        Self {
            colors: [color; LEDS_TOTAL],
        }
    }

    /// All colors in stripe order.
    pub fn colors(&self) -> &[Color; LEDS_TOTAL] {
        &self.colors
    }

    /// Color of the LED at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Set the LED at `index`. Returns false if `index` is out of range.
    pub fn set(&mut self, index: usize, color: Color) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    /// Colors belonging to one segment of the border.
    pub fn segment(&self, segment: Segment) -> &[Color] {
        &self.colors[segment.indices()]
    }

    /// Encode this frame into a fresh buffer.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(FRAME_LEN);
        put_frame(&self.colors, &mut dst);
        dst.freeze()
    }

    /// The total wire size of a frame.
    pub const fn wire_size() -> usize {
        FRAME_LEN
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::filled(Color::BLACK)
    }
}

/// Encode colors into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────────────────────┬──────────────┐
/// │ Header (4B)  │ Payload                    │ Footer (4B)  │
/// │ "WAMB"       │ R G B × LEDS_TOTAL         │ "BMAW"       │
/// └──────────────┴────────────────────────────┴──────────────┘
/// ```
///
/// `colors` must hold exactly [`LEDS_TOTAL`] entries; `dst` is left untouched
/// otherwise.
pub fn encode_frame(colors: &[Color], dst: &mut BytesMut) -> Result<()> {
    if colors.len() != LEDS_TOTAL {
        return Err(FrameError::InvalidLength {
            expected: LEDS_TOTAL,
            actual: colors.len(),
        });
    }
    put_frame(colors, dst);
    Ok(())
}

fn put_frame(colors: &[Color], dst: &mut BytesMut) {
    dst.reserve(FRAME_LEN);
    dst.put_slice(&HEADER);
    for color in colors {
        dst.put_slice(&color.to_bytes());
    }
    dst.put_slice(&FOOTER);
}

/// Decode exactly one frame.
///
/// The buffer must be exactly [`FRAME_LEN`] bytes. No attempt is made to
/// locate a header inside a longer or misaligned buffer.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    if src.len() != FRAME_LEN {
        return Err(FrameError::FrameLengthMismatch {
            expected: FRAME_LEN,
            actual: src.len(),
        });
    }

    let (header, rest) = src.split_at(MARKER_LEN);
    let (payload, footer) = rest.split_at(PAYLOAD_LEN);

    if header != HEADER {
        return Err(FrameError::HeaderMismatch {
            found: marker(header),
        });
    }
    if footer != FOOTER {
        return Err(FrameError::FooterMismatch {
            found: marker(footer),
        });
    }

    let mut colors = [Color::BLACK; LEDS_TOTAL];
    for (slot, rgb) in colors.iter_mut().zip(payload.chunks_exact(3)) {
        *slot = Color::new(rgb[0], rgb[1], rgb[2]);
    }

    Ok(Frame { colors })
}

/// Decode the next frame from a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a full frame yet.
/// Otherwise consumes exactly [`FRAME_LEN`] bytes and decodes them, so a
/// malformed frame is dropped from the buffer along with its error.
pub fn decode_next(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < FRAME_LEN {
        return Ok(None); // Need more data
    }

    let window = src.split_to(FRAME_LEN);
    decode_frame(&window).map(Some)
}

fn marker(bytes: &[u8]) -> [u8; MARKER_LEN] {
    let mut found = [0u8; MARKER_LEN];
    found.copy_from_slice(bytes);
    found
}

/// Configuration for frame writers.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Minimum spacing between frames accepted by
    /// [`FrameWriter::send_if_due`](crate::FrameWriter::send_if_due).
    /// Default: no pacing.
    pub min_frame_interval: Option<Duration>,
}
