//! Physical layout of the LED border.
//!
//! ```text
//! ***********************
//! *                     *
//! *                     *
//! *       Screen        *
//! *                     *
//! *                     *
//! ****E             S****
//! ```
//!
//! All LEDs are connected into a single stripe and addressed counterclockwise,
//! starting at `S` (first LED of the bottom-right run) and ending at `E`.

use std::ops::Range;

/// LEDs on the bottom edge, right of the stand.
pub const LEDS_BOTTOM_RIGHT: usize = 6;

/// LEDs on the right edge.
pub const LEDS_RIGHT: usize = 19;

/// LEDs on the top edge.
pub const LEDS_TOP: usize = 35;

/// LEDs on the left edge.
pub const LEDS_LEFT: usize = 19;

/// LEDs on the bottom edge, left of the stand.
pub const LEDS_BOTTOM_LEFT: usize = 6;

/// Total number of LEDs on the stripe.
pub const LEDS_TOTAL: usize =
    LEDS_BOTTOM_RIGHT + LEDS_RIGHT + LEDS_TOP + LEDS_LEFT + LEDS_BOTTOM_LEFT;

const _: () = assert!(LEDS_TOTAL > 0, "stripe must have at least one LED");

/// One contiguous run of LEDs along a side or corner of the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    BottomRight,
    Right,
    Top,
    Left,
    BottomLeft,
}

impl Segment {
    /// All segments in stripe order.
    pub const ALL: [Segment; 5] = [
        Segment::BottomRight,
        Segment::Right,
        Segment::Top,
        Segment::Left,
        Segment::BottomLeft,
    ];

    /// Number of LEDs in this segment.
    pub const fn led_count(self) -> usize {
        match self {
            Segment::BottomRight => LEDS_BOTTOM_RIGHT,
            Segment::Right => LEDS_RIGHT,
            Segment::Top => LEDS_TOP,
            Segment::Left => LEDS_LEFT,
            Segment::BottomLeft => LEDS_BOTTOM_LEFT,
        }
    }

    /// Stripe index of the first LED in this segment.
    pub const fn first_index(self) -> usize {
        match self {
            Segment::BottomRight => 0,
            Segment::Right => LEDS_BOTTOM_RIGHT,
            Segment::Top => LEDS_BOTTOM_RIGHT + LEDS_RIGHT,
            Segment::Left => LEDS_BOTTOM_RIGHT + LEDS_RIGHT + LEDS_TOP,
            Segment::BottomLeft => LEDS_BOTTOM_RIGHT + LEDS_RIGHT + LEDS_TOP + LEDS_LEFT,
        }
    }

    /// Stripe indices covered by this segment.
    pub const fn indices(self) -> Range<usize> {
        self.first_index()..self.first_index() + self.led_count()
    }

    /// Returns the segment an LED index belongs to.
    pub fn of(index: usize) -> Option<Segment> {
        Self::ALL
            .into_iter()
            .find(|segment| segment.indices().contains(&index))
    }

    /// Returns a human-readable name for the segment.
    pub const fn name(self) -> &'static str {
        match self {
            Segment::BottomRight => "bottom-right",
            Segment::Right => "right",
            Segment::Top => "top",
            Segment::Left => "left",
            Segment::BottomLeft => "bottom-left",
        }
    }

    /// On-screen direction in which stripe indices increase along this segment.
    pub const fn traversal(self) -> &'static str {
        match self {
            Segment::BottomRight | Segment::BottomLeft => "left to right",
            Segment::Right => "bottom to top",
            Segment::Top => "right to left",
            Segment::Left => "top to bottom",
        }
    }
}

/// Returns true if both bottom runs and both vertical edges have equal length.
pub const fn is_symmetric() -> bool {
    LEDS_BOTTOM_LEFT == LEDS_BOTTOM_RIGHT && LEDS_LEFT == LEDS_RIGHT
}
