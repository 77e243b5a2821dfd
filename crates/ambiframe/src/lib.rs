//! Serial frame codec and tooling for screen-border LED stripes.
//!
//! A host computes one color per LED around the screen and streams them to
//! the stripe controller as fixed-size `|WAMB|RGBRGB…|BMAW|` frames.
//!
//! # Crate Structure
//!
//! - [`frame`] — Layout constants, colors, frame encode/decode, stream helpers
//!
//! The `ambiframe` binary (behind the `cli` feature) encodes, decodes, sends
//! and monitors frames from the command line.

/// Re-export frame types.
pub mod frame {
    pub use ambiframe_frame::*;
}
