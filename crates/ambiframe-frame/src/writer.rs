use std::io::{ErrorKind, Write};
use std::time::Instant;

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_frame, Frame, FrameConfig, FRAME_LEN};
use crate::color::Color;
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` stream (serial device, file, pipe).
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    last_sent: Option<Instant>,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(FRAME_LEN),
            config,
            last_sent: None,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.colors())
    }

    /// Encode and send one color per LED, in stripe order.
    pub fn send(&mut self, colors: &[Color]) -> Result<()> {
        self.buf.clear();
        encode_frame(colors, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.last_sent = Some(Instant::now());
        self.flush()
    }

    /// Send only if `min_frame_interval` has elapsed since the last frame.
    ///
    /// Returns `Ok(false)` when the frame was dropped. Without a configured
    /// interval every frame is sent.
    pub fn send_if_due(&mut self, colors: &[Color]) -> Result<bool> {
        if let (Some(interval), Some(last)) = (self.config.min_frame_interval, self.last_sent) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                trace!(?elapsed, ?interval, "dropping frame before interval");
                return Ok(false);
            }
        }

        self.send(colors)?;
        Ok(true)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update frame pacing for subsequent [`send_if_due`](Self::send_if_due) calls.
    pub fn set_min_frame_interval(&mut self, interval: Option<std::time::Duration>) {
        self.config.min_frame_interval = interval;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
