//! `tokio_util::codec` integration for async serial/pipe streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_next, encode_frame, Frame};
use crate::error::{FrameError, Result};

/// Frame codec for use with `FramedRead` / `FramedWrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripeCodec;

impl StripeCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for StripeCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        decode_next(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        match decode_next(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<&Frame> for StripeCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: &Frame, dst: &mut BytesMut) -> Result<()> {
        encode_frame(frame.colors(), dst)
    }
}

impl Encoder<Frame> for StripeCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        encode_frame(frame.colors(), dst)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::codec::FRAME_LEN;
    use crate::color::Color;

    #[test]
    fn decoder_waits_for_full_frame() {
        let wire = Frame::filled(Color::new(1, 2, 3)).encode();
        let mut codec = StripeCodec::new();
        let mut buf = BytesMut::from(&wire[..100]);

        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(&wire[100..]);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.get(84), Some(Color::new(1, 2, 3)));
    }

    #[test]
    fn decode_eof_with_leftover_is_closed() {
        let mut codec = StripeCodec::new();
        let mut buf = BytesMut::from(&b"WAMB"[..]);

        let err = codec.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));

        let mut empty = BytesMut::new();
        assert!(codec.decode_eof(&mut empty).unwrap().is_none());
    }

    #[test]
    fn encoder_writes_one_frame() {
        let mut codec = StripeCodec::new();
        let mut dst = BytesMut::new();

        codec.encode(&Frame::default(), &mut dst).unwrap();
        codec.encode(Frame::default(), &mut dst).unwrap();
        assert_eq!(dst.len(), 2 * FRAME_LEN);
    }

    #[tokio::test]
    async fn framed_roundtrip() {
        let frames = [
            Frame::filled(Color::new(255, 0, 0)),
            Frame::filled(Color::new(0, 0, 255)),
        ];

        let mut sink = FramedWrite::new(Vec::new(), StripeCodec::new());
        for frame in &frames {
            sink.send(frame).await.unwrap();
        }
        let wire = sink.into_inner();

        let mut stream = FramedRead::new(wire.as_slice(), StripeCodec::new());
        for expected in frames {
            assert_eq!(stream.next().await.unwrap().unwrap(), expected);
        }
        assert!(stream.next().await.is_none());
    }
}
