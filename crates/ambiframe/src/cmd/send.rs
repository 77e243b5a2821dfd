use std::time::Duration;

use ambiframe_frame::{Frame, FrameConfig, FrameWriter};

use crate::cmd::{open_sink, parse_duration, resolve_frame, SendArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    if args.repeat == 0 {
        return Err(CliError::new(USAGE, "--repeat must be greater than zero"));
    }
    let interval = parse_duration(&args.interval)?;
    let frame = resolve_frame(&args.colors)?;

    let sink = open_sink(&args.path, &args.serial, args.create)?;

    let config = FrameConfig {
        min_frame_interval: Some(interval),
    };
    let mut writer = FrameWriter::with_config(sink, config);
    let sent = send_paced(&mut writer, &frame, args.repeat, interval)
        .map_err(|err| frame_error("send failed", err))?;

    tracing::info!(path = %args.path.display(), frames = sent, "frames sent");
    Ok(SUCCESS)
}

/// Send `repeat` copies of `frame`, sleeping between them so none is dropped by pacing.
fn send_paced<W: std::io::Write>(
    writer: &mut FrameWriter<W>,
    frame: &Frame,
    repeat: usize,
    interval: Duration,
) -> ambiframe_frame::Result<usize> {
    let mut sent = 0usize;
    while sent < repeat {
        if writer.send_if_due(frame.colors())? {
            sent += 1;
            tracing::debug!(sequence = sent, "frame sent");
        } else {
            std::thread::sleep(interval / 4);
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use ambiframe_frame::{decode_frame, Color, FRAME_LEN};

    use super::*;

    #[test]
    fn send_paced_writes_every_repeat() {
        let config = FrameConfig {
            min_frame_interval: Some(Duration::from_millis(2)),
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), config);
        let frame = Frame::filled(Color::new(0, 128, 255));

        let sent = send_paced(&mut writer, &frame, 3, Duration::from_millis(2)).unwrap();
        assert_eq!(sent, 3);

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), 3 * FRAME_LEN);
        for chunk in wire.chunks(FRAME_LEN) {
            assert_eq!(decode_frame(chunk).unwrap(), frame);
        }
    }
}
