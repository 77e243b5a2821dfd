use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ambiframe_frame::{FrameError, FrameReader};

use crate::cmd::{open_source, ListenArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame_summary, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let source = open_source(&args.path, &args.serial)?;
    let mut reader = FrameReader::new(source.reader);

    let running = Arc::new(AtomicBool::new(true));
    // Files and pipes block without a timeout, so they keep the default SIGINT exit.
    if source.polled {
        install_ctrlc_handler(running.clone())?;
    }

    let received = listen(&mut reader, &args, &running, |sequence, frame| {
        print_frame_summary(sequence, frame, format)
    })?;

    tracing::info!(frames = received, "listen finished");
    Ok(SUCCESS)
}

/// Read frames until EOF, `--count`, or `running` is cleared. Returns the
/// number of frames handed to `on_frame`.
///
/// A read that times out only rechecks `running`; bytes of a partial frame
/// stay buffered in `reader`.
fn listen<R: Read>(
    reader: &mut FrameReader<R>,
    args: &ListenArgs,
    running: &AtomicBool,
    mut on_frame: impl FnMut(usize, &ambiframe_frame::Frame) -> io::Result<()>,
) -> CliResult<usize> {
    let mut received = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => break,
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) =>
            {
                continue;
            }
            Err(err @ (FrameError::HeaderMismatch { .. } | FrameError::FooterMismatch { .. }))
                if args.keep_going =>
            {
                tracing::warn!(error = %err, "skipping malformed frame");
                continue;
            }
            Err(err) => return Err(frame_error("receive failed", err)),
        };

        received = received.saturating_add(1);
        on_frame(received, &frame).map_err(|err| io_error("failed writing output", err))?;

        if let Some(count) = args.count {
            if received >= count {
                break;
            }
        }
    }

    Ok(received)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use ambiframe_frame::{Color, Frame, FRAME_LEN};

    use super::*;
    use crate::cmd::SerialArgs;
    use crate::exit::{DATA_INVALID, INTERNAL};

    fn args(count: Option<usize>, keep_going: bool) -> ListenArgs {
        ListenArgs {
            path: PathBuf::from("-"),
            serial: SerialArgs::default(),
            count,
            keep_going,
        }
    }

    fn ignore(_: usize, _: &Frame) -> io::Result<()> {
        Ok(())
    }

    fn wire(frames: &[Frame]) -> Vec<u8> {
        frames.iter().flat_map(|f| f.encode().to_vec()).collect()
    }

    #[test]
    fn stops_at_eof() {
        let frames = [Frame::default(), Frame::filled(Color::new(1, 1, 1))];
        let mut reader = FrameReader::new(Cursor::new(wire(&frames)));
        let running = AtomicBool::new(true);

        let mut seen = Vec::new();
        let n = listen(&mut reader, &args(None, false), &running, |seq, frame| {
            seen.push((seq, *frame));
            Ok(())
        })
        .unwrap();

        assert_eq!(n, 2);
        assert_eq!(seen, vec![(1, frames[0]), (2, frames[1])]);
    }

    #[test]
    fn stops_after_count() {
        let frames = [Frame::default(); 5];
        let mut reader = FrameReader::new(Cursor::new(wire(&frames)));
        let running = AtomicBool::new(true);

        let n = listen(&mut reader, &args(Some(2), false), &running, ignore).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn malformed_frame_fails_unless_keep_going() {
        let mut bytes = vec![0u8; FRAME_LEN];
        bytes.extend(wire(&[Frame::default()]));
        let running = AtomicBool::new(true);

        let mut reader = FrameReader::new(Cursor::new(bytes.clone()));
        let err = listen(&mut reader, &args(None, false), &running, ignore).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);

        let mut reader = FrameReader::new(Cursor::new(bytes));
        let n = listen(&mut reader, &args(None, true), &running, ignore).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn cleared_flag_reads_nothing() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[Frame::default()])));
        let running = AtomicBool::new(false);

        let n = listen(&mut reader, &args(None, false), &running, ignore).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn idle_timeouts_recheck_running() {
        let running = AtomicBool::new(true);
        let idle = IdleLine {
            running: &running,
            reads: 0,
        };
        let mut reader = FrameReader::new(idle);

        let n = listen(&mut reader, &args(None, false), &running, ignore).unwrap();
        assert_eq!(n, 0);
        assert_eq!(reader.get_ref().reads, 3);
    }

    /// Times out on every read and clears `running` on the third, the way a
    /// Ctrl-C handler would on an idle serial line.
    struct IdleLine<'a> {
        running: &'a AtomicBool,
        reads: usize,
    }

    impl Read for IdleLine<'_> {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads == 3 {
                self.running.store(false, Ordering::SeqCst);
            }
            Err(io::Error::from(ErrorKind::TimedOut))
        }
    }

    #[test]
    fn timeout_between_bytes_keeps_frame() {
        let frame = Frame::filled(Color::new(4, 2, 0));
        let wire = wire(&[frame]);
        let chunks = vec![
            Ok(wire[..50].to_vec()),
            Err(ErrorKind::TimedOut),
            Err(ErrorKind::WouldBlock),
            Ok(wire[50..].to_vec()),
        ];
        let mut reader = FrameReader::new(Scripted { chunks });
        let running = AtomicBool::new(true);

        let mut seen = Vec::new();
        let n = listen(&mut reader, &args(None, false), &running, |_, frame| {
            seen.push(*frame);
            Ok(())
        })
        .unwrap();

        assert_eq!(n, 1);
        assert_eq!(seen, vec![frame]);
    }

    struct Scripted {
        chunks: Vec<Result<Vec<u8>, ErrorKind>>,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            match self.chunks.remove(0) {
                Ok(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Err(kind) => Err(io::Error::from(kind)),
            }
        }
    }

    #[test]
    fn output_failure_stops_listening() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[Frame::default(); 2])));
        let running = AtomicBool::new(true);

        let err = listen(&mut reader, &args(None, false), &running, |_, _| {
            Err(io::Error::from(ErrorKind::StorageFull))
        })
        .unwrap_err();
        assert_eq!(err.code, INTERNAL);
        assert!(err.message.starts_with("failed writing output"));
    }
}
