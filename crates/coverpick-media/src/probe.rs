// crates/coverpick-media/src/probe.rs
//
// In-process FFmpeg probing: container duration and native video dimensions.
// Runs once per accepted source, before the sampler.

use std::path::Path;
use crossbeam_channel::Sender;
use uuid::Uuid;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

use coverpick_core::media_types::MediaResult;

/// Probe `path` and report `Duration` + `VideoSize`, or `Error`.
///
/// Returns the duration in seconds so the caller can hand it straight to the
/// sampler; 0.0 means the probe failed and an `Error` result is already on
/// the channel. Duration resolution follows the container first
/// (`AV_TIME_BASE` units), then the video stream's own duration, and gives
/// up rather than inventing a value.
pub fn probe_source(path: &Path, session: Uuid, tx: &Sender<MediaResult>) -> f64 {
    let ictx = match input(path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("[probe] open failed: {e}");
            let _ = tx.send(MediaResult::Error {
                session, context: "probe", message: e.to_string(),
            });
            return 0.0;
        }
    };

    let Some(stream) = ictx.streams().best(Type::Video) else {
        let _ = tx.send(MediaResult::Error {
            session, context: "probe", message: "no video stream".into(),
        });
        return 0.0;
    };

    let (width, height) = unsafe {
        let p = stream.parameters().as_ptr();
        ((*p).width as u32, (*p).height as u32)
    };

    let mut duration = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if duration <= 0.0 {
        // Fall back to the stream's own duration.
        let tb = stream.time_base();
        duration = stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64;
    }

    if duration <= 0.0 {
        let _ = tx.send(MediaResult::Error {
            session, context: "probe", message: "duration unknown".into(),
        });
        return 0.0;
    }

    eprintln!("[probe] {duration:.2}s {width}x{height} <- {}", path.display());
    let _ = tx.send(MediaResult::Duration { session, seconds: duration });
    if width > 0 && height > 0 {
        let _ = tx.send(MediaResult::VideoSize { session, width, height });
    }
    duration
}
