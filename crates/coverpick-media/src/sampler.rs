// crates/coverpick-media/src/sampler.rs
//
// Filmstrip generation: decode SAMPLE_COUNT evenly spaced frames (endpoints
// included), quarter resolution, JPEG. One sequential loop on one thread, so
// slots arrive in index order and a slow sample only delays later slots,
// never reorders them.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use uuid::Uuid;

use coverpick_core::media_types::{MediaResult, Still};
use coverpick_core::selection::sample_timestamps;

use crate::decode::grab_rgba;
use crate::still::encode_jpeg;

/// Decode and send the full sample set for one session.
///
/// Each slot is independent: a sample that fails to decode (or encode)
/// reports `SampleFailed` and the loop moves on. `cancel` is flipped when a
/// newer source replaces this one; a cancelled batch just stops, its partial
/// results already discarded UI-side by the session tag.
pub fn generate_samples(
    path:     &Path,
    session:  Uuid,
    duration: f64,
    cancel:   &AtomicBool,
    tx:       &Sender<MediaResult>,
) {
    for (index, ts) in sample_timestamps(duration).into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            eprintln!("[sample] batch cancelled at slot {index}");
            return;
        }

        match grab_sample(path, ts) {
            Ok((rgba, width, height, jpeg)) => {
                let still = Still {
                    timestamp: ts,
                    width,
                    height,
                    jpeg: Arc::from(jpeg),
                };
                let _ = tx.send(MediaResult::Sample { session, index, rgba, still });
            }
            Err(e) => {
                eprintln!("[sample] slot {index} at t={ts:.2}: {e}");
                let _ = tx.send(MediaResult::SampleFailed {
                    session, index, reason: e.to_string(),
                });
            }
        }
    }

    if !cancel.load(Ordering::Relaxed) {
        eprintln!("[sample] set done <- {}", path.display());
        let _ = tx.send(MediaResult::SampleSetDone { session });
    }
}

fn grab_sample(path: &Path, ts: f64) -> anyhow::Result<(Vec<u8>, u32, u32, Vec<u8>)> {
    let (rgba, w, h) = grab_rgba(path, ts)?;
    let jpeg = encode_jpeg(&rgba, w, h)?;
    Ok((rgba, w, h, jpeg))
}
