// crates/coverpick-core/src/media_types.rs
//
// Types that flow across the channels between coverpick-media and coverpick-ui.
// No egui, no ffmpeg, just plain data.
//
// Every result carries the `session` Uuid it was produced for. The UI drops
// anything whose session is not the current one, which is what makes replacing
// the source mid-sample or mid-drag safe: stale worker output becomes a no-op
// instead of painting over the new source's state.

use std::sync::Arc;
use uuid::Uuid;

/// A captured still: the JPEG bytes kept in session state plus the dimensions
/// it was rasterized at (native size divided by the raster divisor).
#[derive(Clone)]
pub struct Still {
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    pub jpeg:      Arc<[u8]>,
}

impl std::fmt::Debug for Still {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Still")
            .field("timestamp", &self.timestamp)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_len", &self.jpeg.len())
            .finish()
    }
}

/// Results sent from the MediaWorker background threads to the UI.
///
/// `Sample`/`Cover` carry the raw RGBA alongside the encoded still so the UI
/// can upload a texture without decoding the JPEG it just received.
pub enum MediaResult {
    Duration  { session: Uuid, seconds: f64 },
    VideoSize { session: Uuid, width: u32, height: u32 },
    /// One filmstrip slot. The sampler runs a single sequential loop, so
    /// indexes arrive strictly ascending.
    Sample { session: Uuid, index: usize, rgba: Vec<u8>, still: Still },
    /// One slot failed to decode; the rest of the batch still arrives.
    SampleFailed { session: Uuid, index: usize, reason: String },
    /// The sampler finished its pass (including any failed slots).
    SampleSetDone { session: Uuid },
    /// A served cover capture. `seq` is the capture sequence number; the UI
    /// applies a cover only when `seq` is newer than the last one applied,
    /// so an out-of-order completion can never overwrite a fresher frame.
    Cover { session: Uuid, seq: u64, rgba: Vec<u8>, still: Still },
    Error { session: Uuid, context: &'static str, message: String },
}

/// A decoded frame from the dedicated segment-playback pipeline.
pub struct PlaybackFrame {
    pub session:   Uuid,
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    pub data:      Vec<u8>, // RGBA
}
