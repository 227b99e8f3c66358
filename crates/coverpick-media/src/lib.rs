// crates/coverpick-media/src/lib.rs
//
// FFmpeg-side half of CoverPick: probing, filmstrip sampling, cover capture
// and segment playback. Talks to coverpick-ui through channels only; nothing
// in here may depend on egui.
//
// MediaWorker (worker.rs) is the only entry point the UI uses. The other
// modules are the decode building blocks it runs on its threads.

pub mod decode;
pub mod probe;
pub mod sampler;
pub mod still;
pub mod worker;

pub use worker::MediaWorker;
pub use coverpick_core::media_types::{MediaResult, PlaybackFrame};
