// crates/coverpick-core/src/lib.rs
//
// Pure state and math for CoverPick. No egui, no ffmpeg; coverpick-media and
// coverpick-ui both depend on this crate, never the other way around.

pub mod commands;
pub mod helpers;
pub mod media_types;
pub mod preview;
pub mod selection;
pub mod session;

pub use selection::{SAMPLE_COUNT, SEGMENT_SECS};
pub use session::SessionState;
