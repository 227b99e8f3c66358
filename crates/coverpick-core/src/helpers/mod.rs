// crates/coverpick-core/src/helpers/mod.rs
//
// Shared pure helpers. UI-side formatting lives in coverpick-ui/src/helpers;
// anything here must stay free of egui and ffmpeg.

pub mod time;
