// crates/coverpick-core/src/session.rs
// Pure session data, no egui, no ffmpeg, no runtime handles.
// The single source of truth the UI renders from.

use std::path::PathBuf;
use serde::Serialize;
use uuid::Uuid;

use crate::media_types::Still;
use crate::preview::PreviewGate;
use crate::selection::{self, SAMPLE_COUNT};

/// The loaded source file. `id` is the session generation tag: a fresh Uuid
/// is minted every time a file is accepted, every media result carries it,
/// and results bearing any other id are dropped on ingest.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub id:       Uuid,
    pub path:     PathBuf,
    pub name:     String,
    /// Seconds. 0.0 until the probe reports back.
    pub duration: f64,
    pub width:    u32,
    pub height:   u32,
}

/// One filmstrip slot.
#[derive(Clone, Debug, Default)]
pub enum SampleSlot {
    #[default]
    Pending,
    Ready(Still),
    /// The decode for this slot failed; the batch carried on without it.
    Failed,
}

/// Where the session is in its load pipeline. Drives the status line and
/// the empty-state screen.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum LoadPhase {
    #[default]
    Empty,
    Probing,
    Sampling,
    Ready,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub source:    Option<SourceInfo>,
    pub phase:     LoadPhase,
    pub samples:   [SampleSlot; SAMPLE_COUNT],
    /// Segment start in seconds. Kept inside
    /// `[0, max_start_secs(duration)]` by every write path.
    pub selection: f64,
    /// The current cover still. Sample 0 the moment it arrives, then
    /// whatever the latest applied capture produced.
    pub cover:     Option<Still>,
    /// Seq of the last applied capture. Captures resolve out of order under
    /// a fast drag; anything at or below this watermark lost the race.
    cover_seq:     u64,
    pub preview:   PreviewGate,
}

/// Host-facing summary of the picked segment, serialized by `summary_json`.
#[derive(Serialize)]
struct SelectionSummary<'a> {
    source:          &'a str,
    duration_secs:   f64,
    start_secs:      f64,
    end_secs:        f64,
    cover_timestamp: Option<f64>,
}

impl SessionState {
    /// Accept a new source file. Everything derived from the previous source
    /// is reset; the returned Uuid tags all media work for this session.
    pub fn begin_session(&mut self, path: PathBuf) -> Uuid {
        let name = path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let id = Uuid::new_v4();
        self.source = Some(SourceInfo {
            id,
            path,
            name,
            duration: 0.0,
            width:    0,
            height:   0,
        });
        self.phase     = LoadPhase::Probing;
        self.samples   = Default::default();
        self.selection = 0.0;
        self.cover     = None;
        self.cover_seq = 0;
        self.preview.stop();
        id
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.source.as_ref().map(|s| s.id)
    }

    pub fn is_current(&self, session: Uuid) -> bool {
        self.current_id() == Some(session)
    }

    /// Gate for every media result. `Failed` is terminal: a watchdog-failed
    /// load can leave its probe or sampler running, and everything those
    /// threads send afterwards must fall on the floor until Dismiss or a
    /// new file resets the session.
    fn session_live(&self, session: Uuid) -> bool {
        self.is_current(session) && !matches!(self.phase, LoadPhase::Failed(_))
    }

    pub fn duration(&self) -> f64 {
        self.source.as_ref().map(|s| s.duration).unwrap_or(0.0)
    }

    /// Probe result: duration arrived, sampling can begin. Returns whether
    /// it applied, so the caller can disarm its metadata watchdog.
    pub fn apply_duration(&mut self, session: Uuid, seconds: f64) -> bool {
        if !self.session_live(session) {
            return false;
        }
        if let Some(src) = self.source.as_mut() {
            src.duration = seconds;
        }
        self.selection = selection::clamp_selection(self.selection, seconds);
        if self.phase == LoadPhase::Probing {
            self.phase = LoadPhase::Sampling;
        }
        true
    }

    pub fn apply_size(&mut self, session: Uuid, width: u32, height: u32) {
        if !self.session_live(session) {
            return;
        }
        if let Some(src) = self.source.as_mut() {
            src.width  = width;
            src.height = height;
        }
    }

    /// Fill one filmstrip slot. The first slot doubles as the initial cover.
    /// Returns whether it applied, so the caller can mirror the texture.
    pub fn accept_sample(&mut self, session: Uuid, index: usize, still: Still) -> bool {
        if !self.session_live(session) || index >= SAMPLE_COUNT {
            return false;
        }
        if index == 0 && self.cover.is_none() {
            self.cover = Some(still.clone());
        }
        self.samples[index] = SampleSlot::Ready(still);
        true
    }

    pub fn fail_sample(&mut self, session: Uuid, index: usize) {
        if !self.session_live(session) || index >= SAMPLE_COUNT {
            return;
        }
        self.samples[index] = SampleSlot::Failed;
    }

    pub fn finish_samples(&mut self, session: Uuid) {
        if !self.session_live(session) {
            return;
        }
        if self.phase == LoadPhase::Sampling {
            self.phase = LoadPhase::Ready;
        }
    }

    pub fn fail_session(&mut self, message: String) {
        self.phase = LoadPhase::Failed(message);
    }

    /// Clear a failure banner. A failed load leaves nothing usable behind,
    /// so this drops back to the empty screen.
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, LoadPhase::Failed(_)) {
            *self = Self::default();
        }
    }

    /// Clamped selection write. The only way the selection moves.
    pub fn set_selection(&mut self, t: f64) {
        self.selection = selection::clamp_selection(t, self.duration());
    }

    /// Apply a finished capture. `seq` orders captures within the session;
    /// one resolving after a newer capture has already landed is dropped.
    /// Returns whether the cover changed, so the caller can mirror the
    /// matching texture.
    pub fn accept_cover(&mut self, session: Uuid, seq: u64, still: Still) -> bool {
        if !self.session_live(session) || seq <= self.cover_seq {
            return false;
        }
        self.cover_seq = seq;
        self.cover = Some(still);
        true
    }

    /// Slots that have reported back, ready or failed. Drives `sampling n/12`.
    pub fn samples_done(&self) -> usize {
        self.samples.iter()
            .filter(|s| !matches!(s, SampleSlot::Pending))
            .count()
    }

    /// JSON summary of the picked segment, or None before a source is loaded.
    /// This is the output a host reads off: selection window plus the cover
    /// timestamp (`ctx.copy_text` puts it on the clipboard).
    pub fn summary_json(&self) -> Option<String> {
        let src = self.source.as_ref()?;
        let summary = SelectionSummary {
            source:          &src.name,
            duration_secs:   src.duration,
            start_secs:      self.selection,
            end_secs:        selection::window_end(self.selection),
            cover_timestamp: self.cover.as_ref().map(|c| c.timestamp),
        };
        serde_json::to_string_pretty(&summary).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn still(ts: f64) -> Still {
        Still { timestamp: ts, width: 4, height: 2, jpeg: Arc::from(vec![0u8; 8]) }
    }

    #[test]
    fn begin_session_resets_everything() {
        let mut s = SessionState::default();
        let first = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.apply_duration(first, 30.0);
        s.accept_sample(first, 0, still(0.0));
        s.set_selection(12.0);
        s.preview.play(12.0);

        let second = s.begin_session(PathBuf::from("/tmp/b.mp4"));
        assert_ne!(first, second);
        assert_eq!(s.phase, LoadPhase::Probing);
        assert_eq!(s.selection, 0.0);
        assert!(s.cover.is_none());
        assert!(!s.preview.is_playing());
        assert!(s.samples.iter().all(|slot| matches!(slot, SampleSlot::Pending)));
    }

    #[test]
    fn stale_session_results_are_inert() {
        let mut s = SessionState::default();
        let old = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        let _new = s.begin_session(PathBuf::from("/tmp/b.mp4"));

        s.apply_duration(old, 99.0);
        s.accept_sample(old, 3, still(1.0));
        s.accept_cover(old, 1, still(2.0));
        s.finish_samples(old);

        assert_eq!(s.duration(), 0.0);
        assert!(matches!(s.samples[3], SampleSlot::Pending));
        assert!(s.cover.is_none());
        assert_eq!(s.phase, LoadPhase::Probing);
    }

    #[test]
    fn failed_session_ignores_late_results() {
        let mut s = SessionState::default();
        let id = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.fail_session("no video metadata within 10 s".into());

        // The probe and sampler behind a watchdog timeout may still be
        // running under the same session id; nothing they report after the
        // failure may land behind the error banner.
        s.apply_duration(id, 30.0);
        s.apply_size(id, 1920, 1080);
        s.accept_sample(id, 0, still(0.0));
        s.accept_cover(id, 1, still(5.0));
        s.finish_samples(id);
        s.set_selection(12.0);

        assert!(matches!(s.phase, LoadPhase::Failed(_)));
        assert_eq!(s.duration(), 0.0);
        assert!(matches!(s.samples[0], SampleSlot::Pending));
        assert!(s.cover.is_none());
        assert_eq!(s.selection, 0.0, "selection stays pinned without a duration");

        // Dismiss still recovers, and the next load is unaffected.
        s.dismiss_error();
        let id2 = s.begin_session(PathBuf::from("/tmp/b.mp4"));
        assert!(s.apply_duration(id2, 20.0));
        assert_eq!(s.phase, LoadPhase::Sampling);
    }

    #[test]
    fn first_sample_becomes_cover() {
        let mut s = SessionState::default();
        let id = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.apply_duration(id, 30.0);
        s.accept_sample(id, 1, still(2.7));
        assert!(s.cover.is_none(), "only slot 0 seeds the cover");
        s.accept_sample(id, 0, still(0.0));
        assert_eq!(s.cover.as_ref().map(|c| c.timestamp), Some(0.0));

        // A later capture replaces it; slot 0 arriving again must not undo that.
        s.accept_cover(id, 1, still(5.5));
        s.accept_sample(id, 0, still(0.0));
        assert_eq!(s.cover.as_ref().map(|c| c.timestamp), Some(5.5));
    }

    #[test]
    fn out_of_order_capture_results_keep_the_newest() {
        let mut s = SessionState::default();
        let id = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.apply_duration(id, 30.0);

        assert!(s.accept_cover(id, 3, still(9.0)));
        // Seq 2 resolved late, after seq 3 was already on screen.
        assert!(!s.accept_cover(id, 2, still(6.0)));
        assert_eq!(s.cover.as_ref().map(|c| c.timestamp), Some(9.0));
        // Equal seq is stale too.
        assert!(!s.accept_cover(id, 3, still(7.0)));
        assert!(s.accept_cover(id, 4, still(12.0)));
        assert_eq!(s.cover.as_ref().map(|c| c.timestamp), Some(12.0));

        // The watermark resets with the session; worker seqs keep rising
        // globally, so the first capture of a new source always lands.
        let id2 = s.begin_session(PathBuf::from("/tmp/b.mp4"));
        s.apply_duration(id2, 20.0);
        assert!(s.accept_cover(id2, 5, still(1.0)));
        assert_eq!(s.cover.as_ref().map(|c| c.timestamp), Some(1.0));
    }

    #[test]
    fn selection_is_always_clamped() {
        let mut s = SessionState::default();
        let id = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.apply_duration(id, 30.0);
        s.set_selection(40.0);
        assert_eq!(s.selection, 27.0);
        s.set_selection(-2.0);
        assert_eq!(s.selection, 0.0);
    }

    #[test]
    fn unknown_duration_pins_selection_to_zero() {
        let mut s = SessionState::default();
        s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.set_selection(10.0);
        assert_eq!(s.selection, 0.0);
    }

    #[test]
    fn failed_slots_do_not_block_ready() {
        let mut s = SessionState::default();
        let id = s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.apply_duration(id, 30.0);
        for i in 0..SAMPLE_COUNT {
            if i == 7 {
                s.fail_sample(id, i);
            } else {
                s.accept_sample(id, i, still(i as f64));
            }
        }
        s.finish_samples(id);
        assert_eq!(s.phase, LoadPhase::Ready);
        assert_eq!(s.samples_done(), SAMPLE_COUNT);
        assert!(matches!(s.samples[7], SampleSlot::Failed));
    }

    #[test]
    fn dismiss_error_returns_to_empty() {
        let mut s = SessionState::default();
        s.begin_session(PathBuf::from("/tmp/a.mp4"));
        s.fail_session("no video stream".into());
        s.dismiss_error();
        assert_eq!(s.phase, LoadPhase::Empty);
        assert!(s.source.is_none());

        // Dismiss is a no-op on any other phase.
        let id = s.begin_session(PathBuf::from("/tmp/b.mp4"));
        s.apply_duration(id, 10.0);
        s.dismiss_error();
        assert!(s.source.is_some());
        assert_eq!(s.phase, LoadPhase::Sampling);
    }

    #[test]
    fn summary_reports_the_window() {
        let mut s = SessionState::default();
        assert!(s.summary_json().is_none());
        let id = s.begin_session(PathBuf::from("/tmp/clip.mp4"));
        s.apply_duration(id, 30.0);
        s.set_selection(4.0);
        let json = s.summary_json().unwrap();
        assert!(json.contains("\"start_secs\": 4.0"));
        assert!(json.contains("\"end_secs\": 7.0"));
        assert!(json.contains("clip.mp4"));
    }
}
