// crates/coverpick-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the session
// state: the media worker, every GPU texture, and the tracking fields for
// the capture and playback pipelines. CoverPickApp holds one of these plus
// a SessionState and the two panel modules, nothing else.

use coverpick_core::media_types::{MediaResult, PlaybackFrame};
use coverpick_core::selection::SAMPLE_COUNT;
use coverpick_core::session::SessionState;
use coverpick_media::MediaWorker;
use eframe::egui;
use std::time::Instant;

pub struct AppContext {
    pub worker: MediaWorker,

    // ── GPU textures ─────────────────────────────────────────────────────────
    /// One texture per filmstrip slot, uploaded as Sample results arrive.
    pub strip_textures: [Option<egui::TextureHandle>; SAMPLE_COUNT],
    /// The current cover frame. Seeded from slot 0, replaced by captures.
    pub cover_tex: Option<egui::TextureHandle>,
    /// The frame the preview is showing right now. None while idle.
    pub live_tex: Option<egui::TextureHandle>,

    // ── Capture tracking ─────────────────────────────────────────────────────
    /// Timestamp of the last capture request sent during a drag, for the
    /// movement threshold that keeps a slow drag from spamming the worker.
    pub last_cover_req: Option<f64>,

    // ── Playback tracking ────────────────────────────────────────────────────
    /// Next-to-display playback frame, held until its timestamp is due.
    /// The frame channel drains eagerly; display itself waits on the clock.
    pub pending_pb_frame: Option<PlaybackFrame>,
    /// The preview clock, in source seconds. Advanced by stable_dt while
    /// playing; re-anchored to the first promoted frame's timestamp.
    pub pb_position: f64,
    /// Set once the first frame of the running preview has been promoted.
    pub pb_started: bool,
    /// When PlayPreview was processed, for the no-frames-ever watchdog.
    pub play_clicked_at: Option<Instant>,

    // ── Load tracking ────────────────────────────────────────────────────────
    /// When the probe was kicked off. While the phase is still Probing past
    /// the metadata deadline, the session is failed with a visible message
    /// instead of spinning forever.
    pub probe_started_at: Option<Instant>,
}

impl AppContext {
    pub fn new(worker: MediaWorker) -> Self {
        Self {
            worker,
            strip_textures:    Default::default(),
            cover_tex:         None,
            live_tex:          None,
            last_cover_req:    None,
            pending_pb_frame:  None,
            pb_position:       0.0,
            pb_started:        false,
            play_clicked_at:   None,
            probe_started_at:  None,
        }
    }

    /// Drop everything tied to the previous source. Called when a new file
    /// is accepted, right after `SessionState::begin_session`.
    pub fn reset_session_visuals(&mut self) {
        self.strip_textures   = Default::default();
        self.cover_tex        = None;
        self.live_tex         = None;
        self.last_cover_req   = None;
        self.pending_pb_frame = None;
        self.pb_position      = 0.0;
        self.pb_started       = false;
        self.play_clicked_at  = None;
    }

    /// Drain the MediaWorker result channels and load everything into the
    /// appropriate texture slot or state field. Called once per frame from
    /// `app::poll_media`, after playback frame consumption.
    ///
    /// This is the single translation layer between raw worker output and
    /// UI-visible state. Every arm runs the session id check: output from a
    /// replaced source lands here after `begin_session` has already minted
    /// a new id, and must die silently.
    ///
    /// cover_rx is drained first (before the shared rx) so a drag's capture
    /// results are never delayed behind a sampler batch flooding rx.
    pub fn ingest_media_results(&mut self, state: &mut SessionState, ctx: &egui::Context) {
        // ── Cover captures, high-priority path ───────────────────────────────
        while let Ok(result) = self.worker.cover_rx.try_recv() {
            self.apply_cover(state, ctx, result);
        }

        // ── Shared channel: probe output, filmstrip slots, errors ────────────
        while let Ok(result) = self.worker.rx.try_recv() {
            match result {
                MediaResult::Duration { session, seconds } => {
                    if state.apply_duration(session, seconds) {
                        self.probe_started_at = None;
                        ctx.request_repaint();
                    }
                }

                MediaResult::VideoSize { session, width, height } => {
                    state.apply_size(session, width, height);
                }

                MediaResult::Sample { session, index, rgba, still } => {
                    let size = [still.width as usize, still.height as usize];
                    let seeds_cover = index == 0 && state.cover.is_none();
                    if !state.accept_sample(session, index, still) {
                        continue;
                    }
                    let tex = ctx.load_texture(
                        format!("sample-{index}"),
                        egui::ColorImage::from_rgba_unmultiplied(size, &rgba),
                        egui::TextureOptions::LINEAR,
                    );
                    // Slot 0 doubles as the initial cover; mirror the texture
                    // the same way accept_sample seeds the still.
                    if seeds_cover {
                        self.cover_tex = Some(tex.clone());
                    }
                    self.strip_textures[index] = Some(tex);
                    ctx.request_repaint();
                }

                MediaResult::SampleFailed { session, index, reason: _ } => {
                    // The worker already logged the reason; the slot just
                    // renders as failed.
                    state.fail_sample(session, index);
                    ctx.request_repaint();
                }

                MediaResult::SampleSetDone { session } => {
                    state.finish_samples(session);
                    ctx.request_repaint();
                }

                MediaResult::Error { session, context: stage, message } => {
                    if state.is_current(session) {
                        crate::coverpick_log!("[media] {stage}: {message}");
                        state.fail_session(message);
                        ctx.request_repaint();
                    }
                }

                // Cover normally travels on cover_rx, consumed above; a
                // rerouted one gets the same guarded apply.
                cover @ MediaResult::Cover { .. } => {
                    self.apply_cover(state, ctx, cover);
                }
            }
        }
    }

    /// Hand a finished capture to the state and mirror the texture when it
    /// is accepted. `SessionState::accept_cover` owns the verdict: current
    /// session only, never a seq at or below the one already on screen.
    fn apply_cover(&mut self, state: &mut SessionState, ctx: &egui::Context, result: MediaResult) {
        let MediaResult::Cover { session, seq, rgba, still } = result else { return };
        let size = [still.width as usize, still.height as usize];
        if !state.accept_cover(session, seq, still) {
            return;
        }
        self.cover_tex = Some(ctx.load_texture(
            "cover",
            egui::ColorImage::from_rgba_unmultiplied(size, &rgba),
            egui::TextureOptions::LINEAR,
        ));
        ctx.request_repaint();
    }
}
