// crates/coverpick-ui/src/app.rs
//
// CoverPickApp wires the pieces together: session state from
// coverpick-core, the MediaWorker from coverpick-media, and the two UI
// modules. Modules emit SelectorCommands into pending_cmds during the
// paint pass; process_command applies them afterwards, so state never
// changes while a module is mid-draw.

use std::path::PathBuf;
use std::time::Instant;

use coverpick_core::commands::SelectorCommand;
use coverpick_core::helpers::time::format_duration;
use coverpick_core::selection::{self, SEGMENT_SECS};
use coverpick_core::session::{LoadPhase, SessionState};
use coverpick_media::MediaWorker;

use crate::context::AppContext;
use crate::helpers::format::middle_truncate;
use crate::modules::filmstrip::FilmstripModule;
use crate::modules::player::PlayerModule;
use crate::modules::SelectorModule;
use crate::theme::{self, ACCENT, DARK_TEXT_DIM};
use eframe::egui;
use egui::{Align2, Color32, FontId, Id, LayerId, Order, RichText};

/// A probe that produces no duration within this window is declared dead
/// and surfaced as a load failure instead of spinning forever.
const METADATA_WAIT_SECS: f64 = 10.0;

/// A preview whose first frame never arrives is abandoned after roughly
/// the segment length plus decoder spin-up slack.
const PREVIEW_STALL_SECS: f64 = SEGMENT_SECS + 2.0;

/// Minimum selection movement before a drag re-requests the cover still.
/// The capture slot already collapses bursts; this just avoids waking the
/// capture thread for sub-frame wiggles.
const CAPTURE_MOVE_SECS: f64 = 0.010;

const STRIP_PANEL_H: f32 = 128.0;

pub struct CoverPickApp {
    state:        SessionState,
    context:      AppContext,
    filmstrip:    FilmstripModule,
    player:       PlayerModule,
    pending_cmds: Vec<SelectorCommand>,
}

impl CoverPickApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::configure_style(&cc.egui_ctx);
        cc.egui_ctx.set_theme(egui::ThemePreference::Dark);

        Self {
            state:        SessionState::default(),
            context:      AppContext::new(MediaWorker::new()),
            filmstrip:    FilmstripModule::new(),
            player:       PlayerModule::new(),
            pending_cmds: Vec::new(),
        }
    }

    /// Start over with a new source. Previous session's textures, preview
    /// and in-flight work are all dropped; results still in the channels
    /// carry the old session id and fall on the floor during ingest.
    fn load_video(&mut self, path: PathBuf) {
        crate::coverpick_log!("[app] load: {}", path.display());
        let session = self.state.begin_session(path.clone());
        self.context.worker.stop_preview();
        self.context.reset_session_visuals();
        self.player.reset();
        self.context.probe_started_at = Some(Instant::now());
        self.context.worker.load_source(session, path);
    }

    /// Hand the current selection to the capture thread. `force` skips the
    /// movement threshold so slot clicks always refresh the cover.
    fn request_capture(&mut self, force: bool) {
        let Some(src) = &self.state.source else { return };
        if src.duration <= 0.0 {
            return;
        }
        let t = self.state.selection;
        let moved = self.context.last_cover_req
            .map_or(true, |last| (t - last).abs() >= CAPTURE_MOVE_SECS);
        if force || moved {
            self.context.last_cover_req = Some(t);
            self.context.worker.request_cover(src.id, src.path.clone(), t);
        }
    }

    fn process_command(&mut self, cmd: SelectorCommand, ctx: &egui::Context) {
        match cmd {
            SelectorCommand::LoadVideo(path) => self.load_video(path),

            SelectorCommand::DismissError => self.state.dismiss_error(),

            SelectorCommand::SelectAt(t) => {
                if self.state.preview.is_playing() {
                    return;
                }
                self.state.set_selection(t);
                self.request_capture(false);
            }

            SelectorCommand::SelectSample(index) => {
                if self.state.preview.is_playing() {
                    return;
                }
                let d = self.state.duration();
                self.state.set_selection(selection::timestamp_for_sample(index, d));
                self.request_capture(true);
            }

            SelectorCommand::PlayPreview => {
                if self.state.phase != LoadPhase::Ready {
                    return;
                }
                let Some(src) = &self.state.source else { return };
                let (id, path) = (src.id, src.path.clone());
                let start = self.state.selection;
                // The gate rejects re-entry; a click during playback is a no-op.
                if self.state.preview.play(start) {
                    self.context.pb_position     = start;
                    self.context.pb_started      = false;
                    self.context.pending_pb_frame = None;
                    self.context.live_tex        = None;
                    self.context.play_clicked_at = Some(Instant::now());
                    self.context.worker.start_preview(id, path, start);
                    ctx.request_repaint();
                }
            }

            SelectorCommand::StopPreview => {
                self.state.preview.stop();
                self.context.worker.stop_preview();
                self.context.live_tex         = None;
                self.context.pending_pb_frame = None;
                self.context.pb_started       = false;
                self.context.play_clicked_at  = None;
                ctx.request_repaint();
            }

            SelectorCommand::CopySummary => {
                if let Some(json) = self.state.summary_json() {
                    ctx.copy_text(json);
                    crate::coverpick_log!("[app] summary copied");
                }
            }
        }
    }

    fn poll_media(&mut self, ctx: &egui::Context) {
        // Probe watchdog. ffmpeg can hang on some containers; a session
        // stuck in Probing past the deadline becomes a visible failure.
        if self.state.phase == LoadPhase::Probing {
            if let Some(t0) = self.context.probe_started_at {
                if t0.elapsed().as_secs_f64() > METADATA_WAIT_SECS {
                    crate::coverpick_log!("[app] metadata timeout");
                    self.context.probe_started_at = None;
                    self.state.fail_session(format!(
                        "No video metadata within {METADATA_WAIT_SECS:.0} s"));
                }
            }
        }

        PlayerModule::poll_playback(&self.state, &mut self.context, ctx);
        self.context.ingest_media_results(&mut self.state, ctx);
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if hovering {
            let painter = ctx.layer_painter(
                LayerId::new(Order::Foreground, Id::new("dnd_overlay")));
            let rect = ctx.screen_rect();
            painter.rect_filled(rect, 0.0,
                Color32::from_rgba_unmultiplied(12, 14, 16, 190));
            painter.text(rect.center(), Align2::CENTER_CENTER,
                "Drop to load", FontId::proportional(22.0), ACCENT);
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                self.pending_cmds.push(SelectorCommand::LoadVideo(path));
            }
        }
    }
}

impl eframe::App for CoverPickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drag_and_drop(ctx);
        self.poll_media(ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new("🎞 CoverPick")
                        .strong().size(15.0).color(ACCENT));
                    ui.add_space(8.0);
                    ui.separator();
                    ui.add_space(4.0);

                    if ui.button("Open video…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Video", &["mp4", "mov", "mkv", "avi", "webm", "m4v"])
                            .pick_file()
                        {
                            self.pending_cmds.push(SelectorCommand::LoadVideo(path));
                        }
                    }
                    ui.add_space(8.0);

                    if let Some(src) = &self.state.source {
                        ui.label(RichText::new(middle_truncate(&src.name, 40)).size(12.0));
                        if src.duration > 0.0 {
                            ui.label(RichText::new(format_duration(src.duration))
                                .monospace().size(11.0).color(DARK_TEXT_DIM));
                        }
                        if src.width > 0 {
                            ui.label(RichText::new(format!("{}x{}", src.width, src.height))
                                .size(11.0).color(DARK_TEXT_DIM));
                        }
                    } else {
                        ui.label(RichText::new("Drop a video file anywhere")
                            .weak().size(11.0));
                    }
                });
            });

        egui::TopBottomPanel::bottom("strip_panel")
            .exact_height(STRIP_PANEL_H)
            .show(ctx, |ui| {
                self.filmstrip.ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            // The canvas shows live frames only while the gate is open;
            // otherwise the most recent cover still.
            self.player.current_frame = if self.state.preview.is_playing() {
                self.context.live_tex.clone()
            } else {
                self.context.cover_tex.clone()
            };
            self.player.ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
        });

        let cmds = std::mem::take(&mut self.pending_cmds);
        for cmd in cmds {
            self.process_command(cmd, ctx);
        }

        // Preview clock. Runs on wall time once the first frame has anchored
        // it; the gate closes the window when the position crosses the end.
        if self.state.preview.is_playing() {
            let dt = ctx.input(|i| i.stable_dt) as f64;
            if self.context.pb_started {
                self.context.pb_position += dt;
            }
            let stalled = !self.context.pb_started
                && self.context.play_clicked_at
                    .map_or(false, |t| t.elapsed().as_secs_f64() > PREVIEW_STALL_SECS);
            if self.state.preview.should_stop(self.context.pb_position) || stalled {
                if stalled {
                    crate::coverpick_log!("[app] preview stalled, stopping");
                }
                self.process_command(SelectorCommand::StopPreview, ctx);
            }
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        crate::coverpick_log!("[app] exit");
        self.context.worker.shutdown();
    }
}
