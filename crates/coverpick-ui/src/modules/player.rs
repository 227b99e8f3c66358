// crates/coverpick-ui/src/modules/player.rs
//
// PlayerModule renders the central canvas: the cover frame while idle, the
// live segment while previewing. It also owns poll_playback, the gated
// consumer of the playback frame channel, called every frame from
// app::poll_media.

use coverpick_core::commands::SelectorCommand;
use coverpick_core::helpers::time::format_timecode;
use coverpick_core::session::{LoadPhase, SessionState};
use crate::context::AppContext;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM};
use super::SelectorModule;
use eframe::egui;
use egui::{Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

// ── Transport bar layout constants ───────────────────────────────────────────
const BAR_H:    f32 = 44.0;
const BTN_SIZE: f32 = 30.0;
const BTN_R:    f32 = 4.0;
const ICON_SZ:  f32 = 9.0;    // half-size of painted icon geometry
// CONTENT_W = play(30) + gap(12) + timecode(150)
const CONTENT_W: f32 = 192.0;

pub struct PlayerModule {
    /// The frame to show this tick, set by app.rs before ui() is called:
    /// the live playback texture while previewing, the cover otherwise.
    pub current_frame: Option<egui::TextureHandle>,
    /// Last successfully shown frame. Held across ticks so the brief gap
    /// between a capture request and its result never flashes black.
    held_frame: Option<egui::TextureHandle>,
}

impl PlayerModule {
    pub fn new() -> Self {
        Self { current_frame: None, held_frame: None }
    }

    /// Forget held frames. Called when a new source replaces the old one.
    pub fn reset(&mut self) {
        self.current_frame = None;
        self.held_frame = None;
    }

    // ── poll_playback ─────────────────────────────────────────────────────────
    /// Gated playback frame consumption. Call from app::poll_media().
    ///
    /// The decode thread pre-fills a 32-frame channel as fast as FFmpeg can
    /// go. Draining all frames and showing the last would race ahead at
    /// decode speed, so a one-slot pending buffer holds the next frame until
    /// the preview clock has caught up to its timestamp.
    ///
    /// The first promoted frame re-anchors the clock to its own timestamp:
    /// seek and pre-roll latency then delays the start instead of eating
    /// into the window.
    pub fn poll_playback(state: &SessionState, actx: &mut AppContext, egui_ctx: &egui::Context) {
        if !state.preview.is_playing() {
            return;
        }
        let Some(session) = state.current_id() else { return };
        let Some((start, _end)) = state.preview.window() else { return };
        let position = actx.pb_position;

        // Discard a stale pending frame rather than letting it block the
        // slot: wrong session after a re-upload, far behind the clock, or
        // (before the first promote) nowhere near the window start. The last
        // case is a leftover from the previous preview that slipped out
        // between the channel flush and the Start command.
        if let Some(p) = &actx.pending_pb_frame {
            let wrong_session = p.session != session;
            let too_old       = p.timestamp < position - 3.0;
            let wrong_window  = !actx.pb_started && (p.timestamp - start).abs() > 1.0;
            if wrong_session || too_old || wrong_window {
                actx.pending_pb_frame = None;
            }
        }

        // Step 1: fill the pending slot if empty.
        if actx.pending_pb_frame.is_none() {
            if let Ok(f) = actx.worker.pb_rx.try_recv() {
                actx.pending_pb_frame = Some(f);
            }
        }

        // Step 2: fast-forward past overdue frames so a slow UI frame never
        // causes the preview to fall permanently behind.
        while actx.pending_pb_frame.as_ref()
            .map(|f| f.session == session && f.timestamp < position - (1.0 / 30.0))
            .unwrap_or(false)
        {
            match actx.worker.pb_rx.try_recv() {
                Ok(newer) => actx.pending_pb_frame = Some(newer),
                Err(_) => break,
            }
        }

        // Step 3: promote the pending frame when its timestamp is due.
        // Upper bound: never show a frame more than 1 tick early. Lower
        // bound: 3 s, ample headroom for seek latency; genuinely stale
        // frames were already discarded above.
        let frame_due = actx.pending_pb_frame.as_ref()
            .map(|f| {
                f.session == session
                    && if actx.pb_started {
                        f.timestamp <= position + (1.0 / 60.0) && f.timestamp >= position - 3.0
                    } else {
                        // First frame of the run; anchors the clock below.
                        (f.timestamp - start).abs() <= 1.0
                    }
            })
            .unwrap_or(false);

        if frame_due {
            if let Some(f) = actx.pending_pb_frame.take() {
                let tex = egui_ctx.load_texture(
                    "live",
                    egui::ColorImage::from_rgba_unmultiplied(
                        [f.width as usize, f.height as usize], &f.data,
                    ),
                    egui::TextureOptions::LINEAR,
                );
                actx.live_tex = Some(tex);
                if !actx.pb_started {
                    actx.pb_started = true;
                    actx.pb_position = f.timestamp;
                }
                egui_ctx.request_repaint();
                // Pre-pull the next frame so it's ready for the next tick.
                if let Ok(next) = actx.worker.pb_rx.try_recv() {
                    actx.pending_pb_frame = Some(next);
                }
            }
        }
    }
}

impl SelectorModule for PlayerModule {
    fn name(&self) -> &str { "Player" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, actx: &mut AppContext, cmd: &mut Vec<SelectorCommand>) {
        ui.vertical(|ui| {
            // ── Video canvas ─────────────────────────────────────────────────
            // Full panel width allocated, canvas drawn centered inside it at
            // the source's aspect ratio.
            let ratio = state.source.as_ref()
                .filter(|s| s.width > 0 && s.height > 0)
                .map(|s| s.width as f32 / s.height as f32)
                .unwrap_or(16.0 / 9.0);
            let panel_w = ui.available_width();
            let panel_h = (ui.available_height() - BAR_H - 12.0).max(80.0);

            let (canvas_w, canvas_h) = {
                let h = panel_w / ratio;
                if h <= panel_h { (panel_w, h) } else { (panel_h * ratio, panel_h) }
            };

            let (outer_rect, _) = ui.allocate_exact_size(
                Vec2::new(panel_w, canvas_h.max(80.0)), Sense::hover());
            let canvas = Rect::from_center_size(
                outer_rect.center(), Vec2::new(canvas_w, canvas_h));
            let painter = ui.painter();

            let playing = state.preview.is_playing();
            if playing {
                painter.rect_stroke(canvas.expand(2.0), 4.0,
                    Stroke::new(1.5, ACCENT.gamma_multiply(0.55)),
                    egui::StrokeKind::Outside);
            } else {
                painter.rect_stroke(canvas.expand(1.0), 4.0,
                    Stroke::new(1.0, DARK_BORDER),
                    egui::StrokeKind::Outside);
            }
            painter.rect_filled(canvas, 3.0, Color32::BLACK);

            if let Some(src) = &state.source {
                // Hold the latest frame across ticks so capture latency and
                // the idle/playing swap never flash black.
                if self.current_frame.is_some() {
                    self.held_frame = self.current_frame.clone();
                }
                if let Some(tex) = &self.held_frame {
                    painter.image(tex.id(), canvas,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE);
                } else {
                    // Nothing decoded yet: name + spinner while loading.
                    painter.text(
                        canvas.center() - egui::vec2(0.0, 20.0),
                        egui::Align2::CENTER_CENTER,
                        &src.name,
                        FontId::proportional(13.0),
                        Color32::from_gray(70));
                    let t  = ui.input(|i| i.time) as f32;
                    let cx = canvas.center() + egui::vec2(0.0, 20.0);
                    let r  = 12.0_f32;
                    painter.circle_stroke(cx, r, Stroke::new(1.5, Color32::from_gray(35)));
                    let a = t * 3.5;
                    painter.line_segment(
                        [cx, cx + egui::vec2(a.cos() * r, a.sin() * r)],
                        Stroke::new(2.0, ACCENT));
                    ui.ctx().request_repaint();
                }
            } else {
                self.held_frame = None;
                painter.text(canvas.center(), egui::Align2::CENTER_CENTER,
                    "NO VIDEO", FontId::monospace(14.0), Color32::from_gray(40));
                let mut y = canvas.min.y;
                while y < canvas.max.y {
                    painter.line_segment(
                        [Pos2::new(canvas.min.x, y), Pos2::new(canvas.max.x, y)],
                        Stroke::new(0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 3)));
                    y += 4.0;
                }
            }

            ui.add_space(6.0);

            // ── Transport bar ─────────────────────────────────────────────────
            // Allocated full-width, elements positioned by coordinate math
            // from the bar center so the button is always the same pixel size.
            let bar_w = ui.available_width();
            let (bar_rect, _) = ui.allocate_exact_size(
                Vec2::new(bar_w, BAR_H), Sense::hover());

            let painter = ui.painter();
            painter.rect_filled(bar_rect, BTN_R, DARK_BG_3);
            painter.rect_stroke(bar_rect, BTN_R,
                Stroke::new(1.0, DARK_BORDER), egui::StrokeKind::Outside);

            let cy = bar_rect.center().y;
            let mut x = bar_rect.center().x - CONTENT_W / 2.0;

            // ── Play button ───────────────────────────────────────────────
            // A preview is not stoppable: the click is simply ignored while
            // one is running (the gate rejects it). The button grays out
            // until the filmstrip is ready.
            let enabled = state.phase == LoadPhase::Ready;
            let r = Rect::from_min_size(
                Pos2::new(x, cy - BTN_SIZE / 2.0), Vec2::splat(BTN_SIZE));
            let resp = ui.interact(r, ui.id().with("play_segment"), Sense::click());
            let (bg, icol) = if !enabled {
                (DARK_BG_3, Color32::from_gray(80))
            } else if resp.is_pointer_button_down_on() {
                (DARK_BG_2.gamma_multiply(0.6), Color32::WHITE)
            } else if resp.hovered() {
                (DARK_BG_2, ACCENT.linear_multiply(1.2))
            } else if playing {
                (DARK_BG_3, ACCENT)
            } else {
                (DARK_BG_3, Color32::from_gray(175))
            };
            painter.rect_filled(r, BTN_R, bg);
            if enabled && (resp.hovered() || playing) {
                painter.rect_stroke(r, BTN_R,
                    Stroke::new(1.0, ACCENT.gamma_multiply(0.35)),
                    egui::StrokeKind::Outside);
            }
            let c = r.center();
            painter.add(egui::Shape::convex_polygon(vec![
                Pos2::new(c.x - ICON_SZ * 0.5, c.y - ICON_SZ),
                Pos2::new(c.x - ICON_SZ * 0.5, c.y + ICON_SZ),
                Pos2::new(c.x + ICON_SZ,       c.y),
            ], icol, Stroke::NONE));
            if resp.clicked() && enabled {
                cmd.push(SelectorCommand::PlayPreview);
            }
            x += BTN_SIZE + 12.0;

            // ── Timecode ──────────────────────────────────────────────────
            // Live position over the window end while previewing, the picked
            // window while idle.
            let label = if playing {
                let end = state.preview.window().map(|(_, e)| e).unwrap_or(0.0);
                format!("{} / {}", format_timecode(actx.pb_position), format_timecode(end))
            } else {
                format!("{} → {}",
                    format_timecode(state.selection),
                    format_timecode(coverpick_core::selection::window_end(state.selection)))
            };
            painter.text(
                Pos2::new(x, cy),
                egui::Align2::LEFT_CENTER,
                label,
                FontId::monospace(12.0),
                if playing { ACCENT } else { DARK_TEXT_DIM });
        });
    }
}
