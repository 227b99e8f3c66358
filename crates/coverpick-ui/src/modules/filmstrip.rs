// crates/coverpick-ui/src/modules/filmstrip.rs
//
// FilmstripModule renders the bottom panel: twelve evenly spaced sample
// frames, the segment overlay with its drag handle, and the status line.
//
// The whole strip is one hit area. Pointer x maps through
// selection::timestamp_from_pointer, so the overlay can never be dragged
// past the point where the segment would overrun the source. egui keeps
// reporting the drag through pointer capture until release, even when the
// pointer leaves the strip, so a fast drag never drops mid-gesture.

use coverpick_core::commands::SelectorCommand;
use coverpick_core::helpers::time::{format_duration, format_timecode};
use coverpick_core::selection::{self, SAMPLE_COUNT};
use coverpick_core::session::{LoadPhase, SampleSlot, SessionState};
use crate::context::AppContext;
use crate::theme::{ACCENT, ACCENT_HOVER, DARK_BG_0, DARK_BG_2, DARK_TEXT_DIM, ERROR};
use super::SelectorModule;
use eframe::egui;
use egui::{Align, Color32, FontId, Id, Layout, LayerId, Order, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use egui_extras::{Size, StripBuilder};

const STRIP_H: f32 = 84.0;
const HANDLE_KNOB_R: f32 = 5.0;

pub struct FilmstripModule {
    /// Media time of the last SelectAt emitted mid-drag. Mid-drag emits are
    /// skipped until the mapped time moves at least a frame's worth, so a
    /// held-still pointer doesn't stream commands.
    last_drag_emitted: f64,
}

impl FilmstripModule {
    pub fn new() -> Self {
        Self { last_drag_emitted: -1.0 }
    }

    fn strip_band(&mut self, ui: &mut Ui, state: &SessionState, actx: &AppContext, cmd: &mut Vec<SelectorCommand>) {
        let avail = ui.available_rect_before_wrap();
        let rect = Rect::from_min_size(avail.min, Vec2::new(avail.width(), STRIP_H));
        let painter = ui.painter();
        let duration = state.duration();
        let playing = state.preview.is_playing();
        let sampling = state.phase == LoadPhase::Sampling || state.phase == LoadPhase::Probing;
        let failed = matches!(state.phase, LoadPhase::Failed(_));

        painter.rect_filled(rect, 4.0, DARK_BG_0);

        // ── Sample cells ─────────────────────────────────────────────────────
        let cell_w = rect.width() / SAMPLE_COUNT as f32;
        for i in 0..SAMPLE_COUNT {
            let cell = Rect::from_min_size(
                Pos2::new(rect.min.x + i as f32 * cell_w, rect.min.y),
                Vec2::new(cell_w, rect.height()));
            let inner = cell.shrink(1.0);

            match (&state.samples[i], &actx.strip_textures[i]) {
                (SampleSlot::Ready(_), Some(tex)) => {
                    // Aspect-fit the thumbnail inside its cell.
                    let tsize = tex.size_vec2();
                    let scale = (inner.width() / tsize.x).min(inner.height() / tsize.y);
                    let draw = Rect::from_center_size(inner.center(), tsize * scale);
                    painter.rect_filled(inner, 2.0, Color32::BLACK);
                    painter.image(tex.id(), draw,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE);
                }
                (SampleSlot::Failed, _) => {
                    painter.rect_filled(inner, 2.0, DARK_BG_2);
                    painter.text(inner.center(), egui::Align2::CENTER_CENTER,
                        "✕", FontId::proportional(14.0), ERROR.gamma_multiply(0.8));
                }
                _ => {
                    painter.rect_filled(inner, 2.0, DARK_BG_2);
                    if sampling {
                        let t = ui.input(|i| i.time) as f32;
                        let cx = inner.center();
                        let r = 7.0_f32;
                        painter.circle_stroke(cx, r, Stroke::new(1.5, Color32::from_gray(35)));
                        let a = t * 3.5 + i as f32 * 0.5;
                        painter.line_segment(
                            [cx, cx + egui::vec2(a.cos() * r, a.sin() * r)],
                            Stroke::new(1.5, ACCENT.gamma_multiply(0.6)));
                    }
                }
            }

            if duration > 0.0 {
                painter.text(
                    Pos2::new(cell.min.x + 3.0, cell.max.y - 2.0),
                    egui::Align2::LEFT_BOTTOM,
                    format_duration(selection::sample_timestamp(i, duration)),
                    FontId::monospace(8.0),
                    DARK_TEXT_DIM);
            }
        }
        if sampling {
            ui.ctx().request_repaint();
        }

        // ── Segment overlay ──────────────────────────────────────────────────
        if duration > 0.0 {
            let left = rect.min.x
                + selection::left_fraction(state.selection, duration) as f32 * rect.width();
            let span_w = selection::span_fraction(duration) as f32 * rect.width();
            let band = Rect::from_min_size(
                Pos2::new(left, rect.min.y), Vec2::new(span_w, rect.height()));

            painter.rect_filled(band, 2.0, ACCENT.gamma_multiply(0.16));
            painter.rect_stroke(band, 2.0,
                Stroke::new(1.5, if playing { ACCENT_HOVER } else { ACCENT }),
                egui::StrokeKind::Inside);
            // Drag handle at the window start.
            painter.line_segment([band.left_top(), band.left_bottom()],
                Stroke::new(3.0, ACCENT));
            painter.circle_filled(
                Pos2::new(band.min.x, band.center().y), HANDLE_KNOB_R, ACCENT);

            // Progress tick while the segment plays.
            if playing {
                if let Some((start, end)) = state.preview.window() {
                    let p = actx.pb_position.clamp(start, end);
                    let px = rect.min.x
                        + selection::left_fraction(p, duration) as f32 * rect.width();
                    painter.line_segment(
                        [Pos2::new(px, rect.min.y), Pos2::new(px, rect.max.y)],
                        Stroke::new(1.0, Color32::WHITE.gamma_multiply(0.7)));
                }
            }
        }

        // ── Interaction ──────────────────────────────────────────────────────
        // One whole-strip hit area: drags move the window start continuously,
        // a click snaps to the clicked slot. Inert while a preview runs (the
        // window bounds are locked for its duration) and once the session has
        // failed, where only Dismiss applies.
        let resp = ui.interact(rect, Id::new("filmstrip"), Sense::click_and_drag());
        if playing || failed {
            return;
        }

        if resp.dragged() || resp.drag_started() || resp.drag_stopped() {
            if let Some(ptr) = resp.interact_pointer_pos() {
                let t = selection::timestamp_from_pointer(
                    ptr.x, rect.min.x, rect.width(), duration);
                // Drag edges always emit so the gesture lands exactly;
                // mid-drag emits are thinned to one per frame of media time.
                let edge = resp.drag_started() || resp.drag_stopped();
                if edge || (t - self.last_drag_emitted).abs() >= 1.0 / 30.0 {
                    cmd.push(SelectorCommand::SelectAt(t));
                    self.last_drag_emitted = t;
                }
            }
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        } else if resp.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }

        if resp.clicked() {
            if let Some(ptr) = resp.interact_pointer_pos() {
                let i = (((ptr.x - rect.min.x) / rect.width()) * SAMPLE_COUNT as f32) as usize;
                cmd.push(SelectorCommand::SelectSample(i.min(SAMPLE_COUNT - 1)));
            }
        }

        // ── Floating mini-cover while dragging ───────────────────────────────
        // Same layer trick as a drag ghost: painted on the tooltip layer so
        // it rides above both panels, showing the frame being scrubbed to.
        if resp.dragged() {
            if let Some(ptr) = ui.ctx().pointer_interact_pos() {
                let ghost_size = Vec2::new(96.0, 54.0);
                let ghost_rect = Rect::from_center_size(
                    Pos2::new(ptr.x, rect.min.y - 44.0), ghost_size);
                let layer = LayerId::new(Order::Tooltip, Id::new("cover_ghost"));
                let gp = ui.ctx().layer_painter(layer);
                gp.rect_filled(ghost_rect, 4.0,
                    Color32::from_rgba_unmultiplied(10, 10, 12, 235));
                gp.rect_stroke(ghost_rect, 4.0,
                    Stroke::new(1.5, ACCENT), egui::StrokeKind::Outside);
                if let Some(tex) = &actx.cover_tex {
                    gp.image(tex.id(), ghost_rect.shrink(3.0),
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE);
                }
                gp.text(ghost_rect.center_bottom() + egui::vec2(0.0, 4.0),
                    egui::Align2::CENTER_TOP,
                    format_timecode(state.selection),
                    FontId::monospace(10.0),
                    ACCENT_HOVER);
            }
        }
    }

    fn status_line(&self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<SelectorCommand>) {
        ui.horizontal(|ui| {
            ui.add_space(2.0);
            match &state.phase {
                LoadPhase::Empty => {}

                LoadPhase::Probing => {
                    ui.label(RichText::new("Reading metadata…")
                        .size(11.0).color(DARK_TEXT_DIM));
                }

                LoadPhase::Sampling => {
                    ui.label(RichText::new(format!(
                        "Sampling frames… {}/{}", state.samples_done(), SAMPLE_COUNT))
                        .size(11.0).color(DARK_TEXT_DIM));
                }

                LoadPhase::Ready => {
                    let cover_ts = state.cover.as_ref()
                        .map(|c| c.timestamp)
                        .unwrap_or(state.selection);
                    ui.label(RichText::new("Cover").size(11.0).color(DARK_TEXT_DIM));
                    ui.label(RichText::new(format_timecode(cover_ts))
                        .size(11.0).monospace().color(ACCENT));
                    ui.label(RichText::new("window").size(11.0).color(DARK_TEXT_DIM));
                    ui.label(RichText::new(format!(
                        "{} → {}",
                        format_timecode(state.selection),
                        format_timecode(selection::window_end(state.selection))))
                        .size(11.0).monospace().color(ACCENT));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.add_space(2.0);
                        if ui.button(RichText::new("Copy summary").size(11.0)).clicked() {
                            cmd.push(SelectorCommand::CopySummary);
                        }
                        ui.label(RichText::new("drag the handle, click a frame")
                            .size(10.0).color(DARK_TEXT_DIM));
                    });
                }

                LoadPhase::Failed(msg) => {
                    ui.label(RichText::new(format!("⚠ {msg}"))
                        .size(11.0).color(ERROR));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.add_space(2.0);
                        if ui.button(RichText::new("Dismiss").size(11.0)).clicked() {
                            cmd.push(SelectorCommand::DismissError);
                        }
                    });
                }
            }
        });
    }
}

impl SelectorModule for FilmstripModule {
    fn name(&self) -> &str { "Filmstrip" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, actx: &mut AppContext, cmd: &mut Vec<SelectorCommand>) {
        if state.source.is_none() {
            ui.add_space(26.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("🎞").size(30.0));
                ui.add_space(4.0);
                ui.label(RichText::new("Drop a video here or use Open video…")
                    .size(11.0).color(DARK_TEXT_DIM));
            });
            return;
        }

        StripBuilder::new(ui)
            .size(Size::exact(STRIP_H))
            .size(Size::exact(4.0))
            .size(Size::remainder())
            .vertical(|mut strip| {
                strip.cell(|ui| self.strip_band(ui, state, actx, cmd));
                strip.empty();
                strip.cell(|ui| self.status_line(ui, state, cmd));
            });
    }
}
