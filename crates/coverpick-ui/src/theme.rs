// crates/coverpick-ui/src/theme.rs
//
// Palette and style for the selector. Modules paint with these constants
// directly; configure_style covers the stock widgets (buttons, separators).

use egui::style::WidgetVisuals;
use egui::{Color32, Context, Stroke, Style, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────
pub const ACCENT:        Color32 = Color32::from_rgb( 64, 186, 200);
pub const ACCENT_DIM:    Color32 = Color32::from_rgb( 30, 110, 122);
pub const ACCENT_HOVER:  Color32 = Color32::from_rgb(110, 212, 224);

pub const DARK_BG_0:     Color32 = Color32::from_rgb( 13,  14,  16);
pub const DARK_BG_1:     Color32 = Color32::from_rgb( 19,  20,  24);
pub const DARK_BG_2:     Color32 = Color32::from_rgb( 27,  29,  34);
pub const DARK_BG_3:     Color32 = Color32::from_rgb( 37,  39,  46);
pub const DARK_BG_4:     Color32 = Color32::from_rgb( 49,  52,  60);

pub const DARK_TEXT:     Color32 = Color32::from_rgb(218, 222, 228);
pub const DARK_TEXT_DIM: Color32 = Color32::from_rgb(118, 124, 136);
pub const DARK_BORDER:   Color32 = Color32::from_rgb( 54,  57,  68);

pub const ERROR:         Color32 = Color32::from_rgb(205,  72,  64);

const CORNER: u8 = 4;

/// One widget interaction state: fill, border color, text stroke.
/// Everything else keeps the `Visuals::dark()` default.
fn tune(w: &mut WidgetVisuals, bg: Color32, border: Color32, fg: Stroke) {
    w.bg_fill       = bg;
    w.bg_stroke     = Stroke::new(1.0, border);
    w.fg_stroke     = fg;
    w.corner_radius = CORNER.into();
}

pub fn configure_style(ctx: &Context) {
    let mut v = Visuals::dark();
    v.panel_fill       = DARK_BG_1;
    v.window_fill      = DARK_BG_2;
    v.faint_bg_color   = DARK_BG_0;
    v.extreme_bg_color = DARK_BG_0;
    v.window_stroke    = Stroke::new(1.0, DARK_BORDER);

    v.selection.bg_fill = ACCENT_DIM;
    v.selection.stroke  = Stroke::new(1.0, ACCENT);
    v.hyperlink_color   = ACCENT_HOVER;

    let w = &mut v.widgets;
    tune(&mut w.noninteractive, DARK_BG_2,  DARK_BORDER, Stroke::new(1.0, DARK_TEXT_DIM));
    tune(&mut w.inactive,       DARK_BG_3,  DARK_BORDER, Stroke::new(1.0, DARK_TEXT));
    tune(&mut w.hovered,        DARK_BG_4,  ACCENT_DIM,  Stroke::new(1.5, ACCENT_HOVER));
    tune(&mut w.active,         ACCENT_DIM, ACCENT,      Stroke::new(2.0, Color32::WHITE));
    tune(&mut w.open,           DARK_BG_4,  ACCENT_DIM,  Stroke::new(1.5, ACCENT_HOVER));

    v.window_corner_radius = CORNER.into();
    v.menu_corner_radius   = CORNER.into();
    v.override_text_color  = Some(DARK_TEXT);

    let mut style = Style::default();
    style.spacing.item_spacing   = egui::vec2(6.0, 5.0);
    style.spacing.window_margin  = egui::Margin::same(10);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.visuals = v;

    ctx.set_style(style);
}
