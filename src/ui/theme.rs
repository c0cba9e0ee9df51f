use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::Theme;

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const TOOLBAR_HEIGHT: f32 = 36.0;
pub const HEADER_HEIGHT: f32 = 44.0;
/// Top slice of the chart header holding the month markers in day view.
pub const MONTH_STRIP_HEIGHT: f32 = 16.0;
pub const HANDLE_WIDTH: f32 = 8.0;
pub const DIVIDER_WIDTH: f32 = 5.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const ARROW_SIZE: f32 = 6.0;

/// Row height for a theme; the narrow theme packs rows tighter.
pub fn row_height(theme: Theme) -> f32 {
    match theme {
        Theme::Narrow => 32.0,
        _ => 40.0,
    }
}

// ── Palette ──────────────────────────────────────────────────────────────────

pub struct Palette {
    pub bg: Color32,
    pub panel_bg: Color32,
    pub header_bg: Color32,
    pub row_alt: Color32,
    pub row_hover: Color32,
    pub border: Color32,
    pub grid_line: Color32,
    pub text: Color32,
    pub text_dim: Color32,
    pub text_on_bar: Color32,
    pub accent: Color32,
    pub bar_fill: Color32,
    pub progress_overlay: Color32,
    pub link: Color32,
    pub today_line: Color32,
    pub handle: Color32,
}

pub const LIGHT: Palette = Palette {
    bg: Color32::from_rgb(255, 255, 255),
    panel_bg: Color32::from_rgb(250, 250, 252),
    header_bg: Color32::from_rgb(243, 244, 247),
    row_alt: Color32::from_rgba_premultiplied(0, 0, 0, 5),
    row_hover: Color32::from_rgba_premultiplied(0, 0, 0, 12),
    border: Color32::from_rgb(218, 220, 227),
    grid_line: Color32::from_rgb(235, 236, 240),
    text: Color32::from_rgb(42, 46, 55),
    text_dim: Color32::from_rgb(130, 135, 148),
    text_on_bar: Color32::from_rgb(255, 255, 255),
    accent: Color32::from_rgb(66, 133, 244),
    bar_fill: Color32::from_rgb(66, 133, 244),
    progress_overlay: Color32::from_rgba_premultiplied(0, 0, 0, 55),
    link: Color32::from_rgb(255, 152, 0),
    today_line: Color32::from_rgb(240, 75, 75),
    handle: Color32::from_rgba_premultiplied(77, 77, 77, 77),
};

pub const DARK: Palette = Palette {
    bg: Color32::from_rgb(24, 24, 32),
    panel_bg: Color32::from_rgb(30, 30, 40),
    header_bg: Color32::from_rgb(34, 37, 48),
    row_alt: Color32::from_rgba_premultiplied(6, 6, 6, 6),
    row_hover: Color32::from_rgba_premultiplied(14, 14, 14, 14),
    border: Color32::from_rgb(50, 52, 64),
    grid_line: Color32::from_rgb(44, 46, 58),
    text: Color32::from_rgb(230, 232, 240),
    text_dim: Color32::from_rgb(100, 105, 120),
    text_on_bar: Color32::from_rgb(255, 255, 255),
    accent: Color32::from_rgb(80, 140, 220),
    bar_fill: Color32::from_rgb(80, 140, 220),
    progress_overlay: Color32::from_rgba_premultiplied(0, 0, 0, 70),
    link: Color32::from_rgb(255, 152, 0),
    today_line: Color32::from_rgb(240, 75, 75),
    handle: Color32::from_rgba_premultiplied(77, 77, 77, 77),
};

/// The narrow theme reuses the light palette at a smaller row height.
pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        _ => &LIGHT,
    }
}

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_cell() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// ── Context visuals ──────────────────────────────────────────────────────────

/// Align egui's own widget chrome (buttons, combo boxes, windows) with the
/// active chart theme. Hosts embedding the widget in a styled app can skip
/// this and keep their own visuals.
pub fn apply_visuals(ctx: &egui::Context, theme: Theme) {
    let p = palette(theme);
    let mut visuals = match theme {
        Theme::Dark => Visuals::dark(),
        _ => Visuals::light(),
    };

    visuals.override_text_color = Some(p.text);
    visuals.panel_fill = p.panel_bg;
    visuals.window_fill = p.panel_bg;
    visuals.faint_bg_color = p.row_alt;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, p.border);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, p.accent);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, p.accent);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.stroke = Stroke::new(1.0, p.accent);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, p.border);

    ctx.set_visuals(visuals);
}
