use std::collections::HashMap;

use chrono::Local;
use egui::{
    epaint::QuadraticBezierShape, Align2, Color32, CursorIcon, Pos2, Rect, RichText, Sense,
    Stroke, Ui,
};

use crate::interact::{moved_dates, resized_end, BarGrab, Interaction};
use crate::layout::{ChartPlan, PathSeg, TimeScale};
use crate::model::{GanttOptions, Task, TaskId};
use crate::ui::sync::{Pane, ScrollSync};
use crate::ui::theme;

/// Requests raised by the chart canvas.
pub enum ChartAction {
    None,
    /// A bar drag or resize ended; the task already carries its new dates.
    Committed(TaskId),
}

/// Render the right panel: the timeline header pinned above a canvas that
/// scrolls both ways, with the header following horizontal scroll.
pub fn show_chart(
    ui: &mut Ui,
    tasks: &mut [Task],
    plan: &ChartPlan,
    scale: &TimeScale,
    options: &GanttOptions,
    interaction: &mut Interaction,
    sync: &mut ScrollSync,
) -> ChartAction {
    let mut action = ChartAction::None;
    let palette = theme::palette(options.theme);
    let row_height = theme::row_height(options.theme);
    let panel_width = ui.available_width();
    let index_of: HashMap<TaskId, usize> =
        tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

    // Reserve the header strip now; it is painted once the scroll offset
    // for this frame is known.
    let (header_resp, header_painter) = ui.allocate_painter(
        egui::vec2(panel_width, theme::HEADER_HEIGHT),
        Sense::hover(),
    );

    let mut area = egui::ScrollArea::both()
        .id_salt(ui.id().with("chart_body"))
        .auto_shrink([false, false]);
    if let Some(offset) = sync.take_override(Pane::Chart) {
        area = area.vertical_scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        let content = egui::vec2(
            plan.width.max(ui.available_width()),
            plan.height.max(ui.available_height()),
        );
        let (response, painter) = ui.allocate_painter(content, Sense::hover());
        let canvas = response.rect;
        let origin = canvas.min;

        paint_rows_and_grid(&painter, canvas, plan, row_height, palette);
        paint_links(&painter, origin, plan, palette);
        paint_today_line(&painter, canvas, scale, palette);

        for bar in &plan.bars {
            let Some(&index) = index_of.get(&bar.task_id) else {
                continue;
            };
            let screen = bar.rect.translate(origin.to_vec2());
            let bar_resp = ui.interact(
                screen,
                ui.make_persistent_id(("gantt_bar", bar.task_id)),
                Sense::click_and_drag(),
            );

            if bar_resp.drag_started() {
                if let Some(pos) = bar_resp.interact_pointer_pos() {
                    let task = &tasks[index];
                    let grab = BarGrab {
                        task: bar.task_id,
                        origin_start: task.start,
                        origin_end: task.end,
                        pointer_x: pos.x,
                    };
                    let next = if pos.x >= screen.max.x - theme::HANDLE_WIDTH {
                        Interaction::ResizeBar(grab)
                    } else {
                        Interaction::DragBar(grab)
                    };
                    interaction.begin(next);
                }
            }
            if bar_resp.dragged() {
                if let Some(pos) = bar_resp.interact_pointer_pos() {
                    match *interaction {
                        Interaction::DragBar(grab) if grab.task == bar.task_id => {
                            let (start, end) = moved_dates(&grab, pos.x, scale.day_width);
                            tasks[index].start = start;
                            tasks[index].end = end;
                        }
                        Interaction::ResizeBar(grab) if grab.task == bar.task_id => {
                            tasks[index].end = resized_end(&grab, pos.x, scale.day_width);
                        }
                        _ => {}
                    }
                }
            }
            if bar_resp.drag_stopped() {
                match interaction.finish() {
                    Interaction::DragBar(grab) | Interaction::ResizeBar(grab)
                        if grab.task == bar.task_id =>
                    {
                        action = ChartAction::Committed(grab.task);
                    }
                    _ => {}
                }
            }

            let hovered = bar_resp.hovered() || bar_resp.dragged();
            if hovered {
                let over_handle = bar_resp
                    .hover_pos()
                    .map_or(false, |pos| pos.x >= screen.max.x - theme::HANDLE_WIDTH);
                let icon = match *interaction {
                    Interaction::DragBar(_) => CursorIcon::Grabbing,
                    Interaction::ResizeBar(_) => CursorIcon::ResizeHorizontal,
                    _ if over_handle => CursorIcon::ResizeHorizontal,
                    _ => CursorIcon::Grab,
                };
                ui.ctx().set_cursor_icon(icon);
            }

            paint_bar(&painter, screen, bar.progress, &bar.label, hovered, palette);

            if bar_resp.hovered() && interaction.is_idle() {
                let task = &tasks[index];
                show_bar_tooltip(ui, task);
            }
        }
    });

    sync.report(Pane::Chart, output.state.offset.y);
    paint_header(
        &header_painter,
        header_resp.rect,
        plan,
        output.state.offset.x,
        palette,
    );
    action
}

fn paint_rows_and_grid(
    painter: &egui::Painter,
    canvas: Rect,
    plan: &ChartPlan,
    row_height: f32,
    palette: &theme::Palette,
) {
    painter.rect_filled(canvas, 0.0, palette.panel_bg);

    let rows = (plan.height / row_height).round() as usize;
    for row in 0..rows {
        let y = canvas.min.y + row as f32 * row_height;
        if row % 2 == 1 {
            let band = Rect::from_min_size(
                Pos2::new(canvas.min.x, y),
                egui::vec2(canvas.width(), row_height),
            );
            painter.rect_filled(band, 0.0, palette.row_alt);
        }
        painter.line_segment(
            [
                Pos2::new(canvas.min.x, y + row_height),
                Pos2::new(canvas.max.x, y + row_height),
            ],
            Stroke::new(1.0, palette.grid_line),
        );
    }

    // One vertical line per header cell: days in day view, weeks and
    // months in the coarser views.
    for cell in &plan.cells {
        let x = canvas.min.x + cell.x + cell.width;
        painter.line_segment(
            [Pos2::new(x, canvas.min.y), Pos2::new(x, canvas.max.y)],
            Stroke::new(1.0, palette.grid_line),
        );
    }
}

fn paint_links(painter: &egui::Painter, origin: Pos2, plan: &ChartPlan, palette: &theme::Palette) {
    let stroke = Stroke::new(1.5, palette.link);
    for link in &plan.links {
        let mut current = link.start + origin.to_vec2();
        for seg in &link.segments {
            match seg {
                PathSeg::LineTo(point) => {
                    let next = *point + origin.to_vec2();
                    painter.line_segment([current, next], stroke);
                    current = next;
                }
                PathSeg::QuadTo { control, end } => {
                    let control = *control + origin.to_vec2();
                    let next = *end + origin.to_vec2();
                    painter.add(QuadraticBezierShape::from_points_stroke(
                        [current, control, next],
                        false,
                        Color32::TRANSPARENT,
                        stroke,
                    ));
                    current = next;
                }
            }
        }

        let tip = link.tip + origin.to_vec2();
        painter.add(egui::Shape::convex_polygon(
            vec![
                tip,
                Pos2::new(tip.x - theme::ARROW_SIZE, tip.y - theme::ARROW_SIZE * 0.66),
                Pos2::new(tip.x - theme::ARROW_SIZE, tip.y + theme::ARROW_SIZE * 0.66),
            ],
            palette.link,
            Stroke::NONE,
        ));
    }
}

fn paint_today_line(
    painter: &egui::Painter,
    canvas: Rect,
    scale: &TimeScale,
    palette: &theme::Palette,
) {
    let today = Local::now().date_naive();
    if today < scale.window_start || today > scale.window_end {
        return;
    }
    let x = canvas.min.x + scale.date_to_x(today) + scale.day_width / 2.0;
    painter.line_segment(
        [Pos2::new(x, canvas.min.y), Pos2::new(x, canvas.max.y)],
        Stroke::new(1.5, palette.today_line),
    );
}

fn paint_bar(
    painter: &egui::Painter,
    screen: Rect,
    progress: f32,
    label: &str,
    hovered: bool,
    palette: &theme::Palette,
) {
    painter.rect_filled(screen, theme::BAR_ROUNDING, palette.bar_fill);

    let fraction = (progress / 100.0).clamp(0.0, 1.0);
    if fraction > 0.0 {
        let done = Rect::from_min_size(
            screen.min,
            egui::vec2(screen.width() * fraction, screen.height()),
        );
        painter.rect_filled(done, theme::BAR_ROUNDING, palette.progress_overlay);
    }

    if hovered {
        let handle = Rect::from_min_max(
            Pos2::new(screen.max.x - theme::HANDLE_WIDTH, screen.min.y),
            screen.max,
        );
        painter.rect_filled(handle, theme::BAR_ROUNDING, palette.handle);
    }

    if !label.is_empty() {
        painter.with_clip_rect(screen.shrink(2.0)).text(
            Pos2::new(screen.min.x + 8.0, screen.center().y),
            Align2::LEFT_CENTER,
            label,
            theme::font_bar(),
            palette.text_on_bar,
        );
    }
}

fn show_bar_tooltip(ui: &Ui, task: &Task) {
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new("gantt_bar_tip"),
        |ui| {
            ui.label(RichText::new(&task.name).strong());
            ui.label(
                RichText::new(format!(
                    "{} - {}",
                    task.start.format("%d/%m/%Y"),
                    task.end.format("%d/%m/%Y")
                ))
                .size(11.0),
            );
            ui.label(RichText::new(format!("{:.0}% complete", task.progress)).size(11.0));
        },
    );
}

fn paint_header(
    painter: &egui::Painter,
    rect: Rect,
    plan: &ChartPlan,
    h_offset: f32,
    palette: &theme::Palette,
) {
    let painter = painter.with_clip_rect(rect);
    painter.rect_filled(rect, 0.0, palette.header_bg);
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, palette.border),
    );

    let left = rect.min.x - h_offset;
    let has_months = !plan.months.is_empty();
    let strip = theme::MONTH_STRIP_HEIGHT;

    if has_months {
        for month in &plan.months {
            let span = Rect::from_min_size(
                Pos2::new(left + month.x, rect.min.y),
                egui::vec2(month.width, strip),
            );
            painter.text(
                span.center(),
                Align2::CENTER_CENTER,
                &month.label,
                theme::font_small(),
                palette.text_dim,
            );
            painter.line_segment(
                [span.right_top(), span.right_bottom()],
                Stroke::new(1.0, palette.border),
            );
        }
        painter.line_segment(
            [
                Pos2::new(rect.min.x, rect.min.y + strip),
                Pos2::new(rect.max.x, rect.min.y + strip),
            ],
            Stroke::new(1.0, palette.border),
        );
    }

    let cells_top = if has_months { rect.min.y + strip } else { rect.min.y };
    let cell_height = rect.max.y - cells_top;
    for cell in &plan.cells {
        let span = Rect::from_min_size(
            Pos2::new(left + cell.x, cells_top),
            egui::vec2(cell.width, cell_height),
        );
        if !cell.label.is_empty() {
            painter.text(
                span.center(),
                Align2::CENTER_CENTER,
                &cell.label,
                theme::font_header(),
                palette.text,
            );
        }
        painter.line_segment(
            [span.right_top(), span.right_bottom()],
            Stroke::new(1.0, palette.grid_line),
        );
    }
}
