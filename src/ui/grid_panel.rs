use std::collections::HashMap;

use egui::{Align2, CursorIcon, Pos2, Rect, RichText, Sense, Stroke, Ui};

use crate::interact::{resized_column_width, ColumnGrab, Interaction};
use crate::layout::{cell_text, resolve_widths, OutlineRow, LEVEL_INDENT};
use crate::model::{Column, ColumnWidth, GanttOptions, Task, TaskId};
use crate::ui::sync::{Pane, ScrollSync};
use crate::ui::theme;

/// Requests raised by the grid rows.
pub enum GridAction {
    None,
    Edit(TaskId),
    Delete(TaskId),
}

/// Render the left panel: column header with resize handles, then one row
/// per outline entry, scroll-synced with the chart.
pub fn show_grid(
    ui: &mut Ui,
    tasks: &[Task],
    rows: &[OutlineRow],
    columns: &mut [Column],
    options: &GanttOptions,
    interaction: &mut Interaction,
    sync: &mut ScrollSync,
) -> GridAction {
    let mut action = GridAction::None;
    let palette = theme::palette(options.theme);
    let row_height = theme::row_height(options.theme);
    let panel_width = ui.available_width();
    let widths = resolve_widths(columns, panel_width);
    let task_of: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();

    show_header(ui, columns, &widths, options, interaction, palette);

    let mut area = egui::ScrollArea::vertical()
        .id_salt(ui.id().with("grid_body"))
        .auto_shrink([false, false]);
    if let Some(offset) = sync.take_override(Pane::Grid) {
        area = area.vertical_scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        let content_height = (rows.len() as f32 * row_height).max(ui.available_height());
        let (response, painter) =
            ui.allocate_painter(egui::vec2(panel_width, content_height), Sense::hover());
        let origin = response.rect.min;

        for (row_index, row) in rows.iter().enumerate() {
            let Some(task) = task_of.get(&row.id) else {
                continue;
            };
            let band = Rect::from_min_size(
                Pos2::new(origin.x, origin.y + row_index as f32 * row_height),
                egui::vec2(panel_width, row_height),
            );
            let row_resp = ui.interact(
                band,
                ui.make_persistent_id(("gantt_grid_row", row.id)),
                Sense::click(),
            );

            painter.rect_filled(band, 0.0, palette.panel_bg);
            if row_resp.hovered() {
                painter.rect_filled(band, 0.0, palette.row_hover);
            } else if row_index % 2 == 1 {
                painter.rect_filled(band, 0.0, palette.row_alt);
            }
            painter.line_segment(
                [band.left_bottom(), band.right_bottom()],
                Stroke::new(1.0, palette.grid_line),
            );

            let mut x = band.min.x;
            let mut hovered_text = None;
            for (column, width) in columns.iter().zip(&widths) {
                let cell = Rect::from_min_max(
                    Pos2::new(x, band.min.y),
                    Pos2::new(x + width, band.max.y),
                );
                let text = cell_text(task, row_index, column, options);
                let indent = if column.id == "name" {
                    row.level as f32 * LEVEL_INDENT
                } else {
                    0.0
                };
                if !text.is_empty() {
                    painter.with_clip_rect(cell.intersect(response.rect)).text(
                        Pos2::new(cell.min.x + 8.0 + indent, cell.center().y),
                        Align2::LEFT_CENTER,
                        &text,
                        theme::font_cell(),
                        palette.text,
                    );
                }
                let over_actions = row_resp
                    .hover_pos()
                    .map_or(false, |pos| pos.x > band.max.x - 48.0);
                if row_resp
                    .hover_pos()
                    .map_or(false, |pos| cell.contains(pos))
                    && !text.is_empty()
                    && !over_actions
                {
                    hovered_text = Some(text);
                }
                x += width;
            }

            if row_resp.hovered() {
                let buttons = row_actions(ui, band, row.id);
                match buttons {
                    GridAction::None => {
                        if let Some(text) = hovered_text {
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new("gantt_cell_tip"),
                                |ui| {
                                    ui.label(text);
                                },
                            );
                        }
                    }
                    other => action = other,
                }
            }
            if row_resp.double_clicked() {
                action = GridAction::Edit(row.id);
            }
        }
    });

    sync.report(Pane::Grid, output.state.offset.y);
    action
}

fn show_header(
    ui: &mut Ui,
    columns: &mut [Column],
    widths: &[f32],
    options: &GanttOptions,
    interaction: &mut Interaction,
    palette: &theme::Palette,
) {
    let (response, painter) = ui.allocate_painter(
        egui::vec2(ui.available_width(), theme::HEADER_HEIGHT),
        Sense::hover(),
    );
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, palette.header_bg);
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, palette.border),
    );

    let mut x = rect.min.x;
    for (column, width) in columns.iter().zip(widths) {
        painter.with_clip_rect(rect).text(
            Pos2::new(x + 8.0, rect.center().y),
            Align2::LEFT_CENTER,
            &column.title,
            theme::font_header(),
            palette.text_dim,
        );
        x += width;
        painter.line_segment(
            [Pos2::new(x, rect.min.y + 8.0), Pos2::new(x, rect.max.y - 8.0)],
            Stroke::new(1.0, palette.border),
        );
    }

    if !options.features.column_resize {
        return;
    }

    // Dragging writes the width back as Fixed; the column keeps it afterwards.
    for (index, center) in handle_centers(rect.min.x, widths).into_iter().enumerate() {
        let handle = Rect::from_min_max(
            Pos2::new(center - theme::HANDLE_WIDTH / 2.0, rect.min.y),
            Pos2::new(center + theme::HANDLE_WIDTH / 2.0, rect.max.y),
        );
        let resp = ui.interact(
            handle,
            ui.make_persistent_id(("gantt_col_handle", index)),
            Sense::drag(),
        );
        if resp.hovered() || resp.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }
        if resp.drag_started() {
            if let Some(pos) = resp.interact_pointer_pos() {
                interaction.begin(Interaction::ResizeColumn(ColumnGrab {
                    column: index,
                    start_width: widths[index],
                    pointer_x: pos.x,
                }));
            }
        }
        if resp.dragged() {
            if let (Interaction::ResizeColumn(grab), Some(pos)) =
                (*interaction, resp.interact_pointer_pos())
            {
                if grab.column == index {
                    columns[index].width =
                        ColumnWidth::Fixed(resized_column_width(&grab, pos.x));
                }
            }
        }
        if resp.drag_stopped() {
            interaction.finish();
        }
    }
}

/// X centers for the column resize handles: one per boundary between two
/// columns, none on the trailing edge.
fn handle_centers(origin_x: f32, widths: &[f32]) -> Vec<f32> {
    let mut centers = Vec::new();
    let mut x = origin_x;
    for width in &widths[..widths.len().saturating_sub(1)] {
        x += width;
        centers.push(x);
    }
    centers
}

/// Hover-revealed edit and delete buttons at the right edge of a row.
fn row_actions(ui: &mut Ui, band: Rect, task: TaskId) -> GridAction {
    let mut action = GridAction::None;
    let size = egui::vec2(20.0, 20.0);
    let edit_rect = Rect::from_center_size(
        Pos2::new(band.max.x - 36.0, band.center().y),
        size,
    );
    let delete_rect = Rect::from_center_size(
        Pos2::new(band.max.x - 14.0, band.center().y),
        size,
    );

    let edit_btn = ui.put(
        edit_rect,
        egui::Button::new(RichText::new(egui_phosphor::regular::PENCIL_SIMPLE).size(12.0))
            .frame(false),
    );
    if edit_btn.on_hover_text("Edit").clicked() {
        action = GridAction::Edit(task);
    }

    let delete_btn = ui.put(
        delete_rect,
        egui::Button::new(RichText::new(egui_phosphor::regular::TRASH).size(12.0)).frame(false),
    );
    if delete_btn.on_hover_text("Delete").clicked() {
        action = GridAction::Delete(task);
    }
    action
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_handle_centers_sit_between_columns() {
        assert_eq!(
            handle_centers(10.0, &[100.0, 50.0, 80.0]),
            vec![110.0, 160.0]
        );
    }

    #[test]
    fn test_last_column_has_no_resize_handle() {
        assert_eq!(handle_centers(0.0, &[220.0]), Vec::<f32>::new());
        assert!(handle_centers(0.0, &[]).is_empty());
    }
}
