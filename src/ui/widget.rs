use chrono::{Duration, Local};
use egui::{
    Align, Color32, Context, CursorIcon, Layout, Pos2, Rect, RichText, Sense, Stroke, Ui,
    UiBuilder,
};

use crate::event::{GanttEvent, Listeners};
use crate::form::FormSchema;
use crate::interact::Interaction;
use crate::layout::{
    flatten, zoom_in, zoom_out, zoom_to_fit, ChartPlan, OutlineRow, TimeScale, ViewMode,
};
use crate::model::{
    default_columns, next_task_id, scrub_references, Column, GanttOptions, Task, TaskId,
    TaskPatch, Theme,
};
use crate::ui::chart_panel::{self, ChartAction};
use crate::ui::editor::{self, EditorAction, EditorState};
use crate::ui::grid_panel::{self, GridAction};
use crate::ui::sync::ScrollSync;
use crate::ui::theme;

const MIN_GRID_WIDTH: f32 = 150.0;
const MIN_CHART_WIDTH: f32 = 200.0;
const DEFAULT_GRID_WIDTH: f32 = 420.0;

/// What a [`GanttChart::show`] call reported back.
pub struct GanttResponse {
    /// True when this frame committed a change to the task list: an add,
    /// an update (edited or dragged), or a delete.
    pub changed: bool,
}

/// The Gantt widget: a column grid and a timeline chart over one shared
/// task list, with editing built in.
///
/// Construct it once, keep it in your app state, and call
/// [`show`](Self::show) every frame.
pub struct GanttChart {
    tasks: Vec<Task>,
    rows: Vec<OutlineRow>,
    columns: Vec<Column>,
    options: GanttOptions,
    schema: FormSchema,
    view_mode: ViewMode,
    day_width: f32,
    grid_width: f32,
    interaction: Interaction,
    sync: ScrollSync,
    editor: Option<EditorState>,
    pending_delete: Option<TaskId>,
    listeners: Listeners,
}

impl GanttChart {
    pub fn new(tasks: Vec<Task>, options: GanttOptions) -> Self {
        let columns = options.columns.clone().unwrap_or_else(default_columns);
        let schema = options
            .modal_schema
            .clone()
            .unwrap_or_else(|| FormSchema::from_columns(&columns));
        let view_mode = ViewMode::default();
        let mut chart = Self {
            tasks,
            rows: Vec::new(),
            columns,
            options,
            schema,
            view_mode,
            day_width: view_mode.default_day_width(),
            grid_width: DEFAULT_GRID_WIDTH,
            interaction: Interaction::default(),
            sync: ScrollSync::default(),
            editor: None,
            pending_delete: None,
            listeners: Listeners::default(),
        };
        chart.refresh();
        chart
    }

    /// Register a callback for task lifecycle events. Listeners stack;
    /// each one sees every event.
    pub fn on_event(&mut self, listener: impl FnMut(&GanttEvent) + 'static) {
        self.listeners.register(listener);
    }

    /// Tasks in display order is what [`Self::rows`] is for; this is the
    /// backing list in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn rows(&self) -> &[OutlineRow] {
        &self.rows
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.options.theme = theme;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch header granularity and reset the zoom to the mode's default
    /// day width.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.day_width = mode.default_day_width();
    }

    pub fn zoom_in(&mut self) {
        self.day_width = zoom_in(self.day_width);
    }

    pub fn zoom_out(&mut self) {
        self.day_width = zoom_out(self.day_width);
    }

    /// Replace the whole task list, e.g. after loading a file. Fires no
    /// events; the host initiated this itself.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.editor = None;
        self.pending_delete = None;
        self.refresh();
    }

    /// Create a task from a patch applied over defaults (name "New Task",
    /// starting today, one day long), assign the next free id, and
    /// announce it. Returns the new id.
    pub fn add_task(&mut self, patch: TaskPatch) -> TaskId {
        let id = next_task_id(&self.tasks);
        let today = Local::now().date_naive();
        let mut task = Task::new(id, "New Task", today, today + Duration::days(1));
        task.apply(patch);
        self.tasks.push(task.clone());
        self.refresh();
        self.listeners.notify(&GanttEvent::TaskAdded(task));
        id
    }

    /// Apply a patch to the task with this id. Returns false when the id
    /// matches nothing.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.apply(patch);
        let snapshot = task.clone();
        self.refresh();
        self.listeners.notify(&GanttEvent::TaskUpdated(snapshot));
        true
    }

    /// Remove a task, strip every reference to it, and announce the
    /// removal. Children of the removed task become roots.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        scrub_references(&mut self.tasks, id);
        self.refresh();
        self.listeners.notify(&GanttEvent::TaskDeleted(id));
        true
    }

    /// Wrap up a finished bar drag: re-flatten and announce the task's
    /// current dates. Fires even when the drag netted zero days.
    fn commit_drag(&mut self, id: TaskId) {
        self.refresh();
        if let Some(task) = self.tasks.iter().find(|t| t.id == id).cloned() {
            self.listeners.notify(&GanttEvent::TaskUpdated(task));
        }
    }

    /// Open the editor on an existing task, as the grid's edit button
    /// does.
    pub fn open_editor(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            self.editor = Some(EditorState::edit(task, &self.schema));
        }
    }

    fn refresh(&mut self) {
        self.rows = flatten(&self.tasks);
    }

    /// Render the widget into the given `Ui`, filling the available space.
    pub fn show(&mut self, ui: &mut Ui) -> GanttResponse {
        let mut changed = false;
        let palette = theme::palette(self.options.theme);
        let row_height = theme::row_height(self.options.theme);

        egui::Frame::none()
            .fill(palette.bg)
            .stroke(Stroke::new(1.0, palette.border))
            .show(ui, |ui| {
                self.show_toolbar(ui);

                let rect = ui.available_rect_before_wrap();
                let max_grid = (rect.width() - MIN_CHART_WIDTH - theme::DIVIDER_WIDTH)
                    .max(MIN_GRID_WIDTH);
                self.grid_width = self.grid_width.clamp(MIN_GRID_WIDTH, max_grid);

                let grid_rect = Rect::from_min_size(
                    rect.min,
                    egui::vec2(self.grid_width, rect.height()),
                );
                let divider_rect = Rect::from_min_size(
                    Pos2::new(grid_rect.max.x, rect.min.y),
                    egui::vec2(theme::DIVIDER_WIDTH, rect.height()),
                );
                let chart_rect = Rect::from_min_max(
                    Pos2::new(divider_rect.max.x, rect.min.y),
                    rect.max,
                );

                let scale = TimeScale::compute(&self.tasks, self.day_width);
                let plan = ChartPlan::build(
                    &self.tasks,
                    &self.rows,
                    &scale,
                    self.view_mode,
                    row_height,
                );

                let mut grid_ui = ui.new_child(
                    UiBuilder::new()
                        .max_rect(grid_rect)
                        .layout(Layout::top_down(Align::Min)),
                );
                let grid_action = grid_panel::show_grid(
                    &mut grid_ui,
                    &self.tasks,
                    &self.rows,
                    &mut self.columns,
                    &self.options,
                    &mut self.interaction,
                    &mut self.sync,
                );

                self.show_divider(ui, divider_rect, rect, max_grid, palette);

                let mut chart_ui = ui.new_child(
                    UiBuilder::new()
                        .max_rect(chart_rect)
                        .layout(Layout::top_down(Align::Min)),
                );
                let chart_action = chart_panel::show_chart(
                    &mut chart_ui,
                    &mut self.tasks,
                    &plan,
                    &scale,
                    &self.options,
                    &mut self.interaction,
                    &mut self.sync,
                );

                ui.allocate_rect(rect, Sense::hover());

                match grid_action {
                    GridAction::Edit(id) => self.open_editor(id),
                    GridAction::Delete(id) => self.pending_delete = Some(id),
                    GridAction::None => {}
                }
                match chart_action {
                    ChartAction::Committed(id) => {
                        self.commit_drag(id);
                        changed = true;
                    }
                    ChartAction::None => {}
                }
            });

        changed |= self.show_modals(ui.ctx());
        GanttResponse { changed }
    }

    fn show_toolbar(&mut self, ui: &mut Ui) {
        let palette = theme::palette(self.options.theme);
        let widget_width = ui.available_width();
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), theme::TOOLBAR_HEIGHT),
            Layout::left_to_right(Align::Center),
            |ui| {
                ui.add_space(8.0);
                let add = egui::Button::new(
                    RichText::new(format!("{} Add Task", egui_phosphor::regular::PLUS))
                        .color(Color32::WHITE)
                        .size(12.0),
                )
                .fill(palette.accent)
                .rounding(egui::Rounding::same(5.0));
                if ui.add_sized([100.0, 26.0], add).clicked() {
                    self.editor = Some(EditorState::create(&self.schema));
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.add_space(8.0);
                    if self.options.features.view_modes {
                        for (mode, label) in [
                            (ViewMode::Month, "Month"),
                            (ViewMode::Week, "Week"),
                            (ViewMode::Day, "Day"),
                        ] {
                            if ui
                                .selectable_label(self.view_mode == mode, label)
                                .clicked()
                            {
                                self.set_view_mode(mode);
                            }
                        }
                    }
                    if self.options.features.zoom {
                        if self.options.features.view_modes {
                            ui.separator();
                        }
                        if self
                            .toolbar_icon(ui, egui_phosphor::regular::FRAME_CORNERS, "Zoom to Fit")
                            .clicked()
                        {
                            let visible = (widget_width - self.grid_width - theme::DIVIDER_WIDTH)
                                .max(MIN_CHART_WIDTH);
                            let scale = TimeScale::compute(&self.tasks, self.day_width);
                            if let Some(day_width) = zoom_to_fit(visible, &scale) {
                                self.day_width = day_width;
                            }
                        }
                        if self
                            .toolbar_icon(
                                ui,
                                egui_phosphor::regular::MAGNIFYING_GLASS_MINUS,
                                "Zoom Out",
                            )
                            .clicked()
                        {
                            self.zoom_out();
                        }
                        if self
                            .toolbar_icon(
                                ui,
                                egui_phosphor::regular::MAGNIFYING_GLASS_PLUS,
                                "Zoom In",
                            )
                            .clicked()
                        {
                            self.zoom_in();
                        }
                    }
                });
            },
        );
        let line_y = ui.cursor().min.y;
        ui.painter().line_segment(
            [
                Pos2::new(ui.max_rect().min.x, line_y),
                Pos2::new(ui.max_rect().max.x, line_y),
            ],
            Stroke::new(1.0, palette.border),
        );
    }

    fn toolbar_icon(&self, ui: &mut Ui, icon: &str, tip: &str) -> egui::Response {
        ui.add(egui::Button::new(RichText::new(icon).size(14.0)).frame(false))
            .on_hover_text(tip)
    }

    fn show_divider(
        &mut self,
        ui: &mut Ui,
        divider_rect: Rect,
        panes: Rect,
        max_grid: f32,
        palette: &theme::Palette,
    ) {
        let resp = ui.interact(
            divider_rect,
            ui.make_persistent_id("gantt_divider"),
            Sense::drag(),
        );
        if resp.hovered() || resp.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }
        if resp.drag_started() {
            self.interaction.begin(Interaction::ResizePanel);
        }
        if resp.dragged() && matches!(self.interaction, Interaction::ResizePanel) {
            if let Some(pos) = resp.interact_pointer_pos() {
                self.grid_width = (pos.x - panes.min.x).clamp(MIN_GRID_WIDTH, max_grid);
            }
        }
        if resp.drag_stopped() {
            self.interaction.finish();
        }

        let fill = if resp.hovered() || resp.dragged() {
            palette.accent
        } else {
            palette.border
        };
        ui.painter().rect_filled(divider_rect.shrink2(egui::vec2(1.5, 0.0)), 0.0, fill);
    }

    /// The editor and the delete confirmation. Only one shows at a time;
    /// while a delete is pending the editor waits behind it.
    fn show_modals(&mut self, ctx: &Context) -> bool {
        let mut changed = false;

        if let Some(pending) = self.pending_delete {
            match editor::show_confirm_delete(ctx) {
                Some(true) => {
                    changed |= self.delete_task(pending);
                    self.pending_delete = None;
                    self.editor = None;
                }
                Some(false) => self.pending_delete = None,
                None => {}
            }
            return changed;
        }

        let mut save: Option<(Option<TaskId>, TaskPatch)> = None;
        let mut close = false;
        let mut request_delete = None;
        if let Some(state) = self.editor.as_mut() {
            match editor::show_editor(ctx, state, &self.schema, &self.tasks, &self.options) {
                EditorAction::Save => {
                    save = Some((state.task_id, state.to_patch(&self.schema)));
                    close = true;
                }
                EditorAction::Cancel => close = true,
                EditorAction::Delete(id) => request_delete = Some(id),
                EditorAction::None => {}
            }
        }
        if close {
            self.editor = None;
        }
        if let Some(id) = request_delete {
            self.pending_delete = Some(id);
        }
        if let Some((editing, patch)) = save {
            match editing {
                Some(id) => changed |= self.update_task(id, patch),
                None => {
                    self.add_task(patch);
                    changed = true;
                }
            }
        }
        changed
    }
}
