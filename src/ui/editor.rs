use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};
use egui::{Align2, Color32, Context, RichText, Ui, Window};
use serde_json::Value;

use crate::form::{FieldKind, FieldSpec, FieldValue, FormSchema};
use crate::model::{GanttOptions, ResourceId, Task, TaskId, TaskPatch};
use crate::ui::theme;

/// What the editor window asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Save,
    Cancel,
    Delete(TaskId),
}

/// Working copy of the task being edited, read back into a patch on save.
pub struct EditorState {
    /// `None` while creating a new task.
    pub task_id: Option<TaskId>,
    values: BTreeMap<String, FieldValue>,
    parent: Option<TaskId>,
    assignees: Vec<ResourceId>,
    dependencies: Vec<TaskId>,
}

impl EditorState {
    /// Editor for a task that does not exist yet.
    pub fn create(schema: &FormSchema) -> Self {
        let today = Local::now().date_naive();
        let mut values = BTreeMap::new();
        for field in &schema.fields {
            let value = match field.id.as_str() {
                "name" => FieldValue::Text("New Task".to_string()),
                "start" => FieldValue::Date(today),
                "end" => FieldValue::Date(today + Duration::days(1)),
                "progress" => FieldValue::Number(0.0),
                _ => FieldValue::default_for(field.kind, today),
            };
            values.insert(field.id.clone(), value);
        }
        Self {
            task_id: None,
            values,
            parent: None,
            assignees: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Editor preloaded from an existing task.
    pub fn edit(task: &Task, schema: &FormSchema) -> Self {
        let today = Local::now().date_naive();
        let mut values = BTreeMap::new();
        for field in &schema.fields {
            let value = match field.id.as_str() {
                "name" => FieldValue::Text(task.name.clone()),
                "start" => FieldValue::Date(task.start),
                "end" => FieldValue::Date(task.end),
                "progress" => FieldValue::Number(f64::from(task.progress)),
                other => custom_value(task.custom.get(other), field.kind, today),
            };
            values.insert(field.id.clone(), value);
        }
        Self {
            task_id: Some(task.id),
            values,
            parent: task.parent,
            assignees: task.assignees.clone(),
            dependencies: task.dependencies.clone(),
        }
    }

    /// Typed patch from the current editor values. Relationship fields are
    /// only written when the schema offers their selector.
    pub fn to_patch(&self, schema: &FormSchema) -> TaskPatch {
        let mut patch = TaskPatch::default();
        for field in &schema.fields {
            let Some(value) = self.values.get(&field.id) else {
                continue;
            };
            match (field.id.as_str(), value) {
                ("name", FieldValue::Text(s)) => patch.name = Some(s.clone()),
                ("start", FieldValue::Date(d)) => patch.start = Some(*d),
                ("end", FieldValue::Date(d)) => patch.end = Some(*d),
                ("progress", FieldValue::Number(n)) => patch.progress = Some(*n as f32),
                (other, FieldValue::Text(s)) => {
                    patch.custom.insert(other.to_string(), Value::String(s.clone()));
                }
                (other, FieldValue::Number(n)) => {
                    patch.custom.insert(other.to_string(), serde_json::json!(n));
                }
                (other, FieldValue::Date(d)) => {
                    patch.custom.insert(
                        other.to_string(),
                        Value::String(d.format("%Y-%m-%d").to_string()),
                    );
                }
            }
        }
        if schema.parent_select {
            patch.parent = Some(self.parent);
        }
        if schema.assignee_select {
            patch.assignees = Some(self.assignees.clone());
        }
        if schema.dependency_select {
            patch.dependencies = Some(self.dependencies.clone());
        }
        patch
    }
}

fn custom_value(stored: Option<&Value>, kind: FieldKind, today: NaiveDate) -> FieldValue {
    match (kind, stored) {
        (FieldKind::Number { .. }, Some(v)) => FieldValue::Number(v.as_f64().unwrap_or(0.0)),
        (FieldKind::Date, Some(Value::String(s))) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Date(today))
        }
        (_, Some(Value::String(s))) => FieldValue::Text(s.clone()),
        (_, Some(v)) => FieldValue::Text(v.to_string()),
        (kind, None) => FieldValue::default_for(kind, today),
    }
}

/// Render the editor window. The caller routes `Save` to add or update by
/// id presence and `Delete` through the confirm dialog.
pub fn show_editor(
    ctx: &Context,
    state: &mut EditorState,
    schema: &FormSchema,
    tasks: &[Task],
    options: &GanttOptions,
) -> EditorAction {
    let mut action = EditorAction::None;
    let palette = theme::palette(options.theme);
    let title = if state.task_id.is_some() {
        "Edit Task"
    } else {
        "Add New Task"
    };

    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("gantt_editor_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for field in &schema.fields {
                        let Some(value) = state.values.get_mut(&field.id) else {
                            continue;
                        };
                        let label = if field.required {
                            format!("{} *", field.label)
                        } else {
                            field.label.clone()
                        };
                        ui.label(RichText::new(label).color(palette.text_dim));
                        show_field(ui, field, value);
                        ui.end_row();
                    }

                    if schema.parent_select {
                        ui.label(RichText::new("Parent Task").color(palette.text_dim));
                        parent_combo(ui, state, tasks);
                        ui.end_row();
                    }
                    if schema.assignee_select {
                        ui.label(RichText::new("Assigned Resources").color(palette.text_dim));
                        assignee_combo(ui, state, options);
                        ui.end_row();
                    }
                    if schema.dependency_select {
                        ui.label(RichText::new("Dependencies").color(palette.text_dim));
                        dependency_combo(ui, state, tasks);
                        ui.end_row();
                    }
                });

            let missing = schema.missing_required(&state.values);
            if !missing.is_empty() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Required: {}", missing.join(", ")))
                        .size(10.0)
                        .color(palette.today_line),
                );
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if schema.allow_delete {
                    if let Some(id) = state.task_id {
                        let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                            .fill(Color32::from_rgb(211, 47, 47));
                        if ui.add_sized([80.0, 28.0], delete).clicked() {
                            action = EditorAction::Delete(id);
                        }
                    }
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    action = EditorAction::Cancel;
                }
                let save = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                    .fill(palette.accent);
                ui.add_enabled_ui(missing.is_empty(), |ui| {
                    if ui.add_sized([80.0, 28.0], save).clicked() {
                        action = EditorAction::Save;
                    }
                });
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = EditorAction::Cancel;
    }
    action
}

fn show_field(ui: &mut Ui, spec: &FieldSpec, value: &mut FieldValue) {
    match (spec.kind, value) {
        (FieldKind::Text, FieldValue::Text(text)) => {
            ui.add_sized([200.0, 24.0], egui::TextEdit::singleline(text));
        }
        (FieldKind::Date, FieldValue::Date(date)) => {
            ui.add(egui_extras::DatePickerButton::new(date).id_salt(spec.id.as_str()));
        }
        (FieldKind::Number { min, max }, FieldValue::Number(number)) => {
            ui.add(egui::Slider::new(number, min..=max));
        }
        // A host schema whose kind disagrees with the stored value renders
        // nothing rather than a wrong editor.
        _ => {}
    }
}

/// All tasks except the one being edited; a task cannot parent or depend
/// on itself.
fn candidates<'a>(tasks: &'a [Task], editing: Option<TaskId>) -> impl Iterator<Item = &'a Task> {
    tasks.iter().filter(move |t| Some(t.id) != editing)
}

fn parent_combo(ui: &mut Ui, state: &mut EditorState, tasks: &[Task]) {
    let label = state
        .parent
        .and_then(|pid| tasks.iter().find(|t| t.id == pid))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "None".to_string());
    egui::ComboBox::from_id_salt("gantt_editor_parent")
        .selected_text(label)
        .width(200.0)
        .show_ui(ui, |ui| {
            if ui.selectable_label(state.parent.is_none(), "None").clicked() {
                state.parent = None;
            }
            for task in candidates(tasks, state.task_id) {
                if ui
                    .selectable_label(state.parent == Some(task.id), &task.name)
                    .clicked()
                {
                    state.parent = Some(task.id);
                }
            }
        });
}

fn assignee_combo(ui: &mut Ui, state: &mut EditorState, options: &GanttOptions) {
    let summary = selection_summary(state.assignees.len());
    egui::ComboBox::from_id_salt("gantt_editor_assignees")
        .selected_text(summary)
        .width(200.0)
        .show_ui(ui, |ui| {
            for resource in &options.resources {
                let mut selected = state.assignees.contains(&resource.id);
                if ui.checkbox(&mut selected, &resource.name).changed() {
                    toggle(&mut state.assignees, resource.id, selected);
                }
            }
        });
}

fn dependency_combo(ui: &mut Ui, state: &mut EditorState, tasks: &[Task]) {
    let summary = selection_summary(state.dependencies.len());
    let picks: Vec<(TaskId, String)> = candidates(tasks, state.task_id)
        .map(|t| (t.id, t.name.clone()))
        .collect();
    egui::ComboBox::from_id_salt("gantt_editor_dependencies")
        .selected_text(summary)
        .width(200.0)
        .show_ui(ui, |ui| {
            for (id, name) in &picks {
                let mut selected = state.dependencies.contains(id);
                if ui.checkbox(&mut selected, name).changed() {
                    toggle(&mut state.dependencies, *id, selected);
                }
            }
        });
}

fn selection_summary(count: usize) -> String {
    match count {
        0 => "None".to_string(),
        1 => "1 selected".to_string(),
        n => format!("{n} selected"),
    }
}

fn toggle<T: PartialEq + Copy>(list: &mut Vec<T>, item: T, on: bool) {
    if on {
        if !list.contains(&item) {
            list.push(item);
        }
    } else {
        list.retain(|&x| x != item);
    }
}

/// Confirmation shown before any delete, from the row button or the
/// editor. `Some(true)` confirms, `Some(false)` dismisses.
pub fn show_confirm_delete(ctx: &Context) -> Option<bool> {
    let mut result = None;
    Window::new(RichText::new("Delete Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label("Are you sure you want to delete this task?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    result = Some(false);
                }
                let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                    .fill(Color32::from_rgb(211, 47, 47));
                if ui.add_sized([80.0, 28.0], delete).clicked() {
                    result = Some(true);
                }
            });
            ui.add_space(2.0);
        });
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = Some(false);
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::default_columns;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_task() -> Task {
        let mut task = Task::new(3, "Design", d("2025-06-02"), d("2025-06-06"));
        task.parent = Some(1);
        task.assignees = vec![2];
        task.dependencies = vec![1];
        task
    }

    #[test]
    fn test_create_defaults() {
        let schema = FormSchema::from_columns(&default_columns());
        let state = EditorState::create(&schema);
        let today = Local::now().date_naive();
        assert_eq!(state.task_id, None);
        assert_eq!(
            state.values.get("name"),
            Some(&FieldValue::Text("New Task".to_string()))
        );
        assert_eq!(state.values.get("start"), Some(&FieldValue::Date(today)));
        assert_eq!(
            state.values.get("end"),
            Some(&FieldValue::Date(today + Duration::days(1)))
        );
    }

    #[test]
    fn test_edit_then_patch_round_trips() {
        let schema = FormSchema::from_columns(&default_columns());
        let task = sample_task();
        let mut state = EditorState::edit(&task, &schema);
        state.values.insert(
            "name".to_string(),
            FieldValue::Text("Detailed design".to_string()),
        );
        state.parent = None;

        let patch = state.to_patch(&schema);
        assert_eq!(patch.name.as_deref(), Some("Detailed design"));
        assert_eq!(patch.start, Some(d("2025-06-02")));
        assert_eq!(patch.end, Some(d("2025-06-06")));
        assert_eq!(patch.parent, Some(None));
        assert_eq!(patch.assignees, Some(vec![2]));
        // The default schema has no dependencies column, so the patch must
        // leave the dependency list alone.
        assert_eq!(patch.dependencies, None);
    }

    #[test]
    fn test_patch_carries_custom_fields() {
        let mut columns = default_columns();
        columns.push(crate::model::Column::new(
            "code",
            "Code",
            crate::model::ColumnKind::Text,
            crate::model::ColumnWidth::Fixed(80.0),
        ));
        let schema = FormSchema::from_columns(&columns);
        let mut state = EditorState::create(&schema);
        state
            .values
            .insert("code".to_string(), FieldValue::Text("D-17".to_string()));
        let patch = state.to_patch(&schema);
        assert_eq!(patch.custom.get("code"), Some(&Value::String("D-17".to_string())));
    }
}
