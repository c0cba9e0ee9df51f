use chrono::NaiveDate;
use serde_json::Value;

use crate::model::{Column, ColumnKind, ColumnWidth, GanttOptions, Task};

/// Narrowest a column can get, by resizing or by flex shrink.
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

/// Indent applied to a task name per outline level.
pub const LEVEL_INDENT: f32 = 20.0;

/// Text shown in one grid cell, formatted by the column's kind: dates
/// localized, multi-selects resolved against the resource directory,
/// anything unknown stringified.
pub fn cell_text(task: &Task, row: usize, column: &Column, options: &GanttOptions) -> String {
    match column.kind {
        ColumnKind::Index => (row + 1).to_string(),
        ColumnKind::Date => date_text(task, &column.id),
        ColumnKind::Percent => format!("{}%", number_value(task, &column.id)),
        ColumnKind::MultiSelect => {
            let ids = id_list(task, &column.id);
            ids.iter()
                .map(|&id| {
                    options
                        .resource_name(id)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("ID: {id}"))
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
        ColumnKind::Text | ColumnKind::Number => raw_text(task, &column.id),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn date_text(task: &Task, id: &str) -> String {
    match id {
        "start" => format_date(task.start),
        "end" => format_date(task.end),
        other => match task.custom.get(other) {
            Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(format_date)
                .unwrap_or_else(|_| s.clone()),
            Some(Value::Null) | None => String::new(),
            Some(v) => v.to_string(),
        },
    }
}

fn number_value(task: &Task, id: &str) -> f32 {
    match id {
        "progress" => task.progress,
        other => task
            .custom
            .get(other)
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as f32,
    }
}

fn id_list(task: &Task, id: &str) -> Vec<u64> {
    match id {
        "assignedUser" => task.assignees.clone(),
        "dependencies" => task.dependencies.clone(),
        other => match task.custom.get(other) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_u64).collect(),
            Some(v) => v.as_u64().into_iter().collect(),
            None => Vec::new(),
        },
    }
}

fn raw_text(task: &Task, id: &str) -> String {
    match id {
        "name" => task.name.clone(),
        other => match task.custom.get(other) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(v) => v.to_string(),
        },
    }
}

/// Resolve every column to a pixel width for the given panel width. Fixed
/// columns take their pixels; flex columns split the leftover space around
/// their basis, never dropping below [`MIN_COLUMN_WIDTH`].
pub fn resolve_widths(columns: &[Column], available: f32) -> Vec<f32> {
    let mut fixed = 0.0;
    let mut basis = 0.0;
    let mut flex_count = 0usize;
    for column in columns {
        match column.width {
            ColumnWidth::Fixed(px) => fixed += px,
            ColumnWidth::Flex(b) => {
                basis += b;
                flex_count += 1;
            }
        }
    }
    let leftover = available - fixed - basis;
    columns
        .iter()
        .map(|column| match column.width {
            ColumnWidth::Fixed(px) => px,
            ColumnWidth::Flex(b) => (b + leftover / flex_count as f32).max(MIN_COLUMN_WIDTH),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{default_columns, Resource};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_options() -> GanttOptions {
        GanttOptions {
            resources: vec![Resource::new(1, "Alice"), Resource::new(2, "Bob")],
            ..Default::default()
        }
    }

    fn sample_task() -> Task {
        let mut task = Task::new(4, "Review", d("2025-06-02"), d("2025-06-13"));
        task.progress = 60.0;
        task.assignees = vec![2, 7];
        task.custom
            .insert("code".to_string(), Value::String("R-4".to_string()));
        task.custom.insert("budget".to_string(), serde_json::json!(1500));
        task
    }

    fn column(id: &str, kind: ColumnKind) -> Column {
        Column::new(id, id, kind, ColumnWidth::Fixed(90.0))
    }

    // --- cell formatting ---

    #[test]
    fn test_index_cell_is_one_based() {
        let text = cell_text(&sample_task(), 2, &column("sl_no", ColumnKind::Index), &sample_options());
        assert_eq!(text, "3");
    }

    #[test]
    fn test_date_cells_localize() {
        let task = sample_task();
        let options = sample_options();
        assert_eq!(cell_text(&task, 0, &column("start", ColumnKind::Date), &options), "02/06/2025");
        assert_eq!(cell_text(&task, 0, &column("end", ColumnKind::Date), &options), "13/06/2025");
    }

    #[test]
    fn test_multiselect_resolves_names_with_id_fallback() {
        let text = cell_text(
            &sample_task(),
            0,
            &column("assignedUser", ColumnKind::MultiSelect),
            &sample_options(),
        );
        assert_eq!(text, "Bob, ID: 7");
    }

    #[test]
    fn test_percent_cell() {
        let text = cell_text(&sample_task(), 0, &column("progress", ColumnKind::Percent), &sample_options());
        assert_eq!(text, "60%");
    }

    #[test]
    fn test_custom_cells_stringify() {
        let task = sample_task();
        let options = sample_options();
        assert_eq!(cell_text(&task, 0, &column("code", ColumnKind::Text), &options), "R-4");
        assert_eq!(cell_text(&task, 0, &column("budget", ColumnKind::Number), &options), "1500");
        assert_eq!(cell_text(&task, 0, &column("missing", ColumnKind::Text), &options), "");
    }

    // --- width resolution ---

    #[test]
    fn test_flex_column_absorbs_leftover() {
        let widths = resolve_widths(&default_columns(), 600.0);
        assert_eq!(widths, vec![300.0, 90.0, 90.0, 120.0]);
    }

    #[test]
    fn test_flex_column_shrinks_when_tight() {
        let widths = resolve_widths(&default_columns(), 400.0);
        assert_eq!(widths, vec![100.0, 90.0, 90.0, 120.0]);
    }

    #[test]
    fn test_flex_column_never_collapses() {
        let widths = resolve_widths(&default_columns(), 100.0);
        assert_eq!(widths[0], MIN_COLUMN_WIDTH);
    }
}
