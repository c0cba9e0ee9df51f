use std::collections::HashMap;
use std::path::Path;

use crate::model::{Task, TaskId};

/// Write tasks as semicolon-delimited CSV in the shape [`import_csv`]
/// accepts, returning how many rows were written.
///
/// Columns: Task Name ; Start Date ; End Date ; Progress ; Parent.
/// Dates are DD/MM/YYYY and parents are written by name rather than id, so
/// a re-import with freshly assigned ids reconstructs the hierarchy as long
/// as names are unique; [`import_csv`] attaches a repeated name to its
/// first match.
///
/// [`import_csv`]: crate::io::import_csv
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {e}"))?;

    writer
        .write_record(["Task Name", "Start Date", "End Date", "Progress", "Parent"])
        .map_err(|e| format!("Failed to write CSV header: {e}"))?;

    let name_of: HashMap<TaskId, &str> = tasks.iter().map(|t| (t.id, t.name.as_str())).collect();
    for task in tasks {
        writer
            .write_record(row(task, &name_of))
            .map_err(|e| format!("Failed to write task '{}': {e}", task.name))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to finish CSV file: {e}"))?;
    Ok(tasks.len())
}

fn row(task: &Task, name_of: &HashMap<TaskId, &str>) -> [String; 5] {
    let parent = task
        .parent
        .and_then(|pid| name_of.get(&pid).copied())
        .unwrap_or_default();
    [
        task.name.clone(),
        task.start.format("%d/%m/%Y").to_string(),
        task.end.format("%d/%m/%Y").to_string(),
        format!("{:.0}", task.progress),
        parent.to_string(),
    ]
}
