use std::path::Path;

use crate::model::Task;

/// Save the task list to a JSON file. The format is a plain array of task
/// records, custom fields included.
pub fn save_tasks(tasks: &[Task], path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(tasks).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}

/// Load a task list from a JSON file.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_round_trip_keeps_custom_fields() {
        let mut task = Task::new(1, "Kickoff", d("2025-06-02"), d("2025-06-04"));
        task.assignees = vec![2, 3];
        task.custom
            .insert("code".to_string(), serde_json::json!("K-1"));
        let tasks = vec![task];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        save_tasks(&tasks, &path).unwrap();
        let loaded = load_tasks(&path).unwrap();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(load_tasks(&path).is_err());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_tasks(&path).is_err());
    }
}
