use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifies a task. Ids are dense integers assigned by the widget
/// (`max + 1`), matching the record shape hosts typically store.
pub type TaskId = u64;

/// Identifies an entry in the resource directory.
pub type ResourceId = u64;

/// A single schedulable task.
///
/// `parent` and `dependencies` reference other tasks by id. A parent that
/// does not resolve promotes the task to a root; a dependency that does not
/// resolve is skipped when drawing. Fields the host stores beyond the known
/// ones round-trip through `custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Percent complete, 0–100.
    #[serde(default)]
    pub progress: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<TaskId>,
    /// Ids of tasks this one depends on (drawn as incoming arrows).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    /// Assigned resource ids. Input accepts a bare id or a list.
    #[serde(
        rename = "assignedUser",
        default,
        with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub assignees: Vec<ResourceId>,
    #[serde(flatten)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            progress: 0.0,
            parent: None,
            dependencies: Vec::new(),
            assignees: Vec::new(),
            custom: BTreeMap::new(),
        }
    }

    /// Whole days between start and end. The end day itself is worked, so a
    /// one-day task has duration zero.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Merge a patch into this task. The id is not part of the patch, so it
    /// can never change through an update.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(parent) = patch.parent {
            self.parent = parent;
        }
        if let Some(dependencies) = patch.dependencies {
            self.dependencies = dependencies;
        }
        if let Some(assignees) = patch.assignees {
            self.assignees = assignees;
        }
        for (key, value) in patch.custom {
            self.custom.insert(key, value);
        }
    }
}

/// A partial update for an existing task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub progress: Option<f32>,
    /// `Some(None)` clears the parent.
    pub parent: Option<Option<TaskId>>,
    pub dependencies: Option<Vec<TaskId>>,
    pub assignees: Option<Vec<ResourceId>>,
    /// Custom fields to set, merged key by key.
    pub custom: BTreeMap<String, serde_json::Value>,
}

/// Next id for a newly created task: one past the current maximum, `1` for
/// an empty set.
pub fn next_task_id(tasks: &[Task]) -> TaskId {
    tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
}

/// Remove every reference to a deleted task: drop it from dependency lists
/// and clear it as a parent, so former children become roots.
pub fn scrub_references(tasks: &mut [Task], removed: TaskId) {
    for task in tasks.iter_mut() {
        task.dependencies.retain(|&dep| dep != removed);
        if task.parent == Some(removed) {
            task.parent = None;
        }
    }
}

/// Serde helper accepting `"assignedUser": 3` as well as `[3, 4]`.
mod one_or_many {
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    use super::ResourceId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ResourceId),
        Many(Vec<ResourceId>),
    }

    pub fn serialize<S>(ids: &[ResourceId], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ids.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ResourceId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(id) => vec![id],
            OneOrMany::Many(ids) => ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_task(id: TaskId) -> Task {
        Task::new(id, format!("Task {id}"), d("2025-06-01"), d("2025-06-05"))
    }

    // --- id assignment ---

    #[test]
    fn test_next_id_is_one_past_max() {
        let tasks = vec![sample_task(1), sample_task(3), sample_task(7)];
        assert_eq!(next_task_id(&tasks), 8);
    }

    #[test]
    fn test_next_id_for_empty_set() {
        assert_eq!(next_task_id(&[]), 1);
    }

    // --- patch merge ---

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut task = sample_task(1);
        task.parent = Some(9);
        task.apply(TaskPatch {
            name: Some("Renamed".to_string()),
            end: Some(d("2025-06-10")),
            ..Default::default()
        });
        assert_eq!(task.name, "Renamed");
        assert_eq!(task.start, d("2025-06-01"));
        assert_eq!(task.end, d("2025-06-10"));
        assert_eq!(task.parent, Some(9));
    }

    #[test]
    fn test_apply_can_clear_parent() {
        let mut task = sample_task(1);
        task.parent = Some(9);
        task.apply(TaskPatch {
            parent: Some(None),
            ..Default::default()
        });
        assert_eq!(task.parent, None);
    }

    #[test]
    fn test_apply_merges_custom_fields_key_by_key() {
        let mut task = sample_task(1);
        task.custom
            .insert("priority".to_string(), serde_json::json!("high"));
        task.custom.insert("cost".to_string(), serde_json::json!(100));
        let mut patch = TaskPatch::default();
        patch
            .custom
            .insert("cost".to_string(), serde_json::json!(250));
        task.apply(patch);
        assert_eq!(task.custom["priority"], serde_json::json!("high"));
        assert_eq!(task.custom["cost"], serde_json::json!(250));
    }

    // --- reference scrubbing ---

    #[test]
    fn test_scrub_strips_dependencies_and_parents() {
        let mut tasks = vec![sample_task(1), sample_task(2), sample_task(3)];
        tasks[1].parent = Some(1);
        tasks[2].dependencies = vec![1, 2];
        scrub_references(&mut tasks, 1);
        assert_eq!(tasks[1].parent, None);
        assert_eq!(tasks[2].dependencies, vec![2]);
    }

    // --- serde shape ---

    #[test]
    fn test_assigned_user_accepts_single_id() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Design",
            "start": "2025-06-01",
            "end": "2025-06-05",
            "assignedUser": 2
        }))
        .unwrap();
        assert_eq!(task.assignees, vec![2]);
    }

    #[test]
    fn test_assigned_user_accepts_list() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Design",
            "start": "2025-06-01",
            "end": "2025-06-05",
            "assignedUser": [2, 5]
        }))
        .unwrap();
        assert_eq!(task.assignees, vec![2, 5]);
    }

    #[test]
    fn test_unknown_fields_round_trip_through_custom() {
        let json = serde_json::json!({
            "id": 4,
            "name": "Review",
            "start": "2025-06-02",
            "end": "2025-06-03",
            "progress": 40.0,
            "sl_no": "R-4",
            "budget": 1500
        });
        let task: Task = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(task.custom["sl_no"], serde_json::json!("R-4"));
        assert_eq!(task.custom["budget"], serde_json::json!(1500));
        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_duration_counts_whole_days() {
        let task = sample_task(1);
        assert_eq!(task.duration_days(), 4);
    }
}
