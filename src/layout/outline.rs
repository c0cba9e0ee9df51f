use std::collections::HashMap;

use crate::model::{Task, TaskId};

/// One row of the flattened task outline: which task, and how deep it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: TaskId,
    /// Nesting depth; roots are level 0.
    pub level: u32,
}

/// Flatten the parent-linked task set into display order.
///
/// Each task attaches under its parent when that id resolves; otherwise it
/// is a root, so orphans stay visible rather than disappearing. Roots and
/// every sibling group sort ascending by start date (the sort is stable, so
/// equal starts keep input order), then rows are emitted pre-order with
/// `level` counting ancestors.
///
/// Parent links must be acyclic. Tasks inside a parent cycle are reachable
/// from no root and silently drop out of the outline.
pub fn flatten(tasks: &[Task]) -> Vec<OutlineRow> {
    let index_of: HashMap<TaskId, usize> =
        tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        match task.parent.and_then(|pid| index_of.get(&pid)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    roots.sort_by(|&a, &b| tasks[a].start.cmp(&tasks[b].start));
    for group in &mut children {
        group.sort_by(|&a, &b| tasks[a].start.cmp(&tasks[b].start));
    }

    let mut rows = Vec::with_capacity(tasks.len());
    for &root in &roots {
        emit(tasks, &children, root, 0, &mut rows);
    }
    rows
}

fn emit(
    tasks: &[Task],
    children: &[Vec<usize>],
    index: usize,
    level: u32,
    rows: &mut Vec<OutlineRow>,
) {
    rows.push(OutlineRow {
        id: tasks[index].id,
        level,
    });
    for &child in &children[index] {
        emit(tasks, children, child, level + 1, rows);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: TaskId, start: &str, parent: Option<TaskId>) -> Task {
        let mut t = Task::new(id, format!("Task {id}"), d(start), d(start));
        t.parent = parent;
        t
    }

    fn ids(rows: &[OutlineRow]) -> Vec<TaskId> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_child_follows_parent_with_deeper_level() {
        let tasks = vec![
            task(1, "2025-06-01", None),
            task(2, "2025-06-02", Some(1)),
            task(3, "2025-06-06", None),
        ];
        let rows = flatten(&tasks);
        assert_eq!(ids(&rows), vec![1, 2, 3]);
        let levels: Vec<u32> = rows.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![0, 1, 0]);
    }

    #[test]
    fn test_siblings_sort_by_start_date() {
        let tasks = vec![
            task(1, "2025-06-01", None),
            task(2, "2025-06-09", Some(1)),
            task(3, "2025-06-03", Some(1)),
        ];
        assert_eq!(ids(&flatten(&tasks)), vec![1, 3, 2]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let tasks = vec![
            task(5, "2025-06-01", None),
            task(2, "2025-06-01", None),
            task(9, "2025-06-01", None),
        ];
        assert_eq!(ids(&flatten(&tasks)), vec![5, 2, 9]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let tasks = vec![
            task(1, "2025-06-01", None),
            task(2, "2025-06-02", Some(42)),
        ];
        let rows = flatten(&tasks);
        assert_eq!(ids(&rows), vec![1, 2]);
        assert_eq!(rows[1].level, 0);
    }

    #[test]
    fn test_grandchildren_nest_two_deep() {
        let tasks = vec![
            task(1, "2025-06-01", None),
            task(2, "2025-06-02", Some(1)),
            task(3, "2025-06-03", Some(2)),
        ];
        let rows = flatten(&tasks);
        assert_eq!(ids(&rows), vec![1, 2, 3]);
        assert_eq!(rows[2].level, 2);
    }

    #[test]
    fn test_parent_cycle_drops_out() {
        let tasks = vec![
            task(1, "2025-06-01", Some(2)),
            task(2, "2025-06-02", Some(1)),
            task(3, "2025-06-03", None),
        ];
        assert_eq!(ids(&flatten(&tasks)), vec![3]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(flatten(&[]), Vec::new());
    }
}
