use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;

use crate::model::{Task, TaskId};

/// What a CSV column feeds into, resolved from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Start,
    End,
    Progress,
    Parent,
}

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y",
];

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// A progress cell may hold a percentage ("45", "45%") or a status word.
fn parse_progress(text: &str) -> f32 {
    let bare = text.trim().trim_end_matches('%').trim();
    if let Ok(value) = bare.parse::<f32>() {
        return value.clamp(0.0, 100.0);
    }
    match text.trim().to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => 100.0,
        "in progress" | "in-progress" | "active" | "started" => 50.0,
        "released" | "planned" => 25.0,
        _ => 0.0,
    }
}

/// Sniff the delimiter from the header line. Semicolon wins ties; tab beats
/// comma, so decimal-comma spreadsheet exports parse whole.
fn sniff_delimiter(header_line: &str) -> u8 {
    let count = |c| header_line.matches(c).count();
    let (semis, commas, tabs) = (count(';'), count(','), count('\t'));
    if semis >= commas && semis >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Header text to field, ignoring case, spaces, dashes and underscores, so
/// "Start Date", "start_date" and "StartDate" all land on [`Field::Start`].
fn field_for_header(header: &str) -> Option<Field> {
    let key = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    let field = match key.as_str() {
        "name" | "task" | "taskname" | "tasklabel" | "label" | "title" | "activity" => Field::Name,
        "start" | "startdate" | "from" | "begin" | "begindate" => Field::Start,
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Field::End,
        "progress" | "status" | "state" | "done" | "complete" | "percentcomplete" => {
            Field::Progress
        }
        "parent" | "parenttask" | "parentname" | "subtaskof" => Field::Parent,
        _ => return None,
    };
    Some(field)
}

/// Read tasks from a CSV file, returning them with a count of skipped rows.
///
/// The delimiter is sniffed from the header line and headers map to fields
/// loosely, so exports from other tools usually load unchanged. Ids are
/// assigned in row order; a parent cell names another row's task and is
/// resolved once every row is in. When several rows share a name, a parent
/// cell naming it attaches to the first and logs a warning. Rows missing a
/// name or a parseable date are skipped, not fatal.
pub fn import_csv(path: &Path) -> Result<(Vec<Task>, usize), String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file: {e}"))?;
    let delimiter = sniff_delimiter(content.lines().next().unwrap_or(""));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {e}"))?
        .clone();
    let roles: Vec<Option<Field>> = headers.iter().map(field_for_header).collect();

    for required in [Field::Name, Field::Start, Field::End] {
        if !roles.contains(&Some(required)) {
            let found: Vec<&str> = headers.iter().collect();
            return Err(format!(
                "CSV needs task name, start date and end date columns; found {found:?}"
            ));
        }
    }

    let mut tasks: Vec<Task> = Vec::new();
    let mut parent_names: Vec<Option<String>> = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping CSV line {line}: {e}");
                skipped += 1;
                continue;
            }
        };
        let cell = |field: Field| {
            record
                .iter()
                .zip(&roles)
                .find(|(_, role)| **role == Some(field))
                .map(|(text, _)| text.trim())
                .filter(|text| !text.is_empty())
        };

        let Some(name) = cell(Field::Name) else {
            warn!("Skipping CSV line {line}: no task name");
            skipped += 1;
            continue;
        };
        let dates = cell(Field::Start)
            .and_then(parse_date)
            .zip(cell(Field::End).and_then(parse_date));
        let Some((start, end)) = dates else {
            warn!("Skipping CSV line {line}: unparseable date");
            skipped += 1;
            continue;
        };

        let id = tasks.len() as TaskId + 1;
        let mut task = Task::new(id, name, start, end.max(start));
        task.progress = cell(Field::Progress).map(parse_progress).unwrap_or(0.0);
        parent_names.push(cell(Field::Parent).map(str::to_string));
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(if skipped > 0 {
            format!("No valid tasks in CSV ({skipped} rows skipped)")
        } else {
            "CSV file has no data rows".to_string()
        });
    }

    // First occurrence wins when task names repeat.
    let mut id_of: HashMap<String, (TaskId, usize)> = HashMap::new();
    for task in &tasks {
        let entry = id_of.entry(task.name.to_lowercase()).or_insert((task.id, 0));
        entry.1 += 1;
    }
    for (task, wanted) in tasks.iter_mut().zip(&parent_names) {
        let Some(wanted) = wanted else { continue };
        match id_of.get(&wanted.to_lowercase()) {
            // A row naming itself stays a root.
            Some(&(pid, count)) if pid != task.id => {
                if count > 1 {
                    warn!(
                        "Parent name '{wanted}' matches {count} tasks; '{}' attaches to the first",
                        task.name
                    );
                }
                task.parent = Some(pid);
            }
            Some(_) => {}
            None => warn!("Parent '{wanted}' of '{}' is not in the file", task.name),
        }
    }

    Ok((tasks, skipped))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_sniff_delimiter_prefers_majority() {
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("a,b,c"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn test_parse_date_accepts_common_formats() {
        for s in ["2025-06-02", "02/06/2025", "02-06-2025", "02.06.2025"] {
            assert_eq!(parse_date(s), Some(d("2025-06-02")), "format {s}");
        }
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_progress_numbers_and_words() {
        assert_eq!(parse_progress("45"), 45.0);
        assert_eq!(parse_progress("45%"), 45.0);
        assert_eq!(parse_progress("150"), 100.0);
        assert_eq!(parse_progress("Done"), 100.0);
        assert_eq!(parse_progress("In Progress"), 50.0);
        assert_eq!(parse_progress("???"), 0.0);
    }

    #[test]
    fn test_import_assigns_sequential_ids_and_resolves_parents() {
        let (_dir, path) = write_csv(
            "Task Name;Start Date;End Date;Progress;Parent\n\
             Planning;01/06/2025;05/06/2025;100;\n\
             Design;02/06/2025;06/06/2025;40;Planning\n",
        );
        let (tasks, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[1].id, 2);
        assert_eq!(tasks[1].parent, Some(1));
        assert_eq!(tasks[0].start, d("2025-06-01"));
        assert_eq!(tasks[0].progress, 100.0);
    }

    #[test]
    fn test_import_skips_bad_rows_and_counts_them() {
        let (_dir, path) = write_csv(
            "name,start,end\n\
             Good,2025-06-01,2025-06-02\n\
             ,2025-06-01,2025-06-02\n\
             Bad date,junk,2025-06-02\n",
        );
        let (tasks, skipped) = import_csv(&path).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(skipped, 2);
        assert_eq!(tasks[0].name, "Good");
    }

    #[test]
    fn test_import_requires_core_columns() {
        let (_dir, path) = write_csv("name,start\nA,2025-06-01\n");
        assert!(import_csv(&path).is_err());
    }

    #[test]
    fn test_import_clamps_end_before_start() {
        let (_dir, path) = write_csv(
            "name,start,end\n\
             Swapped,2025-06-10,2025-06-01\n",
        );
        let (tasks, _) = import_csv(&path).unwrap();
        assert_eq!(tasks[0].start, d("2025-06-10"));
        assert_eq!(tasks[0].end, d("2025-06-10"));
    }

    #[test]
    fn test_repeated_names_attach_parents_to_first_match() {
        let (_dir, path) = write_csv(
            "name,start,end,parent\n\
             Phase,2025-06-01,2025-06-05,Phase\n\
             Phase,2025-07-01,2025-07-05,Phase\n\
             Kickoff,2025-06-02,2025-06-03,phase\n",
        );
        let (tasks, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 0);
        // The first "Phase" names itself and stays a root; everything else
        // pointing at "Phase" lands on that first row.
        assert_eq!(tasks[0].parent, None);
        assert_eq!(tasks[1].parent, Some(tasks[0].id));
        assert_eq!(tasks[2].parent, Some(tasks[0].id));
    }

    #[test]
    fn test_unknown_parent_leaves_task_at_root() {
        let (_dir, path) = write_csv(
            "name,start,end,parent\n\
             Orphan,2025-06-01,2025-06-02,Ghost\n",
        );
        let (tasks, _) = import_csv(&path).unwrap();
        assert_eq!(tasks[0].parent, None);
    }
}
