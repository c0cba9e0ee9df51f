use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use egui::{pos2, Pos2, Rect};

use crate::layout::outline::OutlineRow;
use crate::layout::scale::{TimeScale, ViewMode};
use crate::model::{Task, TaskId};

/// Horizontal run-up before a curve turns toward its target bar.
const LINK_APPROACH: f32 = 15.0;
/// Offset of the vertical rail from the target bar's left edge.
const LINK_RAIL: f32 = 5.0;
/// Vertical lead-in/out of the rail's rounded corners.
const LINK_BEND: f32 = 10.0;

/// One labelled cell of the timeline header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub x: f32,
    pub width: f32,
    pub label: String,
}

/// Geometry and text for one task bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlan {
    pub task_id: TaskId,
    pub row: usize,
    pub rect: Rect,
    /// Percent complete, 0–100, unclamped.
    pub progress: f32,
    pub label: String,
}

/// One step of a dependency curve, following an implicit current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    LineTo(Pos2),
    QuadTo { control: Pos2, end: Pos2 },
}

/// A dependency curve from a predecessor bar's right edge into its
/// successor bar's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPlan {
    pub from: TaskId,
    pub to: TaskId,
    pub start: Pos2,
    pub segments: Vec<PathSeg>,
    /// Where the arrowhead sits, pointing rightward into the target bar.
    pub tip: Pos2,
}

/// Everything the chart panel paints, in content coordinates with the
/// origin at the window start and the first row's top.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    /// Content width: the summed header cells, which always cover the bars.
    pub width: f32,
    pub height: f32,
    pub cells: Vec<HeaderCell>,
    /// Month group markers above the day cells; empty outside day view.
    pub months: Vec<HeaderCell>,
    pub bars: Vec<BarPlan>,
    pub links: Vec<LinkPlan>,
}

impl ChartPlan {
    pub fn build(
        tasks: &[Task],
        rows: &[OutlineRow],
        scale: &TimeScale,
        mode: ViewMode,
        row_height: f32,
    ) -> Self {
        let task_of: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
        let row_of: HashMap<TaskId, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        let (cells, months) = match mode {
            ViewMode::Day => day_cells(scale),
            ViewMode::Week => (week_cells(scale), Vec::new()),
            ViewMode::Month => (month_cells(scale), Vec::new()),
        };
        let width = cells.iter().map(|c| c.width).sum();

        let mut bars = Vec::with_capacity(rows.len());
        let mut links = Vec::new();
        for (row, outline) in rows.iter().enumerate() {
            let Some(task) = task_of.get(&outline.id) else {
                continue;
            };
            let x = scale.date_to_x(task.start);
            let y = row as f32 * row_height + row_height * 0.1;
            bars.push(BarPlan {
                task_id: task.id,
                row,
                rect: Rect::from_min_size(
                    pos2(x, y),
                    egui::vec2(scale.bar_width(task), row_height * 0.8),
                ),
                progress: task.progress,
                label: task.name.clone(),
            });

            for &dep in &task.dependencies {
                let (Some(pred), Some(&pred_row)) = (task_of.get(&dep), row_of.get(&dep)) else {
                    continue;
                };
                links.push(link_path((pred, pred_row), (task, row), scale, row_height));
            }
        }

        Self {
            width,
            height: rows.len() as f32 * row_height,
            cells,
            months,
            bars,
            links,
        }
    }
}

fn link_path(
    (pred, pred_row): (&Task, usize),
    (succ, succ_row): (&Task, usize),
    scale: &TimeScale,
    row_height: f32,
) -> LinkPlan {
    let from_x = scale.date_to_x(pred.end) + scale.day_width;
    let to_x = scale.date_to_x(succ.start);
    let from_y = pred_row as f32 * row_height + row_height / 2.0;
    let to_y = succ_row as f32 * row_height + row_height / 2.0;
    let sign = if to_y > from_y {
        1.0
    } else if to_y < from_y {
        -1.0
    } else {
        0.0
    };
    let rail_x = to_x - LINK_RAIL;

    LinkPlan {
        from: pred.id,
        to: succ.id,
        start: pos2(from_x, from_y),
        segments: vec![
            PathSeg::LineTo(pos2(to_x - LINK_APPROACH, from_y)),
            PathSeg::QuadTo {
                control: pos2(rail_x, from_y),
                end: pos2(rail_x, from_y + LINK_BEND * sign),
            },
            PathSeg::LineTo(pos2(rail_x, to_y - LINK_BEND * sign)),
            PathSeg::QuadTo {
                control: pos2(rail_x, to_y),
                end: pos2(to_x, to_y),
            },
        ],
        tip: pos2(to_x, to_y),
    }
}

/// Day cells labelled with the day number, plus a month marker anchored at
/// each month's first visible cell and spanning its visible days.
fn day_cells(scale: &TimeScale) -> (Vec<HeaderCell>, Vec<HeaderCell>) {
    let mut cells = Vec::new();
    let mut months: Vec<HeaderCell> = Vec::new();
    let mut x = 0.0;
    let mut date = scale.window_start;
    while date <= scale.window_end {
        cells.push(HeaderCell {
            x,
            width: scale.day_width,
            label: date.day().to_string(),
        });
        if date.day() == 1 || months.is_empty() {
            months.push(HeaderCell {
                x,
                width: 0.0,
                label: date.format("%B %Y").to_string(),
            });
        }
        if let Some(current) = months.last_mut() {
            current.width += scale.day_width;
        }
        x += scale.day_width;
        date += Duration::days(1);
    }
    (cells, months)
}

/// Seven-day cells labelled with the ISO week number, stepping from the
/// window start rather than snapping to Mondays.
fn week_cells(scale: &TimeScale) -> Vec<HeaderCell> {
    let mut cells = Vec::new();
    let mut x = 0.0;
    let mut date = scale.window_start;
    while date <= scale.window_end {
        cells.push(HeaderCell {
            x,
            width: scale.day_width * 7.0,
            label: format!("Week {}", date.iso_week().week()),
        });
        x += scale.day_width * 7.0;
        date += Duration::days(7);
    }
    cells
}

/// Month cells sized to the full calendar month, stepping a month at a
/// time from the window start. A window that starts mid-month therefore
/// drifts from the date scale; the summed width still covers every bar.
fn month_cells(scale: &TimeScale) -> Vec<HeaderCell> {
    let mut cells = Vec::new();
    let mut x = 0.0;
    let mut date = scale.window_start;
    while date <= scale.window_end {
        let width = days_in_month(date.year(), date.month()) as f32 * scale.day_width;
        cells.push(HeaderCell {
            x,
            width,
            label: date.format("%B %Y").to_string(),
        });
        x += width;
        match date.checked_add_months(Months::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }
    cells
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days(),
        _ => 30,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::outline::flatten;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scale(start: &str, end: &str, day_width: f32) -> TimeScale {
        TimeScale {
            window_start: d(start),
            window_end: d(end),
            day_width,
        }
    }

    fn task(id: TaskId, start: &str, end: &str) -> Task {
        Task::new(id, format!("Task {id}"), d(start), d(end))
    }

    fn build(tasks: &[Task], scale: &TimeScale, mode: ViewMode) -> ChartPlan {
        let rows = flatten(tasks);
        ChartPlan::build(tasks, &rows, scale, mode, 40.0)
    }

    // --- bars ---

    #[test]
    fn test_bar_rect_from_scale_and_row() {
        let tasks = vec![
            task(1, "2025-06-02", "2025-06-04"),
            task(2, "2025-06-05", "2025-06-05"),
        ];
        let plan = build(&tasks, &scale("2025-06-01", "2025-06-30", 50.0), ViewMode::Day);
        let bar = &plan.bars[0];
        assert_eq!(bar.rect.min.x, 50.0);
        assert_eq!(bar.rect.width(), 150.0);
        assert_eq!(bar.rect.min.y, 4.0);
        assert_eq!(bar.rect.height(), 32.0);
        let second = &plan.bars[1];
        assert_eq!(second.rect.min.x, 200.0);
        assert_eq!(second.rect.width(), 50.0);
        assert_eq!(second.rect.min.y, 44.0);
    }

    #[test]
    fn test_plan_height_counts_rows() {
        let tasks = vec![task(1, "2025-06-02", "2025-06-04")];
        let plan = build(&tasks, &scale("2025-06-01", "2025-06-30", 50.0), ViewMode::Day);
        assert_eq!(plan.height, 40.0);
    }

    // --- links ---

    #[test]
    fn test_link_runs_from_pred_end_to_succ_start() {
        let mut a = task(1, "2025-06-02", "2025-06-04");
        a.name = "A".to_string();
        let mut b = task(2, "2025-06-03", "2025-06-03");
        b.parent = Some(1);
        let mut c = task(3, "2025-06-06", "2025-06-08");
        c.dependencies = vec![1];
        let tasks = vec![a, b, c];
        let plan = build(&tasks, &scale("2025-06-01", "2025-06-30", 50.0), ViewMode::Day);

        assert_eq!(plan.links.len(), 1);
        let link = &plan.links[0];
        assert_eq!((link.from, link.to), (1, 3));
        // Predecessor A sits in row 0, successor C in row 2.
        assert_eq!(link.start, pos2(200.0, 20.0));
        assert_eq!(link.tip, pos2(250.0, 100.0));
        assert_eq!(link.segments[0], PathSeg::LineTo(pos2(235.0, 20.0)));
        assert_eq!(
            link.segments[1],
            PathSeg::QuadTo {
                control: pos2(245.0, 20.0),
                end: pos2(245.0, 30.0),
            }
        );
        assert_eq!(link.segments[2], PathSeg::LineTo(pos2(245.0, 90.0)));
        assert_eq!(
            link.segments[3],
            PathSeg::QuadTo {
                control: pos2(245.0, 100.0),
                end: pos2(250.0, 100.0),
            }
        );
    }

    #[test]
    fn test_upward_link_bends_the_other_way() {
        let mut succ = task(1, "2025-06-02", "2025-06-04");
        succ.dependencies = vec![2];
        let tasks = vec![succ, task(2, "2025-06-10", "2025-06-12")];
        let plan = build(&tasks, &scale("2025-06-01", "2025-06-30", 50.0), ViewMode::Day);
        // Rows sort by start, so the successor sits above its predecessor.
        let link = &plan.links[0];
        assert_eq!(link.start, pos2(600.0, 60.0));
        assert_eq!(link.tip, pos2(50.0, 20.0));
        assert_eq!(
            link.segments[1],
            PathSeg::QuadTo {
                control: pos2(45.0, 60.0),
                end: pos2(45.0, 50.0),
            }
        );
    }

    #[test]
    fn test_dangling_dependency_is_skipped() {
        let mut a = task(1, "2025-06-02", "2025-06-04");
        a.dependencies = vec![42];
        let plan = build(&[a], &scale("2025-06-01", "2025-06-30", 50.0), ViewMode::Day);
        assert_eq!(plan.links, Vec::new());
    }

    // --- headers ---

    #[test]
    fn test_day_cells_and_month_markers() {
        let plan = build(&[], &scale("2025-06-25", "2025-07-05", 50.0), ViewMode::Day);
        assert_eq!(plan.cells.len(), 11);
        assert_eq!(plan.cells[0].label, "25");
        assert_eq!(plan.cells[6].label, "1");
        assert_eq!(plan.width, 550.0);

        assert_eq!(plan.months.len(), 2);
        assert_eq!(plan.months[0].label, "June 2025");
        assert_eq!(plan.months[0].x, 0.0);
        assert_eq!(plan.months[0].width, 300.0);
        assert_eq!(plan.months[1].label, "July 2025");
        assert_eq!(plan.months[1].x, 300.0);
        assert_eq!(plan.months[1].width, 250.0);
    }

    #[test]
    fn test_week_cells_step_from_window_start() {
        let plan = build(&[], &scale("2025-06-01", "2025-07-01", 15.0), ViewMode::Week);
        assert_eq!(plan.cells.len(), 5);
        assert_eq!(plan.cells[0].label, "Week 22");
        assert_eq!(plan.cells[1].label, "Week 23");
        assert_eq!(plan.cells[0].width, 105.0);
        assert_eq!(plan.cells[1].x, 105.0);
        assert_eq!(plan.months, Vec::new());
    }

    #[test]
    fn test_month_cells_use_full_calendar_months() {
        let plan = build(&[], &scale("2025-06-15", "2025-08-20", 5.0), ViewMode::Month);
        let labels: Vec<&str> = plan.cells.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["June 2025", "July 2025", "August 2025"]);
        let widths: Vec<f32> = plan.cells.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![150.0, 155.0, 155.0]);
    }
}
