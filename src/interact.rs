use chrono::{Duration, NaiveDate};

use crate::layout::MIN_COLUMN_WIDTH;
use crate::model::TaskId;

/// Context captured at pointer-down on a task bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGrab {
    pub task: TaskId,
    /// The task's dates when the drag began; every move is computed from
    /// these, not from the last move's result.
    pub origin_start: NaiveDate,
    pub origin_end: NaiveDate,
    pub pointer_x: f32,
}

/// Context captured at pointer-down on a column-header resizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGrab {
    pub column: usize,
    pub start_width: f32,
    pub pointer_x: f32,
}

/// The pointer-drag state machine. At most one drag runs at a time, and
/// each dragging state carries the context captured at pointer-down, so no
/// two flags can ever disagree about what is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving a whole bar; start and end shift together.
    DragBar(BarGrab),
    /// Dragging a bar's right-edge handle; start stays put.
    ResizeBar(BarGrab),
    /// Dragging the divider between the grid and chart panels.
    ResizePanel,
    /// Dragging a column-header resizer.
    ResizeColumn(ColumnGrab),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Enter a drag from pointer-down. Ignored unless currently idle.
    pub fn begin(&mut self, next: Interaction) {
        if self.is_idle() {
            *self = next;
        }
    }

    /// Pointer released: return to idle, handing back whichever drag was
    /// running so the caller can commit it.
    pub fn finish(&mut self) -> Interaction {
        std::mem::take(self)
    }
}

/// Whole days a horizontal pointer movement amounts to at the given zoom.
pub fn delta_days(delta_x: f32, day_width: f32) -> i64 {
    (delta_x / day_width).round() as i64
}

/// Dates for a whole-bar move: both ends shift by the pointer's day delta.
pub fn moved_dates(grab: &BarGrab, pointer_x: f32, day_width: f32) -> (NaiveDate, NaiveDate) {
    let days = delta_days(pointer_x - grab.pointer_x, day_width);
    (
        grab.origin_start + Duration::days(days),
        grab.origin_end + Duration::days(days),
    )
}

/// End date for a right-edge resize, clamped so the end never crosses the
/// start.
pub fn resized_end(grab: &BarGrab, pointer_x: f32, day_width: f32) -> NaiveDate {
    let days = delta_days(pointer_x - grab.pointer_x, day_width);
    (grab.origin_end + Duration::days(days)).max(grab.origin_start)
}

/// Fixed width for a column resize, floored at [`MIN_COLUMN_WIDTH`].
pub fn resized_column_width(grab: &ColumnGrab, pointer_x: f32) -> f32 {
    (grab.start_width + pointer_x - grab.pointer_x).max(MIN_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn grab() -> BarGrab {
        BarGrab {
            task: 1,
            origin_start: d("2025-06-10"),
            origin_end: d("2025-06-12"),
            pointer_x: 400.0,
        }
    }

    // --- delta math ---

    #[test]
    fn test_delta_days_rounds_to_nearest() {
        assert_eq!(delta_days(24.0, 50.0), 0);
        assert_eq!(delta_days(26.0, 50.0), 1);
        assert_eq!(delta_days(-26.0, 50.0), -1);
        assert_eq!(delta_days(149.0, 50.0), 3);
    }

    #[test]
    fn test_move_shifts_both_dates() {
        let (start, end) = moved_dates(&grab(), 505.0, 50.0);
        assert_eq!(start, d("2025-06-12"));
        assert_eq!(end, d("2025-06-14"));
    }

    #[test]
    fn test_move_back_in_time() {
        let (start, end) = moved_dates(&grab(), 295.0, 50.0);
        assert_eq!(start, d("2025-06-08"));
        assert_eq!(end, d("2025-06-10"));
    }

    #[test]
    fn test_zero_delta_keeps_dates() {
        let (start, end) = moved_dates(&grab(), 400.0, 50.0);
        assert_eq!(start, d("2025-06-10"));
        assert_eq!(end, d("2025-06-12"));
    }

    #[test]
    fn test_resize_moves_only_end() {
        assert_eq!(resized_end(&grab(), 505.0, 50.0), d("2025-06-14"));
    }

    #[test]
    fn test_resize_clamps_end_to_start() {
        assert_eq!(resized_end(&grab(), 100.0, 50.0), d("2025-06-10"));
    }

    #[test]
    fn test_column_resize_floors_at_minimum() {
        let grab = ColumnGrab {
            column: 1,
            start_width: 90.0,
            pointer_x: 200.0,
        };
        assert_eq!(resized_column_width(&grab, 230.0), 120.0);
        assert_eq!(resized_column_width(&grab, 20.0), MIN_COLUMN_WIDTH);
    }

    // --- state machine ---

    #[test]
    fn test_begin_only_from_idle() {
        let mut state = Interaction::Idle;
        state.begin(Interaction::DragBar(grab()));
        assert_eq!(state, Interaction::DragBar(grab()));
        state.begin(Interaction::ResizePanel);
        assert_eq!(state, Interaction::DragBar(grab()));
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let mut state = Interaction::ResizeBar(grab());
        let finished = state.finish();
        assert_eq!(finished, Interaction::ResizeBar(grab()));
        assert!(state.is_idle());
    }
}
