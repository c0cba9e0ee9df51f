use chrono::{Duration, Local, NaiveDate};

use crate::model::Task;

/// Pixels added or removed per zoom click.
pub const ZOOM_STEP: f32 = 10.0;

/// Smallest day width the zoom-out control allows. Zoom-to-fit may go
/// below this to get the whole window on screen.
pub const MIN_DAY_WIDTH: f32 = 10.0;

/// Which calendar unit the timeline header shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
}

impl ViewMode {
    /// Day width a view switch resets the zoom to.
    pub fn default_day_width(self) -> f32 {
        match self {
            ViewMode::Day => 50.0,
            ViewMode::Week => 15.0,
            ViewMode::Month => 5.0,
        }
    }
}

/// The shared date-to-pixel mapping.
///
/// Painted geometry and drag math must go through the same scale within a
/// frame; with diverging windows or day widths, bars would jump under the
/// pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    /// First day of the padded project window.
    pub window_start: NaiveDate,
    /// Last day of the padded project window, inclusive.
    pub window_end: NaiveDate,
    /// Pixels per day.
    pub day_width: f32,
}

impl TimeScale {
    /// Window covering every task, padded a week on each side. With no
    /// tasks, today plus thirty days, unpadded.
    pub fn compute(tasks: &[Task], day_width: f32) -> Self {
        let extent = tasks
            .iter()
            .map(|t| t.start)
            .min()
            .zip(tasks.iter().map(|t| t.end).max());
        let (window_start, window_end) = match extent {
            Some((min, max)) => (min - Duration::days(7), max + Duration::days(7)),
            None => {
                let today = Local::now().date_naive();
                (today, today + Duration::days(30))
            }
        };
        Self {
            window_start,
            window_end,
            day_width,
        }
    }

    /// Pixel offset of a date from the window's left edge.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        (date - self.window_start).num_days() as f32 * self.day_width
    }

    /// Inverse of [`date_to_x`](Self::date_to_x), rounding to the nearest
    /// whole day.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        self.window_start + Duration::days((x / self.day_width).round() as i64)
    }

    /// Pixel width of a task's bar. The end day is worked, so a same-day
    /// task is one day wide.
    pub fn bar_width(&self, task: &Task) -> f32 {
        (task.duration_days() + 1) as f32 * self.day_width
    }

    /// Days from window start to window end, end day excluded.
    pub fn window_days(&self) -> i64 {
        (self.window_end - self.window_start).num_days()
    }
}

/// Zoom step for the + control.
pub fn zoom_in(day_width: f32) -> f32 {
    day_width + ZOOM_STEP
}

/// Zoom step for the − control, clamped so day cells never collapse.
pub fn zoom_out(day_width: f32) -> f32 {
    (day_width - ZOOM_STEP).max(MIN_DAY_WIDTH)
}

/// Day width at which the whole window spans `visible_width` pixels, or
/// `None` when the window has no extent.
pub fn zoom_to_fit(visible_width: f32, scale: &TimeScale) -> Option<f32> {
    let days = scale.window_days();
    (days > 0).then(|| visible_width / days as f32)
}
