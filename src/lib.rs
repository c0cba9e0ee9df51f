//! A Gantt chart widget for [egui](https://github.com/emilk/egui).
//!
//! Two synced panes over one task list: a spreadsheet-like grid on the
//! left, a zoomable timeline with draggable bars and dependency arrows on
//! the right. Tasks nest by parent id and are edited in place through a
//! modal form; every mutation is reported to the host as a
//! [`GanttEvent`].
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use egui_gantt::{GanttChart, GanttOptions, Task};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
//! let mut chart = GanttChart::new(
//!     vec![Task::new(1, "Kickoff", start, end)],
//!     GanttOptions::default(),
//! );
//! chart.on_event(|event| println!("{event:?}"));
//! // then, inside your update loop:
//! // chart.show(ui);
//! ```

pub mod event;
pub mod form;
pub mod interact;
pub mod io;
pub mod layout;
pub mod model;
pub mod ui;

pub use event::GanttEvent;
pub use form::{FieldKind, FieldSpec, FormSchema};
pub use layout::ViewMode;
pub use model::{
    default_columns, next_task_id, Column, ColumnKind, ColumnWidth, Features, GanttOptions,
    Resource, ResourceId, Task, TaskId, TaskPatch, Theme,
};
pub use ui::{GanttChart, GanttResponse};

/// Register the icon font the widget's buttons draw from. Call once when
/// the app starts, before the first frame.
pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
