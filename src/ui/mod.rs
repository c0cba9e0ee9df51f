pub mod chart_panel;
pub mod editor;
pub mod grid_panel;
pub mod sync;
pub mod theme;
pub mod widget;

pub use widget::{GanttChart, GanttResponse};
