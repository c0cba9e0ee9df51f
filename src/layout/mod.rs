pub mod grid;
pub mod outline;
pub mod plan;
pub mod scale;

pub use grid::{cell_text, resolve_widths, LEVEL_INDENT, MIN_COLUMN_WIDTH};
pub use outline::{flatten, OutlineRow};
pub use plan::{BarPlan, ChartPlan, HeaderCell, LinkPlan, PathSeg};
pub use scale::{zoom_in, zoom_out, zoom_to_fit, TimeScale, ViewMode};
