pub mod column;
pub mod options;
pub mod task;

pub use column::{default_columns, Column, ColumnKind, ColumnWidth};
pub use options::{Features, GanttOptions, Resource, Theme};
pub use task::{next_task_id, scrub_references, ResourceId, Task, TaskId, TaskPatch};
