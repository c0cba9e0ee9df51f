use serde::{Deserialize, Serialize};

/// How a grid column takes its width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnWidth {
    /// Fixed pixel width.
    Fixed(f32),
    /// Grows into leftover panel space, starting from this basis width.
    Flex(f32),
}

/// What a column holds, which controls both cell formatting and the editor
/// field generated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// 1-based row number; never editable.
    Index,
    Text,
    Date,
    Number,
    /// Number rendered as "42%", edited on a 0–100 scale.
    Percent,
    /// List of ids resolved against an options source.
    MultiSelect,
}

/// Descriptor for one column of the task grid.
///
/// `id` names the task field the column reads: a known field (`name`,
/// `start`, `end`, `progress`, `assignedUser`) or a key into the task's
/// custom map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub kind: ColumnKind,
    pub width: ColumnWidth,
    /// Where a multi-select column finds its options. `"resources"` is the
    /// only source the widget resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_source: Option<String>,
}

impl Column {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ColumnKind,
        width: ColumnWidth,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            width,
            options_source: None,
        }
    }

    /// Point a multi-select column at an options list.
    pub fn with_options_source(mut self, source: impl Into<String>) -> Self {
        self.options_source = Some(source.into());
        self
    }
}

/// The column set used when the host does not supply one.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Task Name", ColumnKind::Text, ColumnWidth::Flex(220.0)),
        Column::new("start", "Start Date", ColumnKind::Date, ColumnWidth::Fixed(90.0)),
        Column::new("end", "End Date", ColumnKind::Date, ColumnWidth::Fixed(90.0)),
        Column::new(
            "assignedUser",
            "Assignees",
            ColumnKind::MultiSelect,
            ColumnWidth::Fixed(120.0),
        )
        .with_options_source("resources"),
    ]
}
