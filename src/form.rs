use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{Column, ColumnKind};

/// How an editor field renders and what it parses back to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Date,
    Number { min: f64, max: f64 },
}

/// One field of the task editor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Task field the value is read from and written back to.
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    /// Required fields block saving while empty.
    pub required: bool,
}

/// Declarative description of the task editor: which scalar fields exist,
/// which relationship selectors to offer, and whether deleting is allowed.
/// Hosts can supply their own through
/// [`GanttOptions::modal_schema`](crate::model::GanttOptions); anything a
/// schema omits is simply not edited.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
    /// The parent selector is always offered by the generated schema.
    pub parent_select: bool,
    pub assignee_select: bool,
    pub dependency_select: bool,
    pub allow_delete: bool,
}

/// Fields the relationship selectors cover; they never render as scalar
/// inputs even when a column exists for them.
const RELATION_IDS: [&str; 3] = ["parent", "assignedUser", "dependencies"];

impl FormSchema {
    /// Derive the editor schema from the column descriptors: one scalar
    /// field per column except the row index and the relationship columns,
    /// with name and both dates required. Relationship selectors appear
    /// when their column does, except the parent selector, which is always
    /// present.
    pub fn from_columns(columns: &[Column]) -> Self {
        let mut fields = Vec::new();
        for column in columns {
            if column.kind == ColumnKind::Index || RELATION_IDS.contains(&column.id.as_str()) {
                continue;
            }
            let kind = match column.kind {
                ColumnKind::Date => FieldKind::Date,
                ColumnKind::Number | ColumnKind::Percent => FieldKind::Number {
                    min: 0.0,
                    max: 100.0,
                },
                _ => FieldKind::Text,
            };
            fields.push(FieldSpec {
                id: column.id.clone(),
                label: column.title.clone(),
                kind,
                required: matches!(column.id.as_str(), "name" | "start" | "end"),
            });
        }
        Self {
            fields,
            parent_select: true,
            assignee_select: columns.iter().any(|c| c.id == "assignedUser"),
            dependency_select: columns.iter().any(|c| c.id == "dependencies"),
            allow_delete: true,
        }
    }

    /// Labels of required fields whose current value is empty. Saving is
    /// blocked until this comes back empty.
    pub fn missing_required(&self, values: &BTreeMap<String, FieldValue>) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required && values.get(&f.id).map_or(true, FieldValue::is_empty))
            .map(|f| f.label.as_str())
            .collect()
    }
}

/// A field's current editor value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Number(f64),
}

impl FieldValue {
    /// Only text can be empty; a date picker and a slider always hold a
    /// value.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    pub fn default_for(kind: FieldKind, today: NaiveDate) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Date => FieldValue::Date(today),
            FieldKind::Number { min, .. } => FieldValue::Number(min),
        }
    }
}
