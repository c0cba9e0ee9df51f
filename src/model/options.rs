use serde::{Deserialize, Serialize};

use super::column::Column;
use super::task::ResourceId;
use crate::form::FormSchema;

/// An assignable person or thing, resolved by multi-select columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

impl Resource {
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Interactive affordances that can be switched off per embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub zoom: bool,
    pub view_modes: bool,
    pub column_resize: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            zoom: true,
            view_modes: true,
            column_resize: true,
        }
    }
}

/// The built-in visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Light palette with compact 32 px rows.
    Narrow,
}

/// Everything configurable about a chart, fixed at construction except the
/// theme and column widths.
#[derive(Debug, Clone, Default)]
pub struct GanttOptions {
    pub features: Features,
    /// `None` uses [`default_columns`](super::column::default_columns).
    pub columns: Option<Vec<Column>>,
    pub resources: Vec<Resource>,
    /// Replaces the editor form generated from the columns.
    pub modal_schema: Option<FormSchema>,
    pub theme: Theme,
}

impl GanttOptions {
    pub fn resource_name(&self, id: ResourceId) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }
}
