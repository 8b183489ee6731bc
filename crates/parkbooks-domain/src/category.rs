//! Domain types for the hierarchical chart of accounts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Deepest level a category may occupy (root is level 1).
pub const MAX_CATEGORY_LEVEL: u8 = 5;

/// A node in the chart-of-accounts tree.
///
/// `code` encodes the tree position (`"A"`, `"A-1"`, `"A-1-1"`); `full_path`
/// caches the dotted ancestor chain (`"A.A-1.A-1-1"`) for display and lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: u8,
    pub parent_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
    pub nature: AccountNature,
    pub full_path: String,
    #[serde(default)]
    pub sort_order: u32,
    pub is_active: bool,
}

impl Category {
    /// Creates a root (level-1) category whose path is its own code.
    pub fn root(code: impl Into<String>, name: impl Into<String>, nature: AccountNature) -> Self {
        let code = code.into();
        Self {
            id: Uuid::new_v4(),
            full_path: code.clone(),
            code,
            name: name.into(),
            description: None,
            level: 1,
            parent_id: None,
            fiscal_code: None,
            nature,
            sort_order: 0,
            is_active: true,
        }
    }

    /// Creates a child one level below `parent`, inheriting its nature.
    pub fn child_of(parent: &Category, code: impl Into<String>, name: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: Uuid::new_v4(),
            full_path: format!("{}.{}", parent.full_path, code),
            code,
            name: name.into(),
            description: None,
            level: parent.level + 1,
            parent_id: Some(parent.id),
            fiscal_code: None,
            nature: parent.nature,
            sort_order: 0,
            is_active: true,
        }
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_fiscal_code(mut self, fiscal_code: impl Into<String>) -> Self {
        self.fiscal_code = Some(fiscal_code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Depth implied by the code itself: one more than its hyphen count.
    pub fn level_from_code(code: &str) -> u8 {
        (code.matches('-').count() + 1) as u8
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}
