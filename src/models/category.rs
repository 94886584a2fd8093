//! Category tree model.

use serde::{Deserialize, Serialize};

/// A node in the category forest
///
/// `children` are owned by their parent; `parent_id` is only a back reference.
/// `product_count` is filled in on read and is never part of the stored catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub children: Vec<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
}

impl Category {
    /// Create a root category
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parent_id: None,
            children: Vec::new(),
            product_count: None,
        }
    }

    /// Attach a child, setting its back reference to this category
    pub fn with_child(mut self, mut child: Category) -> Self {
        child.parent_id = Some(self.id.clone());
        self.children.push(child);
        self
    }

    /// Depth-first search of this subtree
    pub fn find(&self, id: &str) -> Option<&Category> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Visit every node of this subtree, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Category)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
