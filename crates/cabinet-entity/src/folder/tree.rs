//! Folder tree structures for hierarchical display.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::model::Folder;

/// A node in a user's folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder at this node.
    pub folder: Folder,
    /// Child folder nodes, in id order.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Assemble a forest from a flat list of one user's folders.
    ///
    /// Folders whose parent is missing from `folders` are treated as roots.
    /// Input order is preserved among siblings.
    pub fn build_forest(folders: Vec<Folder>) -> Vec<FolderNode> {
        let known: HashSet<i64> = folders.iter().map(|f| f.id).collect();
        let mut by_parent: HashMap<Option<i64>, Vec<Folder>> = HashMap::new();
        for folder in folders {
            let parent = folder.parent_folder_id.filter(|p| known.contains(p));
            by_parent.entry(parent).or_default().push(folder);
        }
        Self::attach(None, &mut by_parent)
    }

    fn attach(
        parent: Option<i64>,
        by_parent: &mut HashMap<Option<i64>, Vec<Folder>>,
    ) -> Vec<FolderNode> {
        let Some(level) = by_parent.remove(&parent) else {
            return Vec::new();
        };
        level
            .into_iter()
            .map(|folder| {
                let children = Self::attach(Some(folder.id), by_parent);
                FolderNode { folder, children }
            })
            .collect()
    }

    /// Total number of folders in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FolderNode::count).sum::<usize>()
    }
}
