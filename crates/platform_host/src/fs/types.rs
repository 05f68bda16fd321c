//! File-system data types shared by the store, notifier, and facade.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// File-system entry kind.
pub enum NodeKind {
    /// Leaf entry with a content record.
    File,
    /// Directory entry with an ordered child list.
    Folder,
}

impl NodeKind {
    /// Returns the stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry in the virtual file-system tree, persisted in the metadata namespace.
pub struct FsNode {
    /// Absolute `/`-delimited path; unique key.
    pub path: String,
    /// File or folder.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Child paths in listing order. Present only for folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl FsNode {
    /// Builds a node of `kind` at `path`, with an empty child list for folders.
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            children: match kind {
                NodeKind::File => None,
                NodeKind::Folder => Some(Vec::new()),
            },
        }
    }

    /// Builds an empty folder node.
    pub fn folder(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::Folder)
    }

    /// Builds a file node.
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::File)
    }

    /// Returns `true` for folders.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Returns `true` for files.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Child paths (empty for files).
    pub fn child_paths(&self) -> &[String] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Directory-change event delivered to observers.
pub enum FsEvent {
    /// A node was created in the observed directory.
    Created,
    /// A node was deleted from the observed directory.
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`write_file`](super::service::FileSystemService::write_file).
pub enum WriteOutcome {
    /// No node existed; a file node was created before the content was stored.
    Created(FsNode),
    /// An existing file's content was replaced.
    Overwritten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`rename_node`](super::service::FileSystemService::rename_node).
pub struct RenamedNode {
    /// Node removed from the old path, as it was before removal.
    pub from: FsNode,
    /// Fresh node created at the new path.
    pub to: FsNode,
}
