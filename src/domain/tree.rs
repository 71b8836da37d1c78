use crate::error::{Result, SweepError};
use std::cmp::Ordering;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Handle to a node stored in a [`PathTree`].
///
/// Handles are plain arena indices: they never own the node and stay valid for the
/// lifetime of the tree because nodes are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One path segment of the scanned hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub path: PathBuf,
    /// Display name; lossy for names that are not valid UTF-8.
    pub name: String,
    /// Bytes of the matched target directory itself; zero for intermediate segments.
    pub size: u64,
    pub selected: bool,
    pub deleted: bool,
    pub expanded: bool,
    /// Last sibling under its parent, refreshed by the flattener.
    pub is_last: bool,
    /// Message from the most recent failed removal attempt.
    pub last_error: Option<String>,
    segment: OsString,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(path: PathBuf, segment: OsString, parent: Option<NodeId>) -> Self {
        Self {
            path,
            name: segment.to_string_lossy().into_owned(),
            size: 0,
            selected: false,
            deleted: false,
            expanded: true,
            is_last: false,
            last_error: None,
            segment,
            parent,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this node is a matched target that a deletion may remove.
    pub fn is_deletable(&self) -> bool {
        self.selected && !self.deleted && self.size > 0
    }
}

/// Arena-backed directory hierarchy rooted at the scan root.
///
/// The root node is synthetic: it has no name, is never selected and is excluded from
/// flattening and depth counting. Ownership runs strictly root to leaf through the arena;
/// parent handles are only used for upward walks.
#[derive(Debug, Clone)]
pub struct PathTree {
    root_path: PathBuf,
    nodes: Vec<TreeNode>,
}

impl PathTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let root = TreeNode::new(root_path.clone(), OsString::new(), None);
        Self {
            root_path,
            nodes: vec![root],
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Number of real nodes, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every real node in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Looks up the node for an absolute path.
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        let segments = self.segments(path).ok()?;
        let mut current = Self::ROOT;
        for segment in segments {
            current = self.child_named(current, &segment)?;
        }
        Some(current)
    }

    /// Inserts a discovered target directory, creating intermediate segments as needed.
    ///
    /// Re-inserting an existing path only overwrites its size. Every sibling list along the
    /// inserted path is re-sorted so display order does not depend on discovery order.
    pub fn insert_path(&mut self, full_path: &Path, size: u64) -> Result<NodeId> {
        let segments = self.segments(full_path)?;

        let mut current = Self::ROOT;
        let mut current_path = self.root_path.clone();
        for segment in segments {
            current_path.push(&segment);
            current = match self.child_named(current, &segment) {
                Some(child) => child,
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(TreeNode::new(current_path.clone(), segment, Some(current)));
                    self.nodes[current.0].children.push(id);
                    id
                }
            };
        }

        self.nodes[current.0].size = size;

        let mut cursor = self.nodes[current.0].parent;
        while let Some(parent) = cursor {
            self.sort_children(parent);
            cursor = self.nodes[parent.0].parent;
        }

        Ok(current)
    }

    /// Splits an absolute path into the segments below the scan root.
    fn segments(&self, full_path: &Path) -> Result<Vec<OsString>> {
        let outside = || SweepError::OutsideRoot {
            path: full_path.to_path_buf(),
            root: self.root_path.clone(),
        };

        let relative = full_path.strip_prefix(&self.root_path).map_err(|_| outside())?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_os_string()),
                Component::CurDir => {}
                _ => return Err(outside()),
            }
        }

        if segments.is_empty() {
            return Err(outside());
        }
        Ok(segments)
    }

    fn child_named(&self, parent: NodeId, segment: &OsStr) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].segment == segment)
    }

    /// Orders children by aggregate size descending, then name ascending.
    fn sort_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        let mut keyed: Vec<(u64, NodeId)> = children
            .into_iter()
            .map(|c| (self.aggregate_size(c), c))
            .collect();
        keyed.sort_by(|(size_a, a), (size_b, b)| match size_b.cmp(size_a) {
            Ordering::Equal => self.nodes[a.0].segment.cmp(&self.nodes[b.0].segment),
            other => other,
        });
        self.nodes[parent.0].children = keyed.into_iter().map(|(_, c)| c).collect();
    }

    /// Own size plus the sizes of every descendant, deleted or not.
    pub fn aggregate_size(&self, id: NodeId) -> u64 {
        let node = &self.nodes[id.0];
        node.size
            + node
                .children
                .iter()
                .map(|&c| self.aggregate_size(c))
                .sum::<u64>()
    }

    /// Number of real ancestors; top-level segments have depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Real ancestors of a node, outermost first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes[id.0].parent;
        while let Some(parent) = cursor {
            if parent == Self::ROOT {
                break;
            }
            chain.push(parent);
            cursor = self.nodes[parent.0].parent;
        }
        chain.reverse();
        chain
    }

    /// Flips selection on a node, cascades it down and re-derives ancestor state.
    ///
    /// Deleted nodes and the root are ignored.
    pub fn toggle_select(&mut self, id: NodeId) {
        if id == Self::ROOT || self.nodes[id.0].deleted {
            return;
        }
        let selected = !self.nodes[id.0].selected;
        self.set_selection_down(id, selected);
        self.refresh_ancestors(id);
    }

    fn set_selection_down(&mut self, id: NodeId, selected: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.nodes[current.0].selected = selected;
            for &child in &self.nodes[current.0].children {
                if !self.nodes[child.0].deleted {
                    stack.push(child);
                }
            }
        }
    }

    /// An ancestor is selected iff it has live children and all of them are selected.
    fn refresh_ancestors(&mut self, id: NodeId) {
        let mut cursor = self.nodes[id.0].parent;
        while let Some(parent) = cursor {
            if parent == Self::ROOT {
                break;
            }
            let mut any_live = false;
            let mut all_selected = true;
            for &child in &self.nodes[parent.0].children {
                let child = &self.nodes[child.0];
                if child.deleted {
                    continue;
                }
                any_live = true;
                all_selected &= child.selected;
            }
            self.nodes[parent.0].selected = any_live && all_selected;
            cursor = self.nodes[parent.0].parent;
        }
    }

    /// True when some but not all live children are selected or themselves partial.
    pub fn has_partial_selection(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            return false;
        }

        let mut total = 0;
        let mut marked = 0;
        for &child in &node.children {
            if self.nodes[child.0].deleted {
                continue;
            }
            total += 1;
            if self.nodes[child.0].selected || self.has_partial_selection(child) {
                marked += 1;
            }
        }
        marked > 0 && marked < total
    }

    /// Selects every live visible node, or deselects them all if they already are.
    ///
    /// Returns the value that was applied.
    pub fn toggle_select_all(&mut self, visible: &[NodeId]) -> bool {
        let all_selected = visible
            .iter()
            .map(|&id| &self.nodes[id.0])
            .filter(|node| !node.deleted)
            .all(|node| node.selected);

        let target = !all_selected;
        for &id in visible {
            let node = &mut self.nodes[id.0];
            if !node.deleted {
                node.selected = target;
            }
        }
        target
    }

    /// Flips expansion; nodes without children stay as they are.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if node.children.is_empty() {
            return false;
        }
        node.expanded = !node.expanded;
        true
    }

    /// Records a successful removal. Deletion is permanent for the node.
    pub fn mark_deleted(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.deleted = true;
        node.selected = false;
        node.last_error = None;
        self.refresh_ancestors(id);
    }

    /// Records a failed removal, leaving selection untouched so it can be retried.
    pub fn mark_failed(&mut self, id: NodeId, message: String) {
        self.nodes[id.0].last_error = Some(message);
    }

    /// Total bytes of every live target directory in the tree.
    pub fn live_target_size(&self) -> u64 {
        self.iter()
            .filter(|(_, node)| !node.deleted && node.size > 0)
            .map(|(_, node)| node.size)
            .sum()
    }
}
