use super::tree::{NodeId, PathTree};

/// Produces the depth-first, expansion-aware list of visible nodes.
///
/// The synthetic root is never part of the list. Children of collapsed nodes are skipped,
/// but `is_last` is refreshed on every node so connectors stay correct after re-expanding.
pub fn rebuild(tree: &mut PathTree) -> Vec<NodeId> {
    refresh_last_flags(tree);

    let mut visible = Vec::with_capacity(tree.len());
    let mut stack: Vec<NodeId> = tree.node(PathTree::ROOT).children().to_vec();
    stack.reverse();

    while let Some(id) = stack.pop() {
        visible.push(id);
        let node = tree.node(id);
        if node.expanded {
            stack.extend(node.children().iter().rev().copied());
        }
    }

    visible
}

fn refresh_last_flags(tree: &mut PathTree) {
    let mut pending = vec![PathTree::ROOT];
    while let Some(parent) = pending.pop() {
        let children = tree.node(parent).children().to_vec();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            tree.node_mut(child).is_last = i + 1 == count;
            pending.push(child);
        }
    }
}

/// Keeps a cursor inside `[0, len - 1]`, or at 0 for an empty list.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/work")
    }

    fn scenario() -> PathTree {
        let mut tree = PathTree::new(root());
        tree.insert_path(&root().join("a/node_modules"), 100).unwrap();
        tree.insert_path(&root().join("a/b/node_modules"), 50).unwrap();
        tree.insert_path(&root().join("c/node_modules"), 10).unwrap();
        tree
    }

    fn names(tree: &PathTree, list: &[NodeId]) -> Vec<String> {
        list.iter()
            .map(|&id| {
                tree.node(id)
                    .path
                    .strip_prefix(root())
                    .unwrap()
                    .display()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_rebuild_is_preorder_by_sorted_children() {
        let mut tree = scenario();
        let list = rebuild(&mut tree);

        assert_eq!(
            names(&tree, &list),
            vec![
                "a",
                "a/node_modules",
                "a/b",
                "a/b/node_modules",
                "c",
                "c/node_modules"
            ]
        );
    }

    #[test]
    fn test_rebuild_empty_tree() {
        let mut tree = PathTree::new(root());
        assert!(rebuild(&mut tree).is_empty());
    }

    #[test]
    fn test_collapse_hides_descendants_and_expand_restores() {
        let mut tree = scenario();
        let before = rebuild(&mut tree);

        let a = tree.find(&root().join("a")).unwrap();
        tree.toggle_expanded(a);
        let collapsed = rebuild(&mut tree);
        assert_eq!(names(&tree, &collapsed), vec!["a", "c", "c/node_modules"]);

        tree.toggle_expanded(a);
        let restored = rebuild(&mut tree);
        assert_eq!(restored, before);
    }

    #[test]
    fn test_is_last_flags() {
        let mut tree = scenario();
        rebuild(&mut tree);

        let flag = |rel: &str| tree.node(tree.find(&root().join(rel)).unwrap()).is_last;
        assert!(!flag("a"));
        assert!(flag("c"));
        assert!(!flag("a/node_modules"));
        assert!(flag("a/b"));
        assert!(flag("a/b/node_modules"));
    }

    #[test]
    fn test_deleted_nodes_stay_in_place() {
        let mut tree = scenario();
        let before = rebuild(&mut tree);

        let nm = tree.find(&root().join("a/node_modules")).unwrap();
        tree.mark_deleted(nm);
        let after = rebuild(&mut tree);

        assert_eq!(before, after);
    }

    #[test]
    fn test_clamp_cursor() {
        assert_eq!(clamp_cursor(5, 0), 0);
        assert_eq!(clamp_cursor(5, 3), 2);
        assert_eq!(clamp_cursor(1, 3), 1);
    }
}
