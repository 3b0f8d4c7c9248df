//! Category forest construction and reparent validation.
//!
//! Categories are stored flat with a `parent_id` pointer. The owner dashboard
//! needs them as a nested forest, and updates that move a category must never
//! introduce a cycle.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Anything that can be placed in a parent/child forest.
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// A node of the nested forest. The item's own fields are flattened next to
/// `children` when serialized.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Build a nested forest from a flat list of items.
///
/// - Roots are items with no parent, plus items whose parent is not in the
///   list (orphans left behind by a deleted parent are surfaced as roots).
/// - Children keep the order in which they appear in `items`.
/// - Every item appears exactly once. Items caught in a parent cycle (which
///   validated writes never produce) are promoted to roots at the first member
///   of the cycle.
///
/// Runs in O(n): one pass to index, one pass to attach.
pub fn build_category_tree<T: TreeItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let ids: HashSet<DbId> = items.iter().map(TreeItem::id).collect();

    let mut children_of: HashMap<DbId, Vec<usize>> = HashMap::new();
    let mut root_indices = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match item.parent_id() {
            Some(parent) if parent != item.id() && ids.contains(&parent) => {
                children_of.entry(parent).or_default().push(idx);
            }
            _ => root_indices.push(idx),
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut forest: Vec<TreeNode<T>> = root_indices
        .into_iter()
        .filter_map(|idx| attach(idx, &mut slots, &children_of))
        .collect();

    // Anything still in a slot is part of a cycle with no way up to a root.
    for idx in 0..slots.len() {
        if let Some(node) = attach(idx, &mut slots, &children_of) {
            forest.push(node);
        }
    }

    forest
}

fn attach<T: TreeItem>(
    idx: usize,
    slots: &mut [Option<T>],
    children_of: &HashMap<DbId, Vec<usize>>,
) -> Option<TreeNode<T>> {
    let item = slots.get_mut(idx)?.take()?;
    let children = children_of
        .get(&item.id())
        .map(|indices| {
            indices
                .iter()
                .filter_map(|&child| attach(child, slots, children_of))
                .collect()
        })
        .unwrap_or_default();
    Some(TreeNode { item, children })
}

/// Check that moving `category_id` under `new_parent` keeps the forest acyclic.
///
/// `parents` maps every category the caller owns to its current parent. The
/// new parent must be one of those categories, must not be the category
/// itself, and must not be one of its descendants.
pub fn validate_reparent(
    category_id: DbId,
    new_parent: Option<DbId>,
    parents: &HashMap<DbId, Option<DbId>>,
) -> Result<(), CoreError> {
    let Some(new_parent) = new_parent else {
        return Ok(());
    };

    if new_parent == category_id {
        return Err(CoreError::Validation(
            "a category cannot be its own parent".into(),
        ));
    }

    if !parents.contains_key(&new_parent) {
        return Err(CoreError::NotFound {
            entity: "Category",
            id: new_parent,
        });
    }

    let mut seen = HashSet::new();
    let mut cursor = Some(new_parent);
    while let Some(current) = cursor {
        if current == category_id {
            return Err(CoreError::Validation(format!(
                "moving category {category_id} under {new_parent} would create a cycle"
            )));
        }
        if !seen.insert(current) {
            break;
        }
        cursor = parents.get(&current).copied().flatten();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct Node {
        id: DbId,
        parent_id: Option<DbId>,
    }

    impl TreeItem for Node {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
    }

    fn node(id: DbId, parent_id: Option<DbId>) -> Node {
        Node { id, parent_id }
    }

    fn subtree_size(node: &TreeNode<Node>) -> usize {
        1 + node.children.iter().map(subtree_size).sum::<usize>()
    }

    fn ids(forest: &[TreeNode<Node>]) -> Vec<DbId> {
        forest.iter().map(|n| n.item.id).collect()
    }

    #[test]
    fn empty_input_gives_empty_forest() {
        assert!(build_category_tree(Vec::<Node>::new()).is_empty());
    }

    #[test]
    fn nests_children_to_full_depth() {
        let forest = build_category_tree(vec![
            node(1, None),
            node(2, Some(1)),
            node(3, Some(2)),
            node(4, None),
        ]);

        assert_eq!(ids(&forest), vec![1, 4]);
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![3]);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn children_keep_input_order() {
        let forest = build_category_tree(vec![
            node(10, Some(1)),
            node(1, None),
            node(5, Some(1)),
            node(7, Some(1)),
        ]);
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![10, 5, 7]);
    }

    #[test]
    fn orphans_are_promoted_to_roots() {
        let forest = build_category_tree(vec![node(2, Some(99)), node(3, Some(2))]);
        assert_eq!(ids(&forest), vec![2]);
        assert_eq!(ids(&forest[0].children), vec![3]);
    }

    #[test]
    fn every_item_appears_exactly_once() {
        let items = vec![
            node(1, None),
            node(2, Some(1)),
            node(3, Some(1)),
            node(4, Some(3)),
            node(5, Some(42)),
            node(6, Some(6)),
            node(7, Some(8)),
            node(8, Some(7)),
        ];
        let count = items.len();
        let forest = build_category_tree(items);
        let total: usize = forest.iter().map(subtree_size).sum();
        assert_eq!(total, count);
    }

    #[test]
    fn serializes_item_fields_next_to_children() {
        let forest = build_category_tree(vec![node(1, None), node(2, Some(1))]);
        let json = serde_json::to_value(&forest).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["children"][0]["id"], 2);
        assert_eq!(json[0]["children"][0]["children"], serde_json::json!([]));
    }

    fn parents() -> HashMap<DbId, Option<DbId>> {
        // 1 -> 2 -> 3, and a separate root 4
        HashMap::from([(1, None), (2, Some(1)), (3, Some(2)), (4, None)])
    }

    #[test]
    fn reparent_to_unrelated_category_is_allowed() {
        assert!(validate_reparent(3, Some(4), &parents()).is_ok());
        assert!(validate_reparent(2, None, &parents()).is_ok());
        assert!(validate_reparent(4, Some(3), &parents()).is_ok());
    }

    #[test]
    fn reparent_to_self_is_rejected() {
        assert_matches!(
            validate_reparent(2, Some(2), &parents()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn reparent_under_descendant_is_rejected() {
        assert_matches!(
            validate_reparent(1, Some(3), &parents()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn reparent_to_foreign_category_is_not_found() {
        assert_matches!(
            validate_reparent(1, Some(77), &parents()),
            Err(CoreError::NotFound { id: 77, .. })
        );
    }
}
