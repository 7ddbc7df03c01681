// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling navigation with isolation.

use crate::tree::ControlTree;
use crate::types::{ControlFlags, FocusPosition, NodeId, ScrollDirection};

impl ControlTree {
    /// Move focus to the next focusable sibling in `direction`.
    ///
    /// `node` must be on the focus path. The request starts at the focused leaf:
    /// each level scans its children outward from its most recently focused
    /// index, skipping disabled children, and focuses the first one that accepts
    /// focus. A level that finds nothing passes the request to its parent,
    /// unless it is focused and isolating scroll, in which case the request is
    /// consumed there.
    ///
    /// A level's [`Control::on_scroll`](crate::Control::on_scroll) may take over
    /// the decision. After a successful move the level's
    /// [`Control::on_after_scroll`](crate::Control::on_after_scroll) runs.
    ///
    /// Returns `false` if the request reached a root unhandled.
    pub fn scroll(&mut self, node: NodeId, direction: ScrollDirection) -> bool {
        if !self.is_alive(node) {
            tracing::warn!(?node, "scroll: stale node");
            return false;
        }
        let leaf = match self.focused_leaf() {
            Some(leaf) if self.is_focused(node) => leaf,
            _ => {
                tracing::trace!(?node, "scroll ignored: node not focused");
                return false;
            }
        };
        let mut cur = leaf;
        loop {
            if self.scroll_children(cur, direction) {
                return true;
            }
            if self.is_focused(cur) && self.is_isolated(cur) {
                tracing::trace!(node = ?cur, ?direction, "scroll consumed by isolated node");
                return true;
            }
            match self.parent_of(cur) {
                Some(parent) => cur = parent,
                None => {
                    tracing::trace!(root = ?cur, ?direction, "scroll unhandled");
                    return false;
                }
            }
        }
    }

    /// Try to move focus among the children of `id`.
    fn scroll_children(&mut self, id: NodeId, direction: ScrollDirection) -> bool {
        if let Some(handled) = self
            .with_control(id, |c| c.on_scroll(id, direction))
            .flatten()
        {
            return handled;
        }
        let len = self.child_count(id);
        #[allow(
            clippy::cast_possible_wrap,
            reason = "child counts are far below isize::MAX."
        )]
        let start = self.focused_child_index(id).map_or(-1, |i| i as isize);
        let mut candidate = start + direction.delta();
        while let Ok(index) = usize::try_from(candidate) {
            if index >= len {
                break;
            }
            candidate += direction.delta();
            let child = self.node(id).children[index];
            if self
                .flags(child)
                .is_some_and(|f| f.contains(ControlFlags::DISABLED))
            {
                continue;
            }
            let position = self
                .with_control(child, |c| c.focus_position_on_scroll(direction))
                .unwrap_or(FocusPosition::MostRecent);
            if self.focus(child, position) {
                tracing::debug!(parent = ?id, ?child, index, "scrolled");
                self.with_control(id, |c| c.on_after_scroll(id, child, index));
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Control, ControlHandlers};
    use crate::testing::{new_log, recorded, recording_child, recording_node};
    use crate::types::LocalControl;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn with_children(tree: &mut ControlTree, parent: NodeId, n: usize) -> Vec<NodeId> {
        (0..n)
            .map(|_| {
                let c = tree.insert(LocalControl::default());
                tree.register(parent, c, None);
                c
            })
            .collect()
    }

    #[test]
    fn scroll_skips_disabled_and_bubbles_past_root() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let kids = with_children(&mut tree, r, 3);
        let (a, b, c) = (kids[0], kids[1], kids[2]);
        tree.set_disabled(c, true);

        tree.focus(r, FocusPosition::First);
        assert_eq!(tree.focus_path(), &[r, a]);

        assert!(tree.scroll(a, ScrollDirection::Forward));
        assert_eq!(tree.focus_path(), &[r, b]);

        assert!(!tree.scroll(b, ScrollDirection::Forward));
        assert_eq!(tree.focus_path(), &[r, b]);
    }

    #[test]
    fn isolated_node_consumes_scroll() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let r = recording_node(&mut tree, &log, "R");
        let a = recording_child(&mut tree, &log, r, "A");
        let b = tree.insert(LocalControl::with_flags(
            ControlFlags::VISIBLE | ControlFlags::ISOLATE_SCROLL,
        ));
        tree.register(r, b, None);
        let b1 = recording_child(&mut tree, &log, b, "B1");
        let c = recording_child(&mut tree, &log, r, "C");
        tree.focus(b1, FocusPosition::None);
        log.borrow_mut().clear();

        assert!(tree.scroll(b1, ScrollDirection::Forward));
        assert!(tree.scroll(b1, ScrollDirection::Backward));
        assert_eq!(tree.focus_path(), &[r, b, b1]);
        assert!(recorded(&log).is_empty());
        assert!(!tree.is_focused(a));
        assert!(!tree.is_focused(c));

        // Without isolation the request reaches R and moves to C.
        tree.set_isolated(b, false);
        assert!(tree.scroll(b1, ScrollDirection::Forward));
        assert_eq!(tree.focus_path(), &[r, c]);
    }

    #[test]
    fn scroll_backward_and_nested_bubbling() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let groups = with_children(&mut tree, r, 2);
        let first = with_children(&mut tree, groups[0], 2);
        let second = with_children(&mut tree, groups[1], 2);

        tree.focus(second[0], FocusPosition::None);
        // No earlier sibling in the second group, so R moves to the first group.
        // That group has no most recent child yet and falls back to its first.
        assert!(tree.scroll(r, ScrollDirection::Backward));
        assert_eq!(tree.focus_path(), &[r, groups[0], first[0]]);

        assert!(tree.scroll(r, ScrollDirection::Forward));
        assert_eq!(tree.focused_leaf(), Some(first[1]));

        // Returning to the second group restores its most recent child.
        assert!(tree.scroll(r, ScrollDirection::Forward));
        assert_eq!(tree.focus_path(), &[r, groups[1], second[0]]);
    }

    #[test]
    fn scroll_from_unfocused_node_is_ignored() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let kids = with_children(&mut tree, r, 2);
        assert!(!tree.scroll(r, ScrollDirection::Forward));

        tree.focus(kids[0], FocusPosition::None);
        assert!(!tree.scroll(kids[1], ScrollDirection::Forward));
        assert_eq!(tree.focused_leaf(), Some(kids[0]));
    }

    #[test]
    fn leaf_with_children_scrolls_into_them() {
        let mut tree = ControlTree::new();
        let list = tree.insert(LocalControl::default());
        let rows = with_children(&mut tree, list, 2);
        tree.focus(list, FocusPosition::None);

        assert!(tree.scroll(list, ScrollDirection::Forward));
        assert_eq!(tree.focus_path(), &[list, rows[0]]);
    }

    #[test]
    fn on_scroll_override_and_after_scroll_hook() {
        struct Wrapping {
            len: usize,
        }
        impl Control for Wrapping {
            fn on_scroll(&mut self, _node: NodeId, direction: ScrollDirection) -> Option<bool> {
                // Only takes over backward scrolling.
                (direction == ScrollDirection::Backward).then_some(self.len > 0)
            }
        }

        let mut tree = ControlTree::new();
        let list = tree.insert(LocalControl::default().control(Wrapping { len: 3 }));
        let rows = with_children(&mut tree, list, 3);
        tree.focus(rows[1], FocusPosition::None);

        assert!(tree.scroll(list, ScrollDirection::Backward));
        assert_eq!(tree.focused_leaf(), Some(rows[1]));
        assert!(tree.scroll(list, ScrollDirection::Forward));
        assert_eq!(tree.focused_leaf(), Some(rows[2]));

        let moves = Rc::new(RefCell::new(Vec::new()));
        let sink = moves.clone();
        let page = tree.insert(LocalControl::default().control(
            ControlHandlers::new().after_scroll(move |_, child, index| {
                sink.borrow_mut().push((child, index));
            }),
        ));
        let fields = with_children(&mut tree, page, 2);
        tree.focus(fields[0], FocusPosition::None);
        assert!(tree.scroll(page, ScrollDirection::Forward));
        assert_eq!(*moves.borrow(), vec![(fields[1], 1)]);
    }

    #[test]
    fn child_chooses_its_scroll_focus_position() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let a = tree.insert(LocalControl::default());
        tree.register(r, a, None);
        let list = tree.insert(LocalControl::default().control(
            ControlHandlers::new().scroll_position(|direction| match direction {
                ScrollDirection::Forward => FocusPosition::First,
                ScrollDirection::Backward => FocusPosition::Last,
            }),
        ));
        tree.register(r, list, None);
        let rows = with_children(&mut tree, list, 3);
        let z = tree.insert(LocalControl::default());
        tree.register(r, z, None);

        tree.focus(a, FocusPosition::None);
        tree.scroll(a, ScrollDirection::Forward);
        assert_eq!(tree.focus_path(), &[r, list, rows[0]]);

        tree.focus(z, FocusPosition::None);
        tree.scroll(z, ScrollDirection::Backward);
        assert_eq!(tree.focus_path(), &[r, list, rows[2]]);
    }

    #[test]
    fn backward_scroll_skips_disabled_sibling() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let r = recording_node(&mut tree, &log, "R");
        let a = recording_child(&mut tree, &log, r, "A");
        let b = recording_child(&mut tree, &log, r, "B");
        tree.focus(b, FocusPosition::None);
        tree.set_disabled(a, true);
        log.borrow_mut().clear();

        // Backward from B skips disabled A and reaches the root unhandled.
        assert!(!tree.scroll(b, ScrollDirection::Backward));
        assert_eq!(recorded(&log), vec![]);
    }
}
