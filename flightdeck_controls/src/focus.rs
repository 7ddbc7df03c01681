// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus path construction, blurring, and disabling.
//!
//! The tree keeps one explicit root-to-leaf focus path. Every change to it is
//! applied as a diff against the previous path: nodes that leave the path are
//! blurred deepest first, then nodes that join it are focused shallowest first.
//! Nodes on both paths hear nothing.

use crate::control::Notification;
use crate::tree::{ControlTree, FocusPath, Notifications};
use crate::types::{ControlFlags, FocusPosition, NodeId};

impl ControlTree {
    /// Focus `id`, then extend the path below it according to `position`.
    ///
    /// The path from the tree root down to `id` is focused as well, and each
    /// parent's most recently focused index is updated to the child on the path.
    ///
    /// Refused (returns `false`, nothing changes) when `id` is stale, when it
    /// or any ancestor is disabled, or when it carries
    /// [`ControlFlags::REQUIRE_CHILD_FOCUS`] and no focusable descendant exists.
    pub fn focus(&mut self, id: NodeId, position: FocusPosition) -> bool {
        if !self.is_alive(id) {
            tracing::warn!(?id, "focus: stale node");
            return false;
        }
        if !self.can_be_focused(id) {
            tracing::debug!(?id, "focus refused: node or an ancestor is disabled");
            return false;
        }
        let mut path = self.ancestors(id);
        if !self.build_focus_path(id, position, &mut path) {
            tracing::debug!(?id, ?position, "focus refused: no focusable child");
            return false;
        }
        self.apply_focus_path(path);
        true
    }

    /// Blur `id` and everything below it on the focus path.
    ///
    /// Ancestors that carry [`ControlFlags::REQUIRE_CHILD_FOCUS`] and are left
    /// without a focused child are blurred too. No new target is chosen.
    /// Does nothing if `id` is not focused.
    pub fn blur(&mut self, id: NodeId) {
        if let Some(pos) = self.path_position(id) {
            self.blur_at(pos, true);
        }
    }

    /// Enable or disable a node.
    ///
    /// Disabling a node that contains the focused leaf blurs that portion of the
    /// path first. Enabling only clears the flag; focus is never restored.
    /// `on_disabled` / `on_enabled` fire only when the state actually changes.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        let Some(flags) = self.flags(id) else {
            tracing::warn!(?id, "set_disabled: stale node");
            return;
        };
        let was_disabled = flags.contains(ControlFlags::DISABLED);
        if disabled {
            if let Some(pos) = self.path_position(id) {
                self.blur_at(pos, true);
            }
            self.node_mut(id).flags.insert(ControlFlags::DISABLED);
            if !was_disabled {
                self.deliver([(id, Notification::Disabled)]);
            }
        } else {
            self.node_mut(id).flags.remove(ControlFlags::DISABLED);
            if was_disabled {
                self.deliver([(id, Notification::Enabled)]);
            }
        }
    }

    /// Replace a node's configuration flags.
    ///
    /// [`ControlFlags::DISABLED`] is not touched here; use
    /// [`ControlTree::set_disabled`] so focus and notifications stay consistent.
    pub fn set_flags(&mut self, id: NodeId, flags: ControlFlags) {
        let Some(current) = self.flags(id) else {
            tracing::warn!(?id, "set_flags: stale node");
            return;
        };
        let mut next = flags - ControlFlags::DISABLED;
        next.set(
            ControlFlags::DISABLED,
            current.contains(ControlFlags::DISABLED),
        );
        self.node_mut(id).flags = next;
    }

    /// Make `index` the most recently focused child of `parent`.
    ///
    /// If `parent` currently has a focused child, the child at `index` is focused
    /// with `position` instead. Returns whether anything changed.
    pub fn set_focused_index(
        &mut self,
        parent: NodeId,
        index: usize,
        position: FocusPosition,
    ) -> bool {
        let Some(child) = self.child(parent, index) else {
            tracing::warn!(?parent, index, "set_focused_index: index out of range");
            return false;
        };
        if self.focused_child(parent).is_some() {
            return self.focus(child, position);
        }
        self.node_mut(parent).focused_index = Some(index);
        true
    }

    /// Whether `id` is on the focus path.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.path_position(id).is_some()
    }

    /// Whether `id` is live and neither it nor any ancestor is disabled.
    pub fn can_be_focused(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            match self.flags(n) {
                Some(f) if !f.contains(ControlFlags::DISABLED) => cur = self.parent_of(n),
                _ => return false,
            }
        }
        true
    }

    /// The focus path, root first. Empty when nothing is focused.
    pub fn focus_path(&self) -> &[NodeId] {
        &self.focus_path
    }

    /// The deepest focused node.
    pub fn focused_leaf(&self) -> Option<NodeId> {
        self.focus_path.last().copied()
    }

    /// The child of `id` that is on the focus path, if `id` is focused and not the leaf.
    pub fn focused_child(&self, id: NodeId) -> Option<NodeId> {
        let pos = self.path_position(id)?;
        self.focus_path.get(pos + 1).copied()
    }

    // --- internals ---

    pub(crate) fn path_position(&self, id: NodeId) -> Option<usize> {
        self.focus_path.iter().position(|&n| n == id)
    }

    /// Blur the focus path from `pos` down to the leaf, deepest first.
    ///
    /// With `cascade`, ancestors requiring a focused child go too.
    pub(crate) fn blur_at(&mut self, pos: usize, cascade: bool) {
        let mut cut = pos;
        if cascade {
            while cut > 0 && self.requires_child_focus(self.focus_path[cut - 1]) {
                cut -= 1;
            }
        }
        let notes: Notifications = self
            .focus_path
            .drain(cut..)
            .rev()
            .map(|n| (n, Notification::Blurred))
            .collect();
        self.deliver(notes);
    }

    /// Ancestors of `id`, root first, excluding `id`.
    fn ancestors(&self, id: NodeId) -> FocusPath {
        let mut out = FocusPath::new();
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent_of(p);
        }
        out.reverse();
        out
    }

    /// Append `id` and its chosen descendants to `out`.
    ///
    /// Returns `false` and leaves `out` untouched if `id` cannot be focused.
    fn build_focus_path(&self, id: NodeId, position: FocusPosition, out: &mut FocusPath) -> bool {
        let n = self.node(id);
        if n.flags.contains(ControlFlags::DISABLED) {
            return false;
        }
        let mark = out.len();
        out.push(id);
        let children = &n.children;
        let extended = match position {
            FocusPosition::None => false,
            FocusPosition::First => children
                .iter()
                .any(|&c| self.build_focus_path(c, FocusPosition::First, out)),
            FocusPosition::Last => children
                .iter()
                .rev()
                .any(|&c| self.build_focus_path(c, FocusPosition::Last, out)),
            FocusPosition::MostRecent => {
                let recent = n.focused_index.and_then(|i| children.get(i));
                recent.is_some_and(|&c| self.build_focus_path(c, FocusPosition::MostRecent, out))
                    || children
                        .iter()
                        .any(|&c| self.build_focus_path(c, FocusPosition::First, out))
            }
        };
        if !extended && n.flags.contains(ControlFlags::REQUIRE_CHILD_FOCUS) {
            out.truncate(mark);
            return false;
        }
        true
    }

    /// Replace the focus path, notifying only the nodes that changed state.
    fn apply_focus_path(&mut self, new: FocusPath) {
        let common = self
            .focus_path
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let mut notes: Notifications = self.focus_path[common..]
            .iter()
            .rev()
            .map(|&n| (n, Notification::Blurred))
            .collect();
        notes.extend(new[common..].iter().map(|&n| (n, Notification::Focused)));

        for pair in new.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let index = self.index_of(parent, child);
            self.node_mut(parent).focused_index = index;
        }
        self.focus_path = new;
        self.deliver(notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_log, recorded, recording_child, recording_node};
    use crate::types::LocalControl;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn focus_notifies_blur_leaf_first_then_focus_root_first() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let r = recording_node(&mut tree, &log, "R");
        let a = recording_child(&mut tree, &log, r, "A");
        let _a1 = recording_child(&mut tree, &log, a, "A1");
        let b = recording_child(&mut tree, &log, r, "B");
        let _b1 = recording_child(&mut tree, &log, b, "B1");
        tree.focus(r, FocusPosition::First);
        assert_eq!(
            recorded(&log)[4..],
            [("focus", "R"), ("focus", "A"), ("focus", "A1")]
        );
        log.borrow_mut().clear();

        assert!(tree.focus(b, FocusPosition::First));
        assert_eq!(
            recorded(&log),
            vec![
                ("blur", "A1"),
                ("blur", "A"),
                ("focus", "B"),
                ("focus", "B1")
            ]
        );
    }

    #[test]
    fn refocusing_the_same_path_is_silent() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let r = recording_node(&mut tree, &log, "R");
        let a = recording_child(&mut tree, &log, r, "A");
        tree.focus(a, FocusPosition::None);
        log.borrow_mut().clear();

        assert!(tree.focus(r, FocusPosition::MostRecent));
        assert!(recorded(&log).is_empty());
        assert_eq!(tree.focus_path(), &[r, a]);
    }

    #[test]
    fn positions_pick_first_last_and_most_recent() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let kids: Vec<NodeId> = (0..3)
            .map(|_| {
                let k = tree.insert(LocalControl::default());
                tree.register(r, k, None);
                k
            })
            .collect();

        tree.focus(r, FocusPosition::Last);
        assert_eq!(tree.focused_leaf(), Some(kids[2]));
        tree.focus(r, FocusPosition::First);
        assert_eq!(tree.focused_leaf(), Some(kids[0]));
        tree.focus(kids[1], FocusPosition::None);
        tree.blur(r);
        assert!(tree.focus_path().is_empty());

        tree.focus(r, FocusPosition::MostRecent);
        assert_eq!(tree.focus_path(), &[r, kids[1]]);
        tree.focus(r, FocusPosition::None);
        assert_eq!(tree.focus_path(), &[r]);
        // The most recent index survives the parent becoming the leaf.
        assert_eq!(tree.focused_child_index(r), Some(1));
    }

    #[test]
    fn most_recent_falls_back_past_disabled_child() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let a = tree.insert(LocalControl::default());
        let b = tree.insert(LocalControl::default());
        tree.register(r, a, None);
        tree.register(r, b, None);
        tree.focus(b, FocusPosition::None);
        tree.blur(r);
        tree.set_disabled(b, true);

        assert!(tree.focus(r, FocusPosition::MostRecent));
        assert_eq!(tree.focus_path(), &[r, a]);
    }

    #[test]
    fn most_recent_fallback_descends_by_first() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let y = tree.insert(LocalControl::default());
        let y0 = tree.insert(LocalControl::default());
        let y1 = tree.insert(LocalControl::default());
        let x = tree.insert(LocalControl::default());
        tree.register(r, y, None);
        tree.register(y, y0, None);
        tree.register(y, y1, None);
        tree.register(r, x, None);
        tree.focus(y1, FocusPosition::None);
        tree.focus(x, FocusPosition::None);
        assert_eq!(tree.focused_child_index(y), Some(1));
        tree.blur(r);
        tree.set_disabled(x, true);

        assert!(tree.focus(r, FocusPosition::MostRecent));
        assert_eq!(tree.focus_path(), &[r, y, y0]);
    }

    #[test]
    fn first_skips_disabled_children() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let a = tree.insert(LocalControl::with_flags(
            ControlFlags::VISIBLE | ControlFlags::DISABLED,
        ));
        let b = tree.insert(LocalControl::default());
        tree.register(r, a, None);
        tree.register(r, b, None);

        tree.focus(r, FocusPosition::First);
        assert_eq!(tree.focus_path(), &[r, b]);
        assert!(!tree.focus(a, FocusPosition::None));
        assert_eq!(tree.focus_path(), &[r, b]);
    }

    #[test]
    fn disabled_ancestor_refuses_focus() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let a = tree.insert(LocalControl::default());
        let a1 = tree.insert(LocalControl::default());
        tree.register(r, a, None);
        tree.register(a, a1, None);
        tree.set_disabled(a, true);

        assert!(!tree.can_be_focused(a1));
        assert!(!tree.focus(a1, FocusPosition::None));
        assert!(tree.focus_path().is_empty());
        assert!(tree.can_be_focused(r));
    }

    #[test]
    fn disabling_ancestor_blurs_contained_path_only() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let r = recording_node(&mut tree, &log, "R");
        let d = recording_child(&mut tree, &log, r, "D");
        let _leaf = recording_child(&mut tree, &log, d, "L");
        tree.focus(r, FocusPosition::First);
        log.borrow_mut().clear();

        tree.set_disabled(d, true);
        assert_eq!(tree.focus_path(), &[r]);
        assert_eq!(
            recorded(&log),
            vec![("blur", "L"), ("blur", "D"), ("disabled", "D")]
        );
        log.borrow_mut().clear();

        tree.set_disabled(d, true);
        assert!(recorded(&log).is_empty());

        tree.set_disabled(d, false);
        assert_eq!(recorded(&log), vec![("enabled", "D")]);
        // Enabling never restores focus.
        assert_eq!(tree.focus_path(), &[r]);
    }

    #[test]
    fn require_child_focus_refuses_empty_container() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let list = tree.insert(LocalControl::with_flags(
            ControlFlags::VISIBLE | ControlFlags::REQUIRE_CHILD_FOCUS,
        ));
        tree.register(r, list, None);

        assert!(!tree.focus(list, FocusPosition::First));
        assert!(!tree.focus(list, FocusPosition::None));
        assert!(tree.focus_path().is_empty());

        // A container that cannot take focus is skipped by its parent.
        let other = tree.insert(LocalControl::default());
        tree.register(r, other, None);
        tree.focus(r, FocusPosition::First);
        assert_eq!(tree.focus_path(), &[r, other]);
    }

    #[test]
    fn blur_cascades_through_require_child_focus() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let list = tree.insert(LocalControl::with_flags(
            ControlFlags::VISIBLE | ControlFlags::REQUIRE_CHILD_FOCUS,
        ));
        let row = tree.insert(LocalControl::default());
        tree.register(r, list, None);
        tree.register(list, row, None);
        tree.focus(row, FocusPosition::None);
        assert_eq!(tree.focus_path(), &[r, list, row]);

        tree.blur(row);
        assert_eq!(tree.focus_path(), &[r]);
    }

    #[test]
    fn focus_moves_between_separate_roots() {
        let log = new_log();
        let mut tree = ControlTree::new();
        let p1 = recording_node(&mut tree, &log, "P1");
        let p2 = recording_node(&mut tree, &log, "P2");
        tree.focus(p1, FocusPosition::None);
        log.borrow_mut().clear();

        tree.focus(p2, FocusPosition::None);
        assert_eq!(tree.focus_path(), &[p2]);
        assert_eq!(recorded(&log), vec![("blur", "P1"), ("focus", "P2")]);
    }

    #[test]
    fn set_focused_index_moves_focus_only_when_focused() {
        let mut tree = ControlTree::new();
        let r = tree.insert(LocalControl::default());
        let kids: Vec<NodeId> = (0..3)
            .map(|_| {
                let k = tree.insert(LocalControl::default());
                tree.register(r, k, None);
                k
            })
            .collect();

        assert!(tree.set_focused_index(r, 2, FocusPosition::First));
        assert!(tree.focus_path().is_empty());
        assert_eq!(tree.focused_child_index(r), Some(2));

        tree.focus(r, FocusPosition::MostRecent);
        assert_eq!(tree.focused_leaf(), Some(kids[2]));
        assert!(tree.set_focused_index(r, 0, FocusPosition::First));
        assert_eq!(tree.focused_leaf(), Some(kids[0]));
        assert!(!tree.set_focused_index(r, 9, FocusPosition::First));
    }

    #[test]
    fn set_flags_preserves_disabled_state() {
        let mut tree = ControlTree::new();
        let n = tree.insert(LocalControl::default());
        tree.set_disabled(n, true);
        tree.set_flags(n, ControlFlags::VISIBLE | ControlFlags::ISOLATE_SCROLL);
        assert!(tree.is_disabled(n));
        assert!(tree.is_isolated(n));
        tree.set_flags(n, ControlFlags::DISABLED);
        tree.set_disabled(n, false);
        tree.set_flags(n, ControlFlags::DISABLED);
        assert!(!tree.is_disabled(n));
    }
}
