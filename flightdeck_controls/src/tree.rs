// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node storage, registration, and structural queries.

use alloc::boxed::Box;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::control::{Control, Notification};
use crate::types::{
    BlurReconciliation, ChildRef, ControlFlags, FocusPosition, LocalControl, NodeId,
};

/// Root-to-leaf chain of node ids. Focus paths are short, so they live inline.
pub(crate) type FocusPath = SmallVec<[NodeId; 8]>;

/// Ordered batch of hook calls produced by one operation.
pub(crate) type Notifications = SmallVec<[(NodeId, Notification); 8]>;

/// Arena of control nodes plus the single global focus path.
///
/// Nodes are created detached with [`ControlTree::insert`] and attached with
/// [`ControlTree::register`]. Any parentless node is the root of its own tree;
/// the arena may hold several such trees, but at most one root-to-leaf path
/// across all of them is focused at a time.
///
/// Every operation is total: stale ids and structural misuse are logged and
/// ignored.
///
/// ## Example
///
/// ```rust
/// use flightdeck_controls::{ControlTree, FocusPosition, LocalControl};
///
/// let mut tree = ControlTree::new();
/// let page = tree.insert(LocalControl::default());
/// let a = tree.insert(LocalControl::default());
/// let b = tree.insert(LocalControl::default());
/// tree.register(page, a, None);
/// tree.register(page, b, None);
///
/// assert!(tree.focus(page, FocusPosition::Last));
/// assert_eq!(tree.focus_path(), &[page, b]);
/// assert_eq!(tree.focused_child_index(page), Some(1));
/// ```
pub struct ControlTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) focus_path: FocusPath,
}

impl core::fmt::Debug for ControlTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("ControlTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("focus_path", &self.focus_path)
            .finish_non_exhaustive()
    }
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Most recently focused child.
    pub(crate) focused_index: Option<usize>,
    pub(crate) flags: ControlFlags,
    control: Option<Box<dyn Control>>,
}

impl Node {
    fn new(generation: u32, local: LocalControl) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            focused_index: None,
            flags: local.flags,
            control: local.control,
        }
    }
}

impl ControlTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            focus_path: FocusPath::new(),
        }
    }

    /// Create a detached node. It is the root of its own tree until registered.
    pub fn insert(&mut self, local: LocalControl) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Destroy a node and its whole subtree.
    ///
    /// The node is unregistered from its parent first (reconciling focus), its
    /// descendants are detached with `on_unregistered`, and every slot is freed.
    /// All of the subtree's ids become stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            tracing::warn!(?id, "remove: stale node");
            return;
        }
        let mut subtree = Vec::new();
        self.collect_subtree(id, &mut subtree);

        if let Some(parent) = self.node(id).parent {
            self.unregister(parent, id);
        } else {
            if let Some(pos) = self.path_position(id) {
                self.blur_at(pos, false);
            }
            self.detach_descendants(id);
        }

        for n in subtree {
            self.nodes[n.idx()] = None;
            self.free_list.push(n.idx());
        }
    }

    /// Register `child` with `parent` at `index`, or at the end when `index` is `None`.
    ///
    /// An explicit index at or before the parent's most recently focused index
    /// shifts that index so it keeps naming the same child. Fires
    /// `on_registered` on the child. Returns `false` (and changes nothing) for
    /// stale ids, a child that already has a parent, or a registration that would
    /// create a cycle.
    pub fn register(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            tracing::warn!(?parent, ?child, "register: stale node");
            return false;
        }
        if self.node(child).parent.is_some() {
            tracing::warn!(?parent, ?child, "register: child already has a parent");
            return false;
        }
        if self.root_of(parent) == Some(child) {
            tracing::warn!(?parent, ?child, "register: child is an ancestor of parent");
            return false;
        }
        // The focus path must start at a root.
        if let Some(pos) = self.path_position(child) {
            tracing::debug!(?child, "register: blurring focused root before attaching");
            self.blur_at(pos, false);
        }

        let p = self.node_mut(parent);
        match index {
            Some(i) if i < p.children.len() => {
                p.children.insert(i, child);
                if let Some(fi) = p.focused_index
                    && i <= fi
                {
                    p.focused_index = Some(fi + 1);
                }
            }
            _ => p.children.push(child),
        }
        self.node_mut(child).parent = Some(parent);
        self.deliver([(child, Notification::Registered)]);
        true
    }

    /// Unregister a child from `parent`, by id or by index.
    ///
    /// If the child held focus it is blurred and the parent reconciles: it
    /// consults [`Control::reconcile_child_blur`] (default
    /// [`BlurReconciliation::Next`]) and focuses a remaining sibling. A parent left
    /// with no children at all is blurred. The child's own descendants are
    /// detached recursively, then `on_unregistered` fires on the child.
    ///
    /// Returns the removed node, or `None` if `child` does not name a child of `parent`.
    pub fn unregister(&mut self, parent: NodeId, child: impl Into<ChildRef>) -> Option<NodeId> {
        let child = child.into();
        let Some(p) = self.node_opt(parent) else {
            tracing::warn!(?parent, "unregister: stale parent");
            return None;
        };
        let index = match child {
            ChildRef::Index(i) => i,
            ChildRef::Node(id) => match p.children.iter().position(|&c| c == id) {
                Some(i) => i,
                None => {
                    tracing::warn!(?parent, child = ?id, "unregister: not a child of parent");
                    return None;
                }
            },
        };
        if index >= p.children.len() {
            tracing::warn!(?parent, index, "unregister: index out of range");
            return None;
        }

        let removed = self.node_mut(parent).children.remove(index);
        self.node_mut(removed).parent = None;

        if let Some(pos) = self.path_position(removed) {
            self.blur_at(pos, false);
            self.reconcile_child_blur(parent, index);
        } else {
            let p = self.node_mut(parent);
            if let Some(fi) = p.focused_index
                && fi > index
            {
                p.focused_index = Some(fi - 1);
            }
        }
        let p = self.node_mut(parent);
        p.focused_index = clamp_index(p.focused_index, p.children.len());

        self.detach_descendants(removed);
        self.deliver([(removed, Notification::Unregistered)]);
        Some(removed)
    }

    /// Unregister every child of `parent` at once.
    ///
    /// If one of them held focus, the parent's blur reconciliation runs once
    /// with no children left, and the parent is blurred.
    pub fn clear(&mut self, parent: NodeId) {
        if !self.is_alive(parent) {
            tracing::warn!(?parent, "clear: stale node");
            return;
        }
        let focused_index = self.focused_child(parent).and_then(|child| {
            let index = self.index_of(parent, child);
            if let Some(pos) = self.path_position(child) {
                self.blur_at(pos, false);
            }
            index
        });
        self.detach_descendants(parent);
        if let Some(index) = focused_index {
            self.reconcile_child_blur(parent, index);
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns the root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.node_opt(id).map(|_| id)?;
        while let Some(p) = self.parent_of(cur) {
            cur = p;
        }
        Some(cur)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Number of registered children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children_of(id).len()
    }

    /// The child at `index`, if any.
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children_of(parent).get(index).copied()
    }

    /// Position of `child` among the children of `parent`.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children_of(parent).iter().position(|&c| c == child)
    }

    /// Index of the most recently focused child, whether or not it is focused now.
    pub fn focused_child_index(&self, id: NodeId) -> Option<usize> {
        self.node_opt(id).and_then(|n| n.focused_index)
    }

    /// Returns the flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<ControlFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Whether the node itself carries [`ControlFlags::DISABLED`].
    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ControlFlags::DISABLED))
    }

    /// Whether the node is marked visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(ControlFlags::VISIBLE))
    }

    /// Record visibility. Hidden nodes stay focusable unless also disabled.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(ControlFlags::VISIBLE, visible);
        }
    }

    /// Toggle scroll isolation.
    pub fn set_isolated(&mut self, id: NodeId, isolated: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(ControlFlags::ISOLATE_SCROLL, isolated);
        }
    }

    /// Whether the node is currently isolating scroll requests.
    pub fn is_isolated(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ControlFlags::ISOLATE_SCROLL))
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Run `f` against the node's hook object, if it has one.
    pub(crate) fn with_control<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Control) -> R,
    ) -> Option<R> {
        let control = self.node_opt_mut(id)?.control.as_deref_mut()?;
        Some(f(control))
    }

    /// Deliver hook calls in order. Nodes without hooks are skipped.
    pub(crate) fn deliver(&mut self, notes: impl IntoIterator<Item = (NodeId, Notification)>) {
        for (id, note) in notes {
            tracing::trace!(?id, ?note, "notify");
            self.with_control(id, |c| note.deliver(c, id));
        }
    }

    /// Detach every descendant of `id`, deepest first within each child.
    pub(crate) fn detach_descendants(&mut self, id: NodeId) {
        let n = self.node_mut(id);
        let children = core::mem::take(&mut n.children);
        n.focused_index = None;
        for child in children {
            self.node_mut(child).parent = None;
            if let Some(pos) = self.path_position(child) {
                self.blur_at(pos, false);
            }
            self.detach_descendants(child);
            self.deliver([(child, Notification::Unregistered)]);
        }
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &c in &self.node(id).children {
            self.collect_subtree(c, out);
        }
    }

    /// Pick a new focused child for `parent` after its focused child at `index` was removed.
    fn reconcile_child_blur(&mut self, parent: NodeId, index: usize) {
        if !self.is_focused(parent) {
            return;
        }
        let strategy = self
            .with_control(parent, |c| c.reconcile_child_blur(parent, index))
            .unwrap_or(BlurReconciliation::Next);
        let len = self.child_count(parent);
        if len == 0 {
            self.blur(parent);
            return;
        }
        let before = index.min(len);
        match strategy {
            BlurReconciliation::First => {
                self.focus(parent, FocusPosition::First);
            }
            BlurReconciliation::Last => {
                self.focus(parent, FocusPosition::Last);
            }
            BlurReconciliation::Next => {
                let _ = self.focus_any_child(parent, before..len, FocusPosition::First)
                    || self.focus_any_child(parent, (0..before).rev(), FocusPosition::First);
            }
            BlurReconciliation::Prev => {
                let _ = self.focus_any_child(parent, (0..before).rev(), FocusPosition::Last)
                    || self.focus_any_child(parent, before..len, FocusPosition::Last);
            }
            BlurReconciliation::Index(i) => {
                if let Some(c) = self.child(parent, i) {
                    self.focus(c, FocusPosition::First);
                }
            }
            BlurReconciliation::None => {}
        }
        if self.focused_child(parent).is_none() && self.requires_child_focus(parent) {
            self.blur(parent);
        }
    }

    fn focus_any_child(
        &mut self,
        parent: NodeId,
        indices: impl Iterator<Item = usize>,
        position: FocusPosition,
    ) -> bool {
        for i in indices {
            if let Some(c) = self.child(parent, i)
                && self.focus(c, position)
            {
                return true;
            }
        }
        false
    }

    pub(crate) fn requires_child_focus(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ControlFlags::REQUIRE_CHILD_FOCUS))
    }
}

fn clamp_index(index: Option<usize>, len: usize) -> Option<usize> {
    match (index, len) {
        (_, 0) => None,
        (Some(i), len) => Some(i.min(len - 1)),
        (None, _) => None,
    }
}
