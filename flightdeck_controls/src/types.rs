// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the control tree: node identifiers, flags, and focus policies.

use alloc::boxed::Box;

use crate::control::Control;

/// Identifier for a node in the tree (generational).
///
/// Identifiers stay valid until the node is removed with
/// [`ControlTree::remove`](crate::ControlTree::remove). After that, the slot may be
/// reused with a newer generation and the old identifier is considered stale; every
/// operation given a stale identifier is a no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node configuration and state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// Node is disabled: it and its descendants cannot be on the focus path.
        const DISABLED            = 0b0000_0001;
        /// Node is visible. Recorded for renderers; the tree does not act on it.
        const VISIBLE             = 0b0000_0010;
        /// Unhandled scroll requests stop here while this node is focused.
        const ISOLATE_SCROLL      = 0b0000_0100;
        /// Inner knob rotation delivered to this node scrolls instead of dispatching.
        const INNER_KNOB_SCROLL   = 0b0000_1000;
        /// Outer knob rotation delivered to this node scrolls instead of dispatching.
        const OUTER_KNOB_SCROLL   = 0b0001_0000;
        /// Node can only be focused while one of its children is focused.
        const REQUIRE_CHILD_FOCUS = 0b0010_0000;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Which descendants become focused when a composite node receives focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum FocusPosition {
    /// Follow each level's most recently focused child, falling back to [`FocusPosition::First`].
    #[default]
    MostRecent,
    /// The lowest-indexed focusable child at each level.
    First,
    /// The highest-indexed focusable child at each level.
    Last,
    /// No descendants; the node itself becomes the leaf.
    None,
}

/// Direction of a sibling-navigation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward higher child indices.
    Forward,
    /// Toward lower child indices.
    Backward,
}

impl ScrollDirection {
    pub(crate) const fn delta(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// How a focused parent picks a new child after its focused child went away.
///
/// Returned by [`Control::reconcile_child_blur`]. Every strategy focuses the chosen
/// child with [`FocusPosition::First`], except [`BlurReconciliation::Last`] and
/// [`BlurReconciliation::Prev`], which use [`FocusPosition::Last`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlurReconciliation {
    /// Focus the parent's first focusable child.
    First,
    /// Focus the parent's last focusable child.
    Last,
    /// Focus the next focusable sibling after the removed one, else the nearest earlier one.
    Next,
    /// Focus the nearest focusable sibling before the removed one, else the next later one.
    Prev,
    /// Focus the child at this index.
    Index(usize),
    /// Leave the parent without a focused child.
    None,
}

/// Names a child either directly or by its position in the parent's child list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChildRef {
    /// A specific child node.
    Node(NodeId),
    /// The child at this index.
    Index(usize),
}

impl From<NodeId> for ChildRef {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<usize> for ChildRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Construction-time data for a node.
#[derive(Default)]
pub struct LocalControl {
    /// Initial flags.
    pub flags: ControlFlags,
    /// Hooks and event handlers, if the collaborator wants any.
    pub control: Option<Box<dyn Control>>,
}

impl LocalControl {
    /// A node with the given flags and no hooks.
    pub fn with_flags(flags: ControlFlags) -> Self {
        Self {
            flags,
            control: None,
        }
    }

    /// Attach a hook object.
    pub fn control(mut self, control: impl Control + 'static) -> Self {
        self.control = Some(Box::new(control));
        self
    }
}

impl core::fmt::Debug for LocalControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalControl")
            .field("flags", &self.flags)
            .field("has_control", &self.control.is_some())
            .finish_non_exhaustive()
    }
}
