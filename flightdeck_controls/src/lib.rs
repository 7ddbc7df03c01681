// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=flightdeck_controls --heading-base-level=0

//! Flightdeck Controls: a deterministic, `no_std` focus tree and input router for
//! knob-and-button instrument displays.
//!
//! ## Overview
//!
//! Every interactive screen is a tree of control nodes. The tree tracks exactly one
//! focus path from a root down to a focused leaf, routes discrete hardware inputs
//! (knob turns, button presses) from that leaf toward the root, and moves focus
//! between siblings when a knob scrolls.
//!
//! The tree does not render anything. Collaborators attach behavior to nodes by
//! implementing [`Control`] (or by filling in a [`ControlHandlers`]) and
//! observe focus changes through its hooks.
//!
//! ## Registration
//!
//! Nodes are created detached with [`ControlTree::insert`] and attached to a parent
//! with [`ControlTree::register`]. Child order is the scroll order. Each parent
//! remembers its most recently focused child so that focus can return to it later.
//! [`ControlTree::unregister`] detaches a child and, if it held focus, hands focus to
//! a sibling as chosen by [`Control::reconcile_child_blur`].
//!
//! ## Focus
//!
//! [`ControlTree::focus`] focuses a node and extends the path below it according
//! to a [`FocusPosition`]. Nodes leaving the path are blurred deepest first; nodes
//! joining it are focused shallowest first. Disabled nodes and their descendants
//! never join the path.
//!
//! ## Scrolling
//!
//! [`ControlTree::scroll`] moves focus to the next enabled sibling in a
//! [`ScrollDirection`], starting at the focused leaf and walking upward until some
//! level can move. A node with [`ControlFlags::ISOLATE_SCROLL`] consumes requests it
//! cannot satisfy while it is focused, so focus never leaves its subtree.
//!
//! ## Events
//!
//! [`ControlTree::on_interaction_event`] delivers an [`InteractionEvent`]. Handlers
//! run at the focused leaf first and then at each ancestor until one returns `true`.
//! Inner knob rotation that reaches a node with [`ControlFlags::INNER_KNOB_SCROLL`]
//! scrolls from there instead.
//!
//! ```rust
//! use flightdeck_controls::{
//!     ControlFlags, ControlHandlers, ControlTree, FocusPosition, InteractionEvent,
//!     LocalControl, ScrollDirection,
//! };
//!
//! let mut tree = ControlTree::new();
//! let page = tree.insert(LocalControl::default().control(
//!     ControlHandlers::new().on(InteractionEvent::Clr, |_| true),
//! ));
//! let list = tree.insert(LocalControl::with_flags(
//!     ControlFlags::VISIBLE | ControlFlags::INNER_KNOB_SCROLL,
//! ));
//! tree.register(page, list, None);
//! let rows: Vec<_> = (0..3)
//!     .map(|_| {
//!         let row = tree.insert(LocalControl::default());
//!         tree.register(list, row, None);
//!         row
//!     })
//!     .collect();
//!
//! tree.focus(page, FocusPosition::First);
//! assert_eq!(tree.focus_path(), &[page, list, rows[0]]);
//!
//! // The inner knob, delivered to the page, scrolls the list.
//! assert!(tree.on_interaction_event(page, InteractionEvent::InnerKnobInc));
//! assert_eq!(tree.focused_leaf(), Some(rows[1]));
//!
//! // CLR bubbles from the row up to the page.
//! assert!(tree.on_interaction_event(page, InteractionEvent::Clr));
//!
//! // Scrolling past the end of the only list on the page is unhandled.
//! tree.scroll(page, ScrollDirection::Forward);
//! assert!(!tree.scroll(page, ScrollDirection::Forward));
//! ```
//!
//! ## Dispatcher
//!
//! [`ControlTree::dispatch_for`] exposes the delivery order and [`dispatcher::run`]
//! walks it, for hosts that want to observe or filter delivery themselves.
//!
//! ## Threading
//!
//! Every operation runs to completion on the caller's stack. Hooks are called
//! synchronously; they receive node ids, not the tree, so they cannot re-enter it.
//! Hosts that need to react to a hook with further tree calls record the request
//! and apply it after the operation returns.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod control;
pub mod dispatcher;
mod event;
mod focus;
pub mod router;
mod scroll;
mod tree;
mod types;

#[cfg(test)]
mod testing;

pub use control::{Control, ControlHandlers};
pub use event::{EventSymbol, InteractionEvent};
pub use router::{Dispatch, Outcome, Phase};
pub use tree::ControlTree;
pub use types::{
    BlurReconciliation, ChildRef, ControlFlags, FocusPosition, LocalControl, NodeId,
    ScrollDirection,
};
