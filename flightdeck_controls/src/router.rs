// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing: deliver a hardware input to the focused leaf and bubble it upward.
//!
//! An event delivered to a node that is on the focus path goes first to the
//! focused leaf ([`Phase::Target`]) and then to each ancestor in turn up to the
//! tree root ([`Phase::Bubble`]). The first control that reports the event as
//! handled stops propagation.
//!
//! Inner knob rotation (and outer knob rotation, when opted in) given to, or
//! bubbling through, a node flagged for knob scrolling becomes a scroll request
//! instead; see [`ControlTree::scroll`].

use alloc::vec::Vec;

use crate::dispatcher;
use crate::event::InteractionEvent;
use crate::tree::ControlTree;
use crate::types::{ControlFlags, NodeId, ScrollDirection};

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The focused leaf.
    Target,
    /// An ancestor of the focused leaf.
    Bubble,
}

/// Control flow for dispatch handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    Continue,
    /// Stop at this entry.
    Stop,
}

/// One step of event delivery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose control receives the event at this step.
    pub node: NodeId,
    /// The focused leaf the event started at.
    pub target: NodeId,
}

impl Dispatch {
    /// Convenience constructor for a target entry.
    pub const fn target(node: NodeId, target: NodeId) -> Self {
        Self {
            phase: Phase::Target,
            node,
            target,
        }
    }

    /// Convenience constructor for a bubble entry.
    pub const fn bubble(node: NodeId, target: NodeId) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
            target,
        }
    }
}

impl ControlTree {
    /// Deliver a hardware input to `node`.
    ///
    /// Inner knob rotation given to a node with [`ControlFlags::INNER_KNOB_SCROLL`],
    /// or outer knob rotation given to a node with [`ControlFlags::OUTER_KNOB_SCROLL`],
    /// becomes [`ControlTree::scroll`] from that node (increment scrolls forward)
    /// and no handler runs.
    ///
    /// Otherwise the input travels along [`ControlTree::dispatch_for`] like
    /// [`ControlTree::trigger`], except that an ancestor carrying the matching
    /// knob flag scrolls at its step instead of running its handler.
    ///
    /// Returns whether the input was handled or scrolled.
    pub fn on_interaction_event(&mut self, node: NodeId, event: InteractionEvent) -> bool {
        if !self.is_alive(node) {
            tracing::warn!(?node, event = event.name(), "interaction event for stale node");
            return false;
        }
        if let Some(direction) = self.knob_scroll(node, event) {
            return self.scroll(node, direction);
        }
        self.deliver_event(node, event, true)
    }

    /// Compute the delivery order for an event given to `node`.
    ///
    /// - If `node` is on the focus path: the focused leaf as [`Phase::Target`],
    ///   then every ancestor up to the tree root as [`Phase::Bubble`].
    /// - If `node` is an unfocused root: `node` alone as the target.
    /// - Otherwise: empty. Events never reach unfocused subtrees.
    pub fn dispatch_for(&self, node: NodeId) -> Vec<Dispatch> {
        if !self.is_alive(node) {
            return Vec::new();
        }
        if self.is_focused(node) {
            let mut path = self.focus_path.iter().rev().copied();
            let Some(leaf) = path.next() else {
                return Vec::new();
            };
            let mut out = Vec::with_capacity(self.focus_path.len());
            out.push(Dispatch::target(leaf, leaf));
            out.extend(path.map(|n| Dispatch::bubble(n, leaf)));
            return out;
        }
        if self.parent_of(node).is_none() {
            return alloc::vec![Dispatch::target(node, node)];
        }
        Vec::new()
    }

    /// Run the handlers for `event` along [`ControlTree::dispatch_for`], stopping at
    /// the first control whose handler returns `true`.
    ///
    /// Returns `false` when nothing handled the event; the event is dropped.
    pub fn trigger(&mut self, node: NodeId, event: InteractionEvent) -> bool {
        self.deliver_event(node, event, false)
    }

    fn deliver_event(&mut self, node: NodeId, event: InteractionEvent, redirect: bool) -> bool {
        let seq = self.dispatch_for(node);
        if seq.is_empty() {
            tracing::trace!(?node, event = event.name(), "event dropped: node not focused");
            return false;
        }
        let stopped = dispatcher::run(&seq, self, |d, tree| {
            let scroll = if redirect {
                tree.knob_scroll(d.node, event)
            } else {
                None
            };
            let handled = match scroll {
                Some(direction) => tree.scroll(d.node, direction),
                None => tree
                    .with_control(d.node, |c| c.on_event(event, d))
                    .unwrap_or(false),
            };
            if handled {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        match stopped {
            Some(d) => {
                tracing::trace!(node = ?d.node, phase = ?d.phase, event = event.name(), "event handled");
                true
            }
            None => {
                tracing::trace!(?node, event = event.name(), "event dropped: unhandled");
                false
            }
        }
    }

    /// The scroll direction `event` maps to at `node`, if `node` opted in.
    fn knob_scroll(&self, node: NodeId, event: InteractionEvent) -> Option<ScrollDirection> {
        let flags = self.flags(node)?;
        let inner = flags.contains(ControlFlags::INNER_KNOB_SCROLL);
        let outer = flags.contains(ControlFlags::OUTER_KNOB_SCROLL);
        match event {
            InteractionEvent::InnerKnobInc if inner => Some(ScrollDirection::Forward),
            InteractionEvent::InnerKnobDec if inner => Some(ScrollDirection::Backward),
            InteractionEvent::OuterKnobInc if outer => Some(ScrollDirection::Forward),
            InteractionEvent::OuterKnobDec if outer => Some(ScrollDirection::Backward),
            _ => None,
        }
    }
}
