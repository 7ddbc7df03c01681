// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the in-crate tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::control::Control;
use crate::event::InteractionEvent;
use crate::router::Dispatch;
use crate::tree::ControlTree;
use crate::types::{LocalControl, NodeId};

/// `(what, label)` pairs in the order the hooks ran.
pub(crate) type Log = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

pub(crate) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn recorded(log: &Log) -> Vec<(&'static str, &'static str)> {
    log.borrow().clone()
}

/// Records every hook and event it sees; never handles an event.
struct Recorder {
    label: &'static str,
    log: Log,
}

impl Recorder {
    fn push(&self, what: &'static str) {
        self.log.borrow_mut().push((what, self.label));
    }
}

impl Control for Recorder {
    fn on_focused(&mut self, _node: NodeId) {
        self.push("focus");
    }
    fn on_blurred(&mut self, _node: NodeId) {
        self.push("blur");
    }
    fn on_enabled(&mut self, _node: NodeId) {
        self.push("enabled");
    }
    fn on_disabled(&mut self, _node: NodeId) {
        self.push("disabled");
    }
    fn on_registered(&mut self, _node: NodeId) {
        self.push("registered");
    }
    fn on_unregistered(&mut self, _node: NodeId) {
        self.push("unregistered");
    }
    fn on_event(&mut self, event: InteractionEvent, _dispatch: &Dispatch) -> bool {
        self.push(event.name());
        false
    }
}

pub(crate) fn recording_node(tree: &mut ControlTree, log: &Log, label: &'static str) -> NodeId {
    tree.insert(LocalControl::default().control(Recorder {
        label,
        log: log.clone(),
    }))
}

pub(crate) fn recording_child(
    tree: &mut ControlTree,
    log: &Log,
    parent: NodeId,
    label: &'static str,
) -> NodeId {
    let id = recording_node(tree, log, label);
    tree.register(parent, id, None);
    id
}
