// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flight plan page: a header field, an isolated waypoint list, and softkeys.
//!
//! The inner knob scrolls the list, the outer knob moves between page sections,
//! and CLR bubbles from the focused row up to the page.
//!
//! Run:
//! - `cargo run -p flightdeck_demos --example waypoint_page`
//! - `RUST_LOG=flightdeck_controls=trace cargo run -p flightdeck_demos --example waypoint_page`

use std::cell::RefCell;
use std::rc::Rc;

use flightdeck_controls::control::Control;
use flightdeck_controls::{
    ControlFlags, ControlHandlers, ControlTree, Dispatch, EventSymbol, FocusPosition,
    InteractionEvent, LocalControl, NodeId, ScrollDirection,
};
use tracing_subscriber::EnvFilter;

const ACTIVATE_LEG: EventSymbol = EventSymbol(1);

/// A waypoint row. Logs its own focus changes and handles ENT.
struct WaypointRow {
    ident: &'static str,
}

impl Control for WaypointRow {
    fn on_focused(&mut self, _node: NodeId) {
        tracing::info!(ident = self.ident, "row focused");
    }

    fn on_blurred(&mut self, _node: NodeId) {
        tracing::info!(ident = self.ident, "row blurred");
    }

    fn on_enter(&mut self, _dispatch: &Dispatch) -> bool {
        tracing::info!(ident = self.ident, "direct-to requested");
        true
    }

    fn on_page_event(&mut self, symbol: EventSymbol, _dispatch: &Dispatch) -> bool {
        if symbol != ACTIVATE_LEG {
            return false;
        }
        tracing::info!(ident = self.ident, "leg activated");
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flightdeck_controls=debug")),
        )
        .init();

    let closed = Rc::new(RefCell::new(false));
    let mut tree = ControlTree::new();

    let page_closed = closed.clone();
    let page = tree.insert(
        LocalControl::with_flags(ControlFlags::VISIBLE | ControlFlags::OUTER_KNOB_SCROLL).control(
            ControlHandlers::new().on(InteractionEvent::Clr, move |d| {
                tracing::info!(from = ?d.target, "page closed");
                *page_closed.borrow_mut() = true;
                true
            }),
        ),
    );

    let header = tree.insert(LocalControl::default());
    tree.register(page, header, None);

    let list = tree.insert(
        LocalControl::with_flags(
            ControlFlags::VISIBLE
                | ControlFlags::ISOLATE_SCROLL
                | ControlFlags::INNER_KNOB_SCROLL
                | ControlFlags::REQUIRE_CHILD_FOCUS,
        )
        .control(ControlHandlers::new().after_scroll(|_, _, index| {
            tracing::info!(index, "list scrolled");
        })),
    );
    tree.register(page, list, None);

    let mut rows = Vec::new();
    for ident in ["KSEA", "SEA", "OLM", "KPDX"] {
        let row = tree.insert(LocalControl::default().control(WaypointRow { ident }));
        tree.register(list, row, None);
        rows.push(row);
    }
    // Inactive leg.
    tree.set_disabled(rows[1], true);

    tree.focus(page, FocusPosition::First);
    tracing::info!(path = ?tree.focus_path(), "initial focus");

    // Outer knob moves from the header to the list.
    tree.on_interaction_event(page, InteractionEvent::OuterKnobInc);

    // Inner knob walks the list, skipping the disabled leg, and stops at the end.
    for _ in 0..3 {
        let moved = tree.on_interaction_event(page, InteractionEvent::InnerKnobInc);
        tracing::info!(moved, leaf = ?tree.focused_leaf(), "inner knob");
    }

    tree.on_interaction_event(page, InteractionEvent::Enter);
    tree.on_interaction_event(page, InteractionEvent::Page(ACTIVATE_LEG));

    // Removing the focused row hands focus to its neighbour.
    if let Some(leaf) = tree.focused_leaf() {
        tree.unregister(list, leaf);
    }
    tracing::info!(path = ?tree.focus_path(), "after removing a waypoint");

    tree.scroll(page, ScrollDirection::Backward);
    tree.on_interaction_event(page, InteractionEvent::Clr);
    tracing::info!(closed = *closed.borrow(), "done");
}
