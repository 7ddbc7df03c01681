// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor stop outcomes.
//!
//! [`ControlTree::trigger`](crate::ControlTree::trigger) uses this to deliver an
//! event to the focused leaf and then to each ancestor. It is also usable on its
//! own with a sequence from
//! [`ControlTree::dispatch_for`](crate::ControlTree::dispatch_for), for hosts that
//! want to observe or filter delivery.
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports where propagation stopped (if at all).
//!
//! ## Minimal example
//!
//! ```
//! use flightdeck_controls::dispatcher;
//! use flightdeck_controls::router::{Outcome, Phase};
//! use flightdeck_controls::{ControlTree, FocusPosition, LocalControl};
//!
//! let mut tree = ControlTree::new();
//! let page = tree.insert(LocalControl::default());
//! let field = tree.insert(LocalControl::default());
//! tree.register(page, field, None);
//! tree.focus(page, FocusPosition::First);
//!
//! let seq = tree.dispatch_for(page);
//! let mut seen = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//!
//! assert!(stop_at.is_none());
//! assert_eq!(seen, vec![(Phase::Target, field), (Phase::Bubble, page)]);
//! ```

use crate::router::{Dispatch, Outcome};

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// - [`Outcome::Continue`]: keep going.
/// - [`Outcome::Stop`]: abort propagation immediately; no later ancestors see the event.
///
/// Returns `None` if the full sequence was visited, or `Some(d)` with the entry
/// whose handler returned [`Outcome::Stop`].
pub fn run<'a, E: ?Sized>(
    seq: &'a [Dispatch],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch, &mut E) -> Outcome,
) -> Option<&'a Dispatch> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}
