// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability contract implemented by collaborators that own a node.
//!
//! A node may carry one [`Control`] object. The tree calls into it for lifecycle
//! notifications, scroll overrides, blur reconciliation and bubbled input events.
//! Every method has a default, so implementors override only what they need.
//!
//! Hooks receive node identifiers rather than the tree. Hosts that want to react
//! with further tree mutations (open a dialog, move focus) record the intent and
//! apply it after the current operation returns.
//!
//! ## Example
//!
//! ```rust
//! use flightdeck_controls::{
//!     ControlTree, Dispatch, FocusPosition, InteractionEvent, LocalControl,
//! };
//! use flightdeck_controls::control::Control;
//!
//! struct Field;
//!
//! impl Control for Field {
//!     fn on_enter(&mut self, _dispatch: &Dispatch) -> bool {
//!         true
//!     }
//! }
//!
//! let mut tree = ControlTree::new();
//! let page = tree.insert(LocalControl::default());
//! let field = tree.insert(LocalControl::default().control(Field));
//! tree.register(page, field, None);
//!
//! tree.focus(page, FocusPosition::First);
//! assert!(tree.on_interaction_event(page, InteractionEvent::Enter));
//! assert!(!tree.on_interaction_event(page, InteractionEvent::Menu));
//! ```

use alloc::boxed::Box;

use hashbrown::HashMap;

use crate::event::{EventSymbol, InteractionEvent};
use crate::router::Dispatch;
use crate::types::{BlurReconciliation, FocusPosition, NodeId, ScrollDirection};

/// Hooks and handlers for one node.
#[allow(unused_variables, reason = "Default methods ignore their arguments.")]
pub trait Control {
    /// The node joined the focus path.
    fn on_focused(&mut self, node: NodeId) {}

    /// The node left the focus path.
    fn on_blurred(&mut self, node: NodeId) {}

    /// The node's disabled flag was cleared.
    fn on_enabled(&mut self, node: NodeId) {}

    /// The node's disabled flag was set.
    fn on_disabled(&mut self, node: NodeId) {}

    /// The node was registered with a parent.
    fn on_registered(&mut self, node: NodeId) {}

    /// The node was detached from its parent.
    fn on_unregistered(&mut self, node: NodeId) {}

    /// Replace the default sibling scan for this node.
    ///
    /// Return `Some(handled)` to take over, or `None` to let the tree scan this
    /// node's children.
    fn on_scroll(&mut self, node: NodeId, direction: ScrollDirection) -> Option<bool> {
        None
    }

    /// The default scan moved focus to `child`, found at `index` in this node's children.
    fn on_after_scroll(&mut self, node: NodeId, child: NodeId, index: usize) {}

    /// Position used to focus this node when a sibling scroll lands on it.
    fn focus_position_on_scroll(&self, direction: ScrollDirection) -> FocusPosition {
        FocusPosition::MostRecent
    }

    /// Choose a replacement after the focused child at `index` was unregistered.
    fn reconcile_child_blur(&mut self, node: NodeId, index: usize) -> BlurReconciliation {
        BlurReconciliation::Next
    }

    /// Handle a bubbled input event. Return `true` to stop propagation.
    ///
    /// The default forwards to the named handler for `event`.
    fn on_event(&mut self, event: InteractionEvent, dispatch: &Dispatch) -> bool {
        match event {
            InteractionEvent::InnerKnobInc => self.on_inner_knob_inc(dispatch),
            InteractionEvent::InnerKnobDec => self.on_inner_knob_dec(dispatch),
            InteractionEvent::OuterKnobInc => self.on_outer_knob_inc(dispatch),
            InteractionEvent::OuterKnobDec => self.on_outer_knob_dec(dispatch),
            InteractionEvent::KnobPush => self.on_knob_push(dispatch),
            InteractionEvent::Enter => self.on_enter(dispatch),
            InteractionEvent::Clr => self.on_clr(dispatch),
            InteractionEvent::ClrLong => self.on_clr_long(dispatch),
            InteractionEvent::DirectTo => self.on_direct_to(dispatch),
            InteractionEvent::Menu => self.on_menu(dispatch),
            InteractionEvent::Fpl => self.on_fpl(dispatch),
            InteractionEvent::Proc => self.on_proc(dispatch),
            InteractionEvent::RangeInc => self.on_range_inc(dispatch),
            InteractionEvent::RangeDec => self.on_range_dec(dispatch),
            InteractionEvent::JoystickPush => self.on_joystick_push(dispatch),
            InteractionEvent::JoystickLeft => self.on_joystick_left(dispatch),
            InteractionEvent::JoystickUp => self.on_joystick_up(dispatch),
            InteractionEvent::JoystickRight => self.on_joystick_right(dispatch),
            InteractionEvent::JoystickDown => self.on_joystick_down(dispatch),
            InteractionEvent::Page(symbol) => self.on_page_event(symbol, dispatch),
        }
    }

    /// Inner knob clockwise.
    fn on_inner_knob_inc(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Inner knob counterclockwise.
    fn on_inner_knob_dec(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Outer knob clockwise.
    fn on_outer_knob_inc(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Outer knob counterclockwise.
    fn on_outer_knob_dec(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Knob push.
    fn on_knob_push(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// ENT.
    fn on_enter(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// CLR.
    fn on_clr(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// CLR held.
    fn on_clr_long(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Direct-to.
    fn on_direct_to(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// MENU.
    fn on_menu(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// FPL.
    fn on_fpl(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// PROC.
    fn on_proc(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Range rocker up.
    fn on_range_inc(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Range rocker down.
    fn on_range_dec(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Joystick push.
    fn on_joystick_push(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Joystick left.
    fn on_joystick_left(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Joystick up.
    fn on_joystick_up(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Joystick right.
    fn on_joystick_right(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// Joystick down.
    fn on_joystick_down(&mut self, dispatch: &Dispatch) -> bool {
        false
    }

    /// A page-specific input.
    fn on_page_event(&mut self, symbol: EventSymbol, dispatch: &Dispatch) -> bool {
        false
    }
}

/// Lifecycle notifications the tree delivers to [`Control`] hooks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Notification {
    Focused,
    Blurred,
    Enabled,
    Disabled,
    Registered,
    Unregistered,
}

impl Notification {
    pub(crate) fn deliver(self, control: &mut dyn Control, node: NodeId) {
        match self {
            Self::Focused => control.on_focused(node),
            Self::Blurred => control.on_blurred(node),
            Self::Enabled => control.on_enabled(node),
            Self::Disabled => control.on_disabled(node),
            Self::Registered => control.on_registered(node),
            Self::Unregistered => control.on_unregistered(node),
        }
    }
}

type NodeHook = Box<dyn FnMut(NodeId)>;
type AfterScrollHook = Box<dyn FnMut(NodeId, NodeId, usize)>;
type EventHandler = Box<dyn FnMut(&Dispatch) -> bool>;

/// A [`Control`] assembled from closures.
///
/// Useful when a collaborator wants props-style wiring instead of a dedicated type.
///
/// ```rust
/// use flightdeck_controls::{ControlHandlers, InteractionEvent};
///
/// let handlers = ControlHandlers::new()
///     .focused(|node| { let _ = node; })
///     .on(InteractionEvent::Clr, |_| true);
/// # let _ = handlers;
/// ```
#[derive(Default)]
pub struct ControlHandlers {
    on_focused: Option<NodeHook>,
    on_blurred: Option<NodeHook>,
    on_enabled: Option<NodeHook>,
    on_disabled: Option<NodeHook>,
    on_registered: Option<NodeHook>,
    on_unregistered: Option<NodeHook>,
    on_after_scroll: Option<AfterScrollHook>,
    scroll_position: Option<fn(ScrollDirection) -> FocusPosition>,
    events: HashMap<InteractionEvent, EventHandler>,
}

impl ControlHandlers {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the node is focused.
    pub fn focused(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_focused = Some(Box::new(f));
        self
    }

    /// Called when the node is blurred.
    pub fn blurred(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_blurred = Some(Box::new(f));
        self
    }

    /// Called when the node is enabled.
    pub fn enabled(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_enabled = Some(Box::new(f));
        self
    }

    /// Called when the node is disabled.
    pub fn disabled(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_disabled = Some(Box::new(f));
        self
    }

    /// Called when the node is registered with a parent.
    pub fn registered(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_registered = Some(Box::new(f));
        self
    }

    /// Called when the node is detached from its parent.
    pub fn unregistered(mut self, f: impl FnMut(NodeId) + 'static) -> Self {
        self.on_unregistered = Some(Box::new(f));
        self
    }

    /// Called with `(node, child, index)` after a scroll moved focus among this node's children.
    pub fn after_scroll(mut self, f: impl FnMut(NodeId, NodeId, usize) + 'static) -> Self {
        self.on_after_scroll = Some(Box::new(f));
        self
    }

    /// Override the position used when a scroll lands on this node.
    pub fn scroll_position(mut self, f: fn(ScrollDirection) -> FocusPosition) -> Self {
        self.scroll_position = Some(f);
        self
    }

    /// Handle `event`; the closure returns `true` to stop propagation.
    pub fn on(
        mut self,
        event: InteractionEvent,
        f: impl FnMut(&Dispatch) -> bool + 'static,
    ) -> Self {
        self.events.insert(event, Box::new(f));
        self
    }
}

impl core::fmt::Debug for ControlHandlers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlHandlers")
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

fn call(hook: &mut Option<NodeHook>, node: NodeId) {
    if let Some(f) = hook {
        f(node);
    }
}

impl Control for ControlHandlers {
    fn on_focused(&mut self, node: NodeId) {
        call(&mut self.on_focused, node);
    }

    fn on_blurred(&mut self, node: NodeId) {
        call(&mut self.on_blurred, node);
    }

    fn on_enabled(&mut self, node: NodeId) {
        call(&mut self.on_enabled, node);
    }

    fn on_disabled(&mut self, node: NodeId) {
        call(&mut self.on_disabled, node);
    }

    fn on_registered(&mut self, node: NodeId) {
        call(&mut self.on_registered, node);
    }

    fn on_unregistered(&mut self, node: NodeId) {
        call(&mut self.on_unregistered, node);
    }

    fn on_after_scroll(&mut self, node: NodeId, child: NodeId, index: usize) {
        if let Some(f) = &mut self.on_after_scroll {
            f(node, child, index);
        }
    }

    fn focus_position_on_scroll(&self, direction: ScrollDirection) -> FocusPosition {
        self.scroll_position
            .map_or(FocusPosition::MostRecent, |f| f(direction))
    }

    fn on_event(&mut self, event: InteractionEvent, dispatch: &Dispatch) -> bool {
        self.events
            .get_mut(&event)
            .is_some_and(|handler| handler(dispatch))
    }
}
