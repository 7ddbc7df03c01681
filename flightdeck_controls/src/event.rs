// Copyright 2025 the Flightdeck Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The physical input vocabulary delivered by the host dispatcher.

/// Symbol-like identifier for page-specific inputs.
///
/// The host decides what each symbol means (for example, a softkey on one
/// particular page). The tree only routes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventSymbol(pub u64);

/// A discrete hardware input.
///
/// The host translates raw panel signals into these values and delivers them
/// one at a time with [`ControlTree::on_interaction_event`](crate::ControlTree::on_interaction_event).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    /// Inner (small) knob turned clockwise.
    InnerKnobInc,
    /// Inner (small) knob turned counterclockwise.
    InnerKnobDec,
    /// Outer (large) knob turned clockwise.
    OuterKnobInc,
    /// Outer (large) knob turned counterclockwise.
    OuterKnobDec,
    /// Knob pushed.
    KnobPush,
    /// ENT pressed.
    Enter,
    /// CLR pressed.
    Clr,
    /// CLR held.
    ClrLong,
    /// Direct-to pressed.
    DirectTo,
    /// MENU pressed.
    Menu,
    /// FPL pressed.
    Fpl,
    /// PROC pressed.
    Proc,
    /// Range rocker increased.
    RangeInc,
    /// Range rocker decreased.
    RangeDec,
    /// Joystick pushed.
    JoystickPush,
    /// Joystick deflected left.
    JoystickLeft,
    /// Joystick deflected up.
    JoystickUp,
    /// Joystick deflected right.
    JoystickRight,
    /// Joystick deflected down.
    JoystickDown,
    /// A page-specific input.
    Page(EventSymbol),
}

impl InteractionEvent {
    /// Stable handler name for this event, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::InnerKnobInc => "InnerKnobInc",
            Self::InnerKnobDec => "InnerKnobDec",
            Self::OuterKnobInc => "OuterKnobInc",
            Self::OuterKnobDec => "OuterKnobDec",
            Self::KnobPush => "KnobPush",
            Self::Enter => "Enter",
            Self::Clr => "Clr",
            Self::ClrLong => "ClrLong",
            Self::DirectTo => "DirectTo",
            Self::Menu => "Menu",
            Self::Fpl => "Fpl",
            Self::Proc => "Proc",
            Self::RangeInc => "RangeInc",
            Self::RangeDec => "RangeDec",
            Self::JoystickPush => "JoystickPush",
            Self::JoystickLeft => "JoystickLeft",
            Self::JoystickUp => "JoystickUp",
            Self::JoystickRight => "JoystickRight",
            Self::JoystickDown => "JoystickDown",
            Self::Page(_) => "Page",
        }
    }
}
