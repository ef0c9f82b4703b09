//! Open/closed state machine for the dropdown list
//!
//! Transitions are driven by the same `u32` event codes used for the rest
//! of the widget's interaction states.

use std::hash::Hash;

/// A state type that can transition in response to events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Event types for the dropdown state machine
pub mod dropdown_events {
    /// The field region was clicked (or activated from the keyboard)
    pub const FIELD_CLICK: u32 = 30001;
    /// The search input received focus
    pub const INPUT_FOCUS: u32 = 30002;
    /// A pointer went down outside the control's root element
    pub const OUTSIDE_POINTER_DOWN: u32 = 30003;
    /// Escape key pressed in the search input
    pub const ESCAPE: u32 = 30004;
}

/// Whether the options list is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

impl DropdownState {
    pub fn is_open(&self) -> bool {
        matches!(self, DropdownState::Open)
    }
}

impl StateTransitions for DropdownState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use dropdown_events::*;
        use DropdownState::*;

        match (self, event) {
            (Closed, FIELD_CLICK) | (Closed, INPUT_FOCUS) => Some(Open),
            (Open, FIELD_CLICK) | (Open, OUTSIDE_POINTER_DOWN) | (Open, ESCAPE) => Some(Closed),
            _ => None,
        }
    }
}

/// Keys the control reacts to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Space,
    Char(char),
    Other,
}

/// What the host should do with a key event after the control handled it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Suppress the host's default action (form submit, typed space)
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub const IGNORED: Self = Self {
        prevent_default: false,
    };

    pub const HANDLED: Self = Self {
        prevent_default: true,
    };
}
