//! Selection tracking
//!
//! The selection keeps options in the order they were chosen, unique by
//! value. Mutators report whether anything happened so the control can
//! decide when to notify.

use crate::filter::normalize;
use crate::option::{OptionValue, SelectOption};

/// Whether a UI event should keep propagating to enclosing handlers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Ordered set of chosen options
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<SelectOption>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a list, dropping repeated values
    pub fn from_options(options: impl IntoIterator<Item = SelectOption>) -> Self {
        let mut selection = Self::new();
        for option in options {
            if !selection.contains(&option.value) {
                selection.items.push(option);
            }
        }
        selection
    }

    /// Selected options in selection order
    pub fn items(&self) -> &[SelectOption] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &OptionValue) -> bool {
        self.items.iter().any(|item| &item.value == value)
    }

    /// Whether a selected option's normalized label equals the normalized `label`
    pub fn contains_label(&self, label: &str) -> bool {
        let wanted = normalize(label);
        self.items.iter().any(|item| normalize(&item.label) == wanted)
    }

    /// Remove the option if selected, otherwise append it
    ///
    /// Returns `true` if the option is selected afterwards.
    pub fn toggle(&mut self, option: &SelectOption) -> bool {
        if let Some(index) = self.items.iter().position(|item| item.value == option.value) {
            self.items.remove(index);
            false
        } else {
            self.items.push(option.clone());
            true
        }
    }

    /// Append the option unless already selected; returns whether it was added
    pub fn insert(&mut self, option: SelectOption) -> bool {
        if self.contains(&option.value) {
            return false;
        }
        self.items.push(option);
        true
    }

    /// Empty the selection
    ///
    /// The originating event must not propagate, so that clearing never
    /// also opens or closes the control.
    pub fn clear(&mut self) -> Propagation {
        self.items.clear();
        Propagation::Stop
    }

    /// Replace the whole selection
    pub fn replace(&mut self, options: impl IntoIterator<Item = SelectOption>) {
        *self = Self::from_options(options);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn option(value: i32) -> SelectOption {
        SelectOption::new(format!("Option {value}"), value)
    }

    proptest! {
        #[test]
        fn test_toggle_twice_restores(
            values in prop::collection::vec(0i32..8, 0..8),
            toggled in 0i32..10,
        ) {
            let start = Selection::from_options(values.iter().map(|v| option(*v)));
            let target = option(toggled);
            let was_selected = start.contains(&target.value);

            let mut sel = start.clone();
            prop_assert_eq!(sel.toggle(&target), !was_selected);
            prop_assert_eq!(sel.toggle(&target), was_selected);

            // Membership restored; a selected option moves to the end
            prop_assert_eq!(sel.len(), start.len());
            for item in start.items() {
                prop_assert!(sel.contains(&item.value));
            }
            if !was_selected {
                prop_assert_eq!(&sel, &start);
            }
        }
    }
}
