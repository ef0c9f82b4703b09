//! Option store
//!
//! The store is the caller's static option list followed by options created
//! from free-text entry, with later duplicates (by value) dropped.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::filter::normalize;
use crate::option::{OptionValue, SelectOption};

/// Merge static then added options, keeping the first option per value
pub fn merge(static_options: &[SelectOption], added: &[SelectOption]) -> Vec<SelectOption> {
    let mut seen: IndexMap<&OptionValue, &SelectOption, FxBuildHasher> =
        IndexMap::with_capacity_and_hasher(static_options.len() + added.len(), FxBuildHasher);

    for option in static_options.iter().chain(added) {
        seen.entry(&option.value).or_insert(option);
    }

    seen.into_values().cloned().collect()
}

/// Static options plus options grown at run time
#[derive(Clone, Debug, Default)]
pub struct OptionStore {
    static_options: Vec<SelectOption>,
    added: Vec<SelectOption>,
    /// `merge(static_options, added)`, rebuilt whenever either changes
    merged: Vec<SelectOption>,
}

impl OptionStore {
    /// Create a store from the caller's static options
    pub fn new(static_options: Vec<SelectOption>) -> Self {
        let mut store = Self {
            static_options,
            added: Vec::new(),
            merged: Vec::new(),
        };
        store.rebuild();
        store
    }

    fn rebuild(&mut self) {
        self.merged = merge(&self.static_options, &self.added);
    }

    /// Replace the static options, keeping options added at run time
    pub fn set_static(&mut self, static_options: Vec<SelectOption>) {
        self.static_options = static_options;
        self.rebuild();
    }

    /// All unique options in store order
    pub fn options(&self) -> &[SelectOption] {
        &self.merged
    }

    /// Options created from free text so far
    pub fn added(&self) -> &[SelectOption] {
        &self.added
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// First option whose normalized label equals the normalized `label`
    pub fn find_by_label(&self, label: &str) -> Option<&SelectOption> {
        let wanted = normalize(label);
        self.merged.iter().find(|opt| normalize(&opt.label) == wanted)
    }

    /// Option with the given value
    pub fn get(&self, value: &OptionValue) -> Option<&SelectOption> {
        self.merged.iter().find(|opt| &opt.value == value)
    }

    /// Add an option from free text, unless a label already matches
    ///
    /// Returns the option and whether it was newly created. The new option's
    /// label and value are the trimmed text, case preserved.
    pub fn add_free_text_option(&mut self, label: &str) -> (SelectOption, bool) {
        if let Some(existing) = self.find_by_label(label) {
            return (existing.clone(), false);
        }

        let option = SelectOption::free_text(label.trim());
        self.added.push(option.clone());
        self.added = merge(&[], &self.added);
        self.rebuild();

        tracing::debug!(label = %option.label, "added free-text option");
        (option, true)
    }
}
