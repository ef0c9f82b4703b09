//! Select control - searchable multi-select dropdown
//!
//! The control is headless and host-driven. The host forwards input events
//! to the entry points below, renders the tree returned by
//! [`SelectControl::render`], and drains deferred work with
//! [`SelectControl::run_deferred`] after each render pass.
//!
//! # Example
//!
//! ```ignore
//! use selecta_core::prelude::*;
//!
//! let document = Document::new();
//! let config = SelectConfig::builder()
//!     .option("Education", "education")
//!     .option("Science", "science")
//!     .option("Art", "art")
//!     .default_value([SelectOption::new("Science", "science")])
//!     .on_change(|selected| println!("{} selected", selected.len()))
//!     .build()?;
//!
//! let control = SelectControl::mount(config, &document);
//! control.focus_input();
//! control.input("art");
//! control.key_down_input(&Key::Enter);
//! ```
//!
//! Callbacks run after the control's internal state is released, so they
//! may call back into the control.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::{ChangeCallback, NewItemCallback, SelectConfig};
use crate::document::{ControlId, Document, ListenerGuard, PointerTarget};
use crate::filter::visible_options;
use crate::interaction::{dropdown_events, DropdownState, Key, KeyOutcome, StateTransitions};
use crate::option::{OptionValue, SelectOption};
use crate::overflow::{ChipLayout, OverflowMeasurer};
use crate::selection::{Propagation, Selection};
use crate::store::OptionStore;
use crate::view::{render_control, ControlView, ViewNode};

/// Result of committing the search text (Enter)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Search text was empty or whitespace; nothing happened
    Ignored,
    /// Text matched a selected option, by label or by the value of the
    /// option it names; only the search was cleared
    AlreadySelected,
    /// Text matched an existing, unselected option, which is now selected
    Selected(SelectOption),
    /// Text matched nothing; a new option was created and selected
    Created(SelectOption),
}

/// Work deferred until after the current render pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeferredTask {
    FocusInput,
}

/// Notifications collected during a mutation, delivered after it
enum Notification {
    Changed(Vec<SelectOption>),
    NewItem {
        item: SelectOption,
        all: Vec<SelectOption>,
    },
}

struct ControlState {
    store: OptionStore,
    selection: Selection,
    search_text: String,
    dropdown: DropdownState,
    input_focused: bool,
    deferred: VecDeque<DeferredTask>,
    default_value: Option<Vec<SelectOption>>,
    overflow: OverflowMeasurer,
    max_width_selected_item: f32,
    width: f32,
    placeholder: String,
}

impl ControlState {
    /// Apply a dropdown event; opening schedules a deferred input focus
    fn transition(&mut self, event: u32) -> bool {
        let Some(next) = self.dropdown.on_event(event) else {
            return false;
        };

        tracing::debug!(from = ?self.dropdown, to = ?next, event, "dropdown transition");
        self.dropdown = next;
        if next.is_open() {
            self.deferred.push_back(DeferredTask::FocusInput);
        }
        true
    }

    fn selection_changed(&self, out: &mut Vec<Notification>) {
        out.push(Notification::Changed(self.selection.items().to_vec()));
    }
}

/// Compare option lists including labels and icons, not just values
fn same_options(a: Option<&[SelectOption]>, b: Option<&[SelectOption]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| x.value == y.value && x.label == y.label && x.icon == y.icon)
        }
        _ => false,
    }
}

/// A mounted searchable multi-select dropdown
pub struct SelectControl {
    id: ControlId,
    state: Rc<RefCell<ControlState>>,
    on_change: Option<ChangeCallback>,
    on_new_item_added: Option<NewItemCallback>,
    /// Outside-click listener on the host document
    listener: Option<ListenerGuard>,
}

impl std::fmt::Debug for SelectControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SelectControl")
            .field("id", &self.id)
            .field("options", &state.store.len())
            .field("selected", &state.selection.len())
            .field("search_text", &state.search_text)
            .field("dropdown", &state.dropdown)
            .finish()
    }
}

impl SelectControl {
    /// Mount a control on `document`
    ///
    /// Registers the outside-click listener and reports the initial
    /// selection through `on_change`.
    pub fn mount(config: SelectConfig, document: &Document) -> Self {
        let id = ControlId::next();

        let selection = Selection::from_options(config.default_value.clone().unwrap_or_default());
        let state = Rc::new(RefCell::new(ControlState {
            store: OptionStore::new(config.options),
            selection,
            search_text: String::new(),
            dropdown: DropdownState::Closed,
            input_focused: false,
            deferred: VecDeque::new(),
            default_value: config.default_value,
            overflow: OverflowMeasurer::new(config.font, config.measurer_factory),
            max_width_selected_item: config.max_width_selected_item,
            width: config.width,
            placeholder: config.placeholder,
        }));

        let weak_state = Rc::downgrade(&state);
        let listener = document.add_pointer_down_listener(move |target: &PointerTarget| {
            if target.is_within(id) {
                return;
            }
            if let Some(state) = weak_state.upgrade() {
                state
                    .borrow_mut()
                    .transition(dropdown_events::OUTSIDE_POINTER_DOWN);
            }
        });

        let control = Self {
            id,
            state,
            on_change: config.on_change,
            on_new_item_added: config.on_new_item_added,
            listener: Some(listener),
        };

        tracing::debug!(control = id.to_raw(), "mounted select control");

        let initial = control.state.borrow().selection.items().to_vec();
        control.notify(vec![Notification::Changed(initial)]);
        control
    }

    /// Tear the control down, deregistering its document listener
    pub fn unmount(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.remove();
        }
        tracing::debug!(control = self.id.to_raw(), "unmounted select control");
    }

    /// Run `f` against the state, then deliver its notifications
    fn update<R>(&self, f: impl FnOnce(&mut ControlState, &mut Vec<Notification>) -> R) -> R {
        let mut pending = Vec::new();
        let result = f(&mut self.state.borrow_mut(), &mut pending);
        self.notify(pending);
        result
    }

    fn notify(&self, pending: Vec<Notification>) {
        for notification in pending {
            match notification {
                Notification::Changed(selection) => {
                    if let Some(cb) = &self.on_change {
                        cb(&selection);
                    }
                }
                Notification::NewItem { item, all } => {
                    if let Some(cb) = &self.on_new_item_added {
                        cb(&item, &all);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// The field region was clicked: toggle the list
    ///
    /// Returns whether the list is open afterwards.
    pub fn click_field(&self) -> bool {
        self.update(|s, _| {
            s.transition(dropdown_events::FIELD_CLICK);
            s.dropdown.is_open()
        })
    }

    /// A key was pressed while the field itself has focus
    pub fn key_down_field(&self, key: &Key) -> KeyOutcome {
        match key {
            Key::Enter | Key::Space => {
                self.click_field();
                KeyOutcome::HANDLED
            }
            _ => KeyOutcome::IGNORED,
        }
    }

    /// The search input received focus: open the list
    pub fn focus_input(&self) {
        self.update(|s, _| {
            s.input_focused = true;
            s.transition(dropdown_events::INPUT_FOCUS);
        })
    }

    /// The search input lost focus
    pub fn blur_input(&self) {
        self.update(|s, _| s.input_focused = false)
    }

    /// The search input's text changed
    pub fn input(&self, text: &str) {
        self.update(|s, _| {
            tracing::trace!(text, "search text changed");
            s.search_text.clear();
            s.search_text.push_str(text);
        })
    }

    /// A key was pressed in the search input
    ///
    /// Enter commits the search text, Escape closes the list.
    pub fn key_down_input(&self, key: &Key) -> KeyOutcome {
        match key {
            Key::Enter => {
                self.commit_search();
                KeyOutcome::HANDLED
            }
            Key::Escape => {
                self.update(|s, _| s.transition(dropdown_events::ESCAPE));
                KeyOutcome::IGNORED
            }
            _ => KeyOutcome::IGNORED,
        }
    }

    /// Whether a pointer press at `target` lands inside this control
    pub fn contains(&self, target: &PointerTarget) -> bool {
        target.is_within(self.id)
    }

    /// Run deferred work scheduled during the last events
    ///
    /// Returns the number of tasks run. Focusing after the list closed
    /// again is harmless.
    pub fn run_deferred(&self) -> usize {
        self.update(|s, _| {
            let mut ran = 0;
            while let Some(task) = s.deferred.pop_front() {
                match task {
                    DeferredTask::FocusInput => {
                        tracing::trace!("focusing search input");
                        s.input_focused = true;
                    }
                }
                ran += 1;
            }
            ran
        })
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// An option row was clicked: select or deselect it
    ///
    /// Returns whether the option is selected afterwards, or `None` if no
    /// option in the store has this value.
    pub fn toggle(&self, value: &OptionValue) -> Option<bool> {
        self.update(|s, out| {
            let option = s.store.get(value)?.clone();
            let selected = s.selection.toggle(&option);
            tracing::debug!(value = %value, selected, "toggled option");
            s.selection_changed(out);
            Some(selected)
        })
    }

    /// The clear affordance was clicked: deselect everything
    ///
    /// The host must not forward the click to the field.
    pub fn clear(&self) -> Propagation {
        self.update(|s, out| {
            let propagation = s.selection.clear();
            tracing::debug!("cleared selection");
            s.selection_changed(out);
            propagation
        })
    }

    /// Select or create an option from the search text
    pub fn commit_search(&self) -> CommitOutcome {
        self.update(|s, out| {
            let label = s.search_text.trim().to_string();
            if label.is_empty() {
                return CommitOutcome::Ignored;
            }

            if s.selection.contains_label(&label) {
                s.search_text.clear();
                return CommitOutcome::AlreadySelected;
            }

            if let Some(existing) = s.store.find_by_label(&label).cloned() {
                s.search_text.clear();
                // Its value may already be selected under another label
                if !s.selection.insert(existing.clone()) {
                    return CommitOutcome::AlreadySelected;
                }
                s.selection_changed(out);
                tracing::debug!(label = %existing.label, "selected option from search");
                return CommitOutcome::Selected(existing);
            }

            let (item, _) = s.store.add_free_text_option(&label);
            out.push(Notification::NewItem {
                item: item.clone(),
                all: s.store.options().to_vec(),
            });
            if s.selection.insert(item.clone()) {
                s.selection_changed(out);
            }
            s.search_text.clear();
            CommitOutcome::Created(item)
        })
    }

    /// Apply a new default selection
    ///
    /// A default that differs from the previous one replaces the selection.
    /// Passing `None` forgets the default without touching the selection.
    pub fn set_default_value(&self, default: Option<Vec<SelectOption>>) {
        self.update(|s, out| {
            let changed = !same_options(s.default_value.as_deref(), default.as_deref());
            s.default_value = default;
            if !changed {
                return;
            }
            if let Some(values) = &s.default_value {
                s.selection.replace(values.iter().cloned());
                s.selection_changed(out);
            }
        })
    }

    /// Replace the static option list
    pub fn set_options(&self, options: Vec<SelectOption>) {
        self.update(|s, _| s.store.set_static(options))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().dropdown.is_open()
    }

    pub fn dropdown_state(&self) -> DropdownState {
        self.state.borrow().dropdown
    }

    pub fn input_focused(&self) -> bool {
        self.state.borrow().input_focused
    }

    /// Number of deferred tasks waiting for [`run_deferred`](Self::run_deferred)
    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().deferred.len()
    }

    pub fn search_text(&self) -> String {
        self.state.borrow().search_text.clone()
    }

    /// Selected options in selection order
    pub fn selection(&self) -> Vec<SelectOption> {
        self.state.borrow().selection.items().to_vec()
    }

    /// All options in store order
    pub fn options(&self) -> Vec<SelectOption> {
        self.state.borrow().store.options().to_vec()
    }

    /// Options matching the current search text
    pub fn visible_options(&self) -> Vec<SelectOption> {
        let state = self.state.borrow();
        visible_options(state.store.options(), &state.search_text)
            .into_iter()
            .cloned()
            .collect()
    }

    /// How many chips fit in the configured budget
    pub fn chip_layout(&self) -> ChipLayout {
        let state = self.state.borrow();
        state
            .overflow
            .layout(state.selection.items(), state.max_width_selected_item)
    }

    /// Selected options shown as chips
    pub fn visible_selected(&self) -> Vec<SelectOption> {
        let state = self.state.borrow();
        state
            .overflow
            .visible_selected(state.selection.items(), state.max_width_selected_item)
            .to_vec()
    }

    /// Render the current state
    pub fn render(&self) -> ViewNode {
        let state = self.state.borrow();
        let visible = visible_options(state.store.options(), &state.search_text);
        let chips = state
            .overflow
            .layout(state.selection.items(), state.max_width_selected_item);

        render_control(&ControlView {
            width: state.width,
            placeholder: &state.placeholder,
            is_open: state.dropdown.is_open(),
            search_text: &state.search_text,
            selection: state.selection.items(),
            chips,
            visible_options: &visible,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, OnceCell};
    use std::rc::Weak;

    use selecta_text::{EstimatedTextMeasurer, FontSpec, TextMeasurer};

    use crate::config::SelectConfigBuilder;
    use crate::view::{Part, NO_RESULTS};

    fn estimated() -> crate::overflow::MeasurerFactory {
        Rc::new(|_: &FontSpec| Box::new(EstimatedTextMeasurer) as Box<dyn TextMeasurer>)
    }

    fn mock_builder() -> SelectConfigBuilder {
        SelectConfig::builder()
            .option("Education", "education")
            .option("Science", "science")
            .option("Art", "art")
            .measurer(estimated())
    }

    /// Records every callback invocation
    #[derive(Default)]
    struct Recorder {
        changes: RefCell<Vec<Vec<String>>>,
        new_items: RefCell<Vec<(SelectOption, usize)>>,
    }

    fn mount_recorded(builder: SelectConfigBuilder) -> (SelectControl, Document, Rc<Recorder>) {
        let recorder = Rc::new(Recorder::default());
        let on_change = recorder.clone();
        let on_new = recorder.clone();

        let config = builder
            .on_change(move |sel| {
                on_change
                    .changes
                    .borrow_mut()
                    .push(sel.iter().map(|o| o.label.clone()).collect());
            })
            .on_new_item_added(move |item, all| {
                on_new.new_items.borrow_mut().push((item.clone(), all.len()));
            })
            .build()
            .unwrap();

        let document = Document::new();
        let control = SelectControl::mount(config, &document);
        (control, document, recorder)
    }

    fn labels(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn test_mount_reports_default_selection() {
        let (control, _doc, rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Science", "science")]));

        assert_eq!(labels(&control.selection()), ["Science"]);
        assert_eq!(*rec.changes.borrow(), vec![vec!["Science".to_string()]]);
        assert!(!control.is_open());
        assert_eq!(control.search_text(), "");
    }

    #[test]
    fn test_commit_selects_existing_option() {
        let (control, _doc, rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Science", "science")]));

        control.focus_input();
        control.input("art");
        let outcome = control.key_down_input(&Key::Enter);

        assert!(outcome.prevent_default);
        assert_eq!(labels(&control.selection()), ["Science", "Art"]);
        assert_eq!(control.search_text(), "");
        assert_eq!(rec.changes.borrow().last().unwrap(), &["Science", "Art"]);
        assert!(rec.new_items.borrow().is_empty());
    }

    #[test]
    fn test_commit_creates_free_text_option() {
        let (control, _doc, rec) = mount_recorded(mock_builder());

        control.input("Music");
        let outcome = control.commit_search();

        let music = SelectOption::free_text("Music");
        assert_eq!(outcome, CommitOutcome::Created(music.clone()));
        assert_eq!(control.options().len(), 4);
        assert_eq!(labels(&control.selection()), ["Music"]);
        assert_eq!(control.selection()[0].value, OptionValue::from("Music"));
        assert_eq!(control.search_text(), "");

        let new_items = rec.new_items.borrow();
        assert_eq!(new_items.len(), 1);
        assert_eq!(new_items[0].0.label, "Music");
        assert_eq!(new_items[0].1, 4);
    }

    #[test]
    fn test_new_item_reported_before_change() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let on_change = order.clone();
        let on_new = order.clone();

        let config = mock_builder()
            .on_change(move |_| on_change.borrow_mut().push("change"))
            .on_new_item_added(move |_, _| on_new.borrow_mut().push("new"))
            .build()
            .unwrap();
        let control = SelectControl::mount(config, &Document::new());
        order.borrow_mut().clear();

        control.input("Music");
        control.commit_search();
        assert_eq!(*order.borrow(), ["new", "change"]);
    }

    #[test]
    fn test_commit_already_selected_only_clears_search() {
        let (control, _doc, rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Science", "science")]));
        let before = rec.changes.borrow().len();

        control.input("  sCiEnCe ");
        assert_eq!(control.commit_search(), CommitOutcome::AlreadySelected);

        assert_eq!(labels(&control.selection()), ["Science"]);
        assert_eq!(control.search_text(), "");
        assert_eq!(rec.changes.borrow().len(), before);
    }

    #[test]
    fn test_commit_label_whose_value_is_selected_under_another_label() {
        let (control, _doc, rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Painting", "art")]));
        let before = rec.changes.borrow().len();

        control.input("art");
        assert_eq!(control.commit_search(), CommitOutcome::AlreadySelected);

        assert_eq!(labels(&control.selection()), ["Painting"]);
        assert_eq!(control.search_text(), "");
        assert_eq!(rec.changes.borrow().len(), before);
        assert_eq!(control.options().len(), 3);
    }

    #[test]
    fn test_commit_blank_is_noop() {
        let (control, _doc, rec) = mount_recorded(mock_builder());
        let before = rec.changes.borrow().len();

        control.input("   ");
        assert_eq!(control.commit_search(), CommitOutcome::Ignored);
        assert_eq!(control.search_text(), "   ");
        assert!(control.selection().is_empty());
        assert_eq!(rec.changes.borrow().len(), before);
        assert_eq!(control.options().len(), 3);
    }

    #[test]
    fn test_committed_free_text_is_found_case_insensitively() {
        let (control, _doc, rec) = mount_recorded(mock_builder());

        control.input("Music");
        control.commit_search();
        control.toggle(&"Music".into());
        assert!(control.selection().is_empty());

        // Differently-cased entry reuses the created option
        control.input("MUSIC");
        let outcome = control.commit_search();
        assert_eq!(outcome, CommitOutcome::Selected(SelectOption::free_text("Music")));
        assert_eq!(control.options().len(), 4);
        assert_eq!(rec.new_items.borrow().len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let (control, _doc, _rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Science", "science")]));
        let before = control.selection();

        assert_eq!(control.toggle(&"art".into()), Some(true));
        assert_eq!(labels(&control.selection()), ["Science", "Art"]);
        assert_eq!(control.toggle(&"art".into()), Some(false));
        assert_eq!(control.selection(), before);
    }

    #[test]
    fn test_toggle_reports_every_change() {
        let (control, _doc, rec) = mount_recorded(mock_builder());

        control.toggle(&"education".into());
        control.toggle(&"art".into());
        control.toggle(&"education".into());

        let changes = rec.changes.borrow();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[1], ["Education"]);
        assert_eq!(changes[2], ["Education", "Art"]);
        assert_eq!(changes[3], ["Art"]);
    }

    #[test]
    fn test_toggle_unknown_value() {
        let (control, _doc, rec) = mount_recorded(mock_builder());
        assert_eq!(control.toggle(&"music".into()), None);
        assert_eq!(rec.changes.borrow().len(), 1);
    }

    #[test]
    fn test_clear_keeps_open_state() {
        let (control, _doc, rec) = mount_recorded(
            mock_builder().default_value([
                SelectOption::new("Science", "science"),
                SelectOption::new("Art", "art"),
            ]),
        );

        assert_eq!(control.clear(), Propagation::Stop);
        assert!(control.selection().is_empty());
        assert!(!control.is_open());
        assert_eq!(rec.changes.borrow().last().unwrap().len(), 0);

        control.click_field();
        assert_eq!(control.clear(), Propagation::Stop);
        assert!(control.is_open());
    }

    #[test]
    fn test_field_click_toggles_and_defers_focus() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());

        assert!(control.click_field());
        assert!(!control.input_focused());
        assert_eq!(control.pending_tasks(), 1);

        assert_eq!(control.run_deferred(), 1);
        assert!(control.input_focused());
        assert_eq!(control.pending_tasks(), 0);

        assert!(!control.click_field());
        assert_eq!(control.pending_tasks(), 0);
    }

    #[test]
    fn test_deferred_focus_after_close_is_harmless() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());

        control.click_field();
        control.click_field();
        assert!(!control.is_open());
        assert_eq!(control.run_deferred(), 1);
        assert!(!control.is_open());
    }

    #[test]
    fn test_field_keyboard_activation() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());

        assert!(control.key_down_field(&Key::Space).prevent_default);
        assert!(control.is_open());
        assert!(control.key_down_field(&Key::Enter).prevent_default);
        assert!(!control.is_open());
        assert!(!control.key_down_field(&Key::Char('a')).prevent_default);
        assert!(!control.is_open());
    }

    #[test]
    fn test_focus_opens_and_escape_closes() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());

        control.focus_input();
        assert!(control.is_open());
        control.input("sci");

        let outcome = control.key_down_input(&Key::Escape);
        assert!(!outcome.prevent_default);
        assert!(!control.is_open());
        // Closing never touches the search text
        assert_eq!(control.search_text(), "sci");

        // Focus while open keeps it open
        control.focus_input();
        control.focus_input();
        assert!(control.is_open());
    }

    #[test]
    fn test_outside_pointer_down_closes() {
        let (control, doc, _rec) = mount_recorded(mock_builder());

        control.click_field();
        doc.pointer_down(PointerTarget::Control(control.id()));
        assert!(control.is_open());

        doc.pointer_down(PointerTarget::Page);
        assert!(!control.is_open());
    }

    #[test]
    fn test_outside_pointer_down_only_affects_other_controls() {
        let doc = Document::new();
        let a = SelectControl::mount(mock_builder().build().unwrap(), &doc);
        let b = SelectControl::mount(mock_builder().build().unwrap(), &doc);

        a.click_field();
        b.click_field();
        doc.pointer_down(PointerTarget::Control(a.id()));

        assert!(a.is_open());
        assert!(!b.is_open());
        assert!(a.contains(&PointerTarget::Control(a.id())));
        assert!(!a.contains(&PointerTarget::Control(b.id())));
    }

    #[test]
    fn test_unmount_removes_listener() {
        let doc = Document::new();
        let a = SelectControl::mount(mock_builder().build().unwrap(), &doc);
        let b = SelectControl::mount(mock_builder().build().unwrap(), &doc);
        assert_eq!(doc.listener_count(), 2);

        a.unmount();
        assert_eq!(doc.listener_count(), 1);

        drop(b);
        assert_eq!(doc.listener_count(), 0);
        doc.pointer_down(PointerTarget::Page);
    }

    #[test]
    fn test_default_value_reapplied_when_changed() {
        let (control, _doc, rec) =
            mount_recorded(mock_builder().default_value([SelectOption::new("Science", "science")]));
        control.toggle(&"art".into());
        let before = rec.changes.borrow().len();

        // Same default again: selection untouched
        control.set_default_value(Some(vec![SelectOption::new("Science", "science")]));
        assert_eq!(labels(&control.selection()), ["Science", "Art"]);
        assert_eq!(rec.changes.borrow().len(), before);

        // New default replaces the selection
        control.set_default_value(Some(vec![SelectOption::new("Education", "education")]));
        assert_eq!(labels(&control.selection()), ["Education"]);
        assert_eq!(rec.changes.borrow().len(), before + 1);

        // Removing the default keeps the selection
        control.set_default_value(None);
        assert_eq!(labels(&control.selection()), ["Education"]);
    }

    #[test]
    fn test_set_options_keeps_added_items() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());
        control.input("Music");
        control.commit_search();

        control.set_options(vec![SelectOption::new("Health", "health")]);
        assert_eq!(labels(&control.options()), ["Health", "Music"]);
    }

    #[test]
    fn test_render_filters_options() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());
        control.focus_input();
        control.input("  AR");

        let root = control.render();
        assert!(!root.find_part(&Part::Listbox).unwrap().hidden);
        let rows = root.find_all(&|n| matches!(n.part, Part::OptionRow(_)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text_content(), "Art");
        assert_eq!(
            root.find_part(&Part::Input).unwrap().attr_value("value"),
            Some("  AR")
        );

        control.input("zzz");
        let root = control.render();
        assert_eq!(root.find_part(&Part::NoResults).unwrap().text.as_deref(), Some(NO_RESULTS));
    }

    #[test]
    fn test_render_overflow_chips() {
        let (control, _doc, _rec) = mount_recorded(
            mock_builder()
                .max_width_selected_item(150.0)
                .default_value([
                    SelectOption::new("Science", "science"),
                    SelectOption::new("Art", "art"),
                    SelectOption::new("Education", "education"),
                ]),
        );

        // Science = 56 + 30, Art = 24 + 30: 140 fits, Education does not
        assert_eq!(control.chip_layout(), ChipLayout { visible: 2, hidden: 1 });
        assert_eq!(labels(&control.visible_selected()), ["Science", "Art"]);

        let root = control.render();
        let chips = root.find_all(&|n| matches!(n.part, Part::Chip(_)));
        assert_eq!(chips.len(), 2);
        let overflow = root.find_part(&Part::OverflowChip).unwrap();
        assert!(!overflow.hidden);
        assert_eq!(overflow.text_content(), "+1...");
        assert!(!root.find_part(&Part::Clear).unwrap().hidden);
    }

    #[test]
    fn test_render_open_state_in_aria() {
        let (control, _doc, _rec) = mount_recorded(mock_builder());
        let field = |c: &SelectControl| {
            c.render()
                .find_part(&Part::Field)
                .and_then(|f| f.attr_value("aria-expanded").map(str::to_string))
        };

        assert_eq!(field(&control).as_deref(), Some("false"));
        control.click_field();
        assert_eq!(field(&control).as_deref(), Some("true"));
    }

    #[test]
    fn test_callback_may_reenter_control() {
        let slot: Rc<OnceCell<Weak<SelectControl>>> = Rc::new(OnceCell::new());
        let seen = Rc::new(Cell::new(usize::MAX));

        let slot_for_cb = slot.clone();
        let seen_for_cb = seen.clone();
        let config = mock_builder()
            .on_change(move |_| {
                if let Some(control) = slot_for_cb.get().and_then(Weak::upgrade) {
                    seen_for_cb.set(control.selection().len());
                }
            })
            .build()
            .unwrap();

        let control = Rc::new(SelectControl::mount(config, &Document::new()));
        let _ = slot.set(Rc::downgrade(&control));

        control.toggle(&"art".into());
        assert_eq!(seen.get(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    use selecta_text::{EstimatedTextMeasurer, FontSpec, TextMeasurer};

    #[derive(Clone, Debug)]
    enum Action {
        Input(String),
        Commit,
        Toggle(usize),
        Clear,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            3 => "[A-Za-z ]{0,8}".prop_map(Action::Input),
            3 => Just(Action::Commit),
            1 => (0usize..12).prop_map(Action::Toggle),
            1 => Just(Action::Clear),
        ]
    }

    fn mount(max_width: f32) -> SelectControl {
        let config = SelectConfig::builder()
            .option("Education", "education")
            .option("Science", "science")
            .option("Art", "art")
            .default_value([SelectOption::new("Science", "science")])
            .max_width_selected_item(max_width)
            .measurer(Rc::new(|_: &FontSpec| {
                Box::new(EstimatedTextMeasurer) as Box<dyn TextMeasurer>
            }))
            .build()
            .unwrap();
        SelectControl::mount(config, &Document::new())
    }

    proptest! {
        #[test]
        fn test_random_commits_keep_selection_consistent(
            actions in prop::collection::vec(action(), 0..40),
            max_width in 50f32..600.0,
        ) {
            let control = mount(max_width);

            for action in &actions {
                match action {
                    Action::Input(text) => control.input(text),
                    Action::Commit => {
                        control.commit_search();
                    }
                    Action::Toggle(index) => {
                        if let Some(option) = control.options().get(*index) {
                            control.toggle(&option.value);
                        }
                    }
                    Action::Clear => {
                        control.clear();
                    }
                }

                let selection = control.selection();
                let options = control.options();

                for (i, a) in selection.iter().enumerate() {
                    for b in &selection[i + 1..] {
                        prop_assert_ne!(&a.value, &b.value);
                    }
                }
                for (i, a) in options.iter().enumerate() {
                    for b in &options[i + 1..] {
                        prop_assert_ne!(&a.value, &b.value);
                    }
                }
                for item in &selection {
                    prop_assert!(options.iter().any(|o| o.value == item.value));
                }

                let layout = control.chip_layout();
                prop_assert_eq!(layout.visible + layout.hidden, selection.len());
            }
        }
    }
}
