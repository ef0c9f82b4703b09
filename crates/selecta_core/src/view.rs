//! View tree
//!
//! Rendering produces a small element tree that hosts translate into their
//! own widgets (or serialize to HTML with [`ViewNode::to_html`]). Each node
//! carries a [`Part`] so hosts and tests can find the field, the clear
//! button, individual option rows, etc. without matching on classes.

use std::fmt::Write as _;

use smallvec::SmallVec;

use crate::option::{OptionValue, SelectOption};
use crate::overflow::ChipLayout;

/// Class applied to hidden elements
pub const HIDDEN_CLASS: &str = "display-none";

/// Message shown when no option matches the search
pub const NO_RESULTS: &str = "No results found.";

/// Which piece of the control a node is
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    Root,
    FieldContainer,
    Field,
    Selector,
    Chip(OptionValue),
    OverflowChip,
    Input,
    Arrow,
    Clear,
    Listbox,
    OptionRow(OptionValue),
    Icon,
    CheckMark,
    NoResults,
    /// Structural wrapper without behavior
    Wrapper,
}

/// A rendered element
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub part: Part,
    pub tag: &'static str,
    pub classes: SmallVec<[&'static str; 2]>,
    pub attrs: SmallVec<[(&'static str, String); 4]>,
    pub text: Option<String>,
    pub hidden: bool,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(tag: &'static str, part: Part) -> Self {
        Self {
            part,
            tag,
            classes: SmallVec::new(),
            attrs: SmallVec::new(),
            text: None,
            hidden: false,
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Value of an attribute
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    /// First node (depth-first, self included) matching `pred`
    pub fn find(&self, pred: &dyn Fn(&ViewNode) -> bool) -> Option<&ViewNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    /// First node with the given part
    pub fn find_part(&self, part: &Part) -> Option<&ViewNode> {
        self.find(&|n| &n.part == part)
    }

    /// All nodes (depth-first, self included) matching `pred`
    pub fn find_all(&self, pred: &dyn Fn(&ViewNode) -> bool) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        self.collect(pred, &mut out);
        out
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&ViewNode) -> bool, out: &mut Vec<&'a ViewNode>) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect(pred, out);
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Serialize to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);

        let mut classes: SmallVec<[&str; 3]> = self.classes.iter().copied().collect();
        if self.hidden {
            classes.push(HIDDEN_CLASS);
        }
        if !classes.is_empty() {
            let _ = write!(
                out,
                " class=\"{}\"",
                html_escape::encode_double_quoted_attribute(&classes.join(" "))
            );
        }
        for (name, value) in &self.attrs {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name,
                html_escape::encode_double_quoted_attribute(value)
            );
        }

        if matches!(self.tag, "input" | "img") {
            out.push_str(" />");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&html_escape::encode_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Everything the renderer needs from a control
pub(crate) struct ControlView<'a> {
    pub width: f32,
    pub placeholder: &'a str,
    pub is_open: bool,
    pub search_text: &'a str,
    pub selection: &'a [SelectOption],
    pub chips: ChipLayout,
    pub visible_options: &'a [&'a SelectOption],
}

pub(crate) fn render_control(view: &ControlView<'_>) -> ViewNode {
    let chips = view.selection[..view.chips.visible].iter().map(|item| {
        ViewNode::new("div", Part::Wrapper)
            .class("select-selection-overflow-item")
            .child(
                ViewNode::new("span", Part::Chip(item.value.clone()))
                    .class("select-selection-item")
                    .text(item.label.clone()),
            )
    });

    let overflow = ViewNode::new("div", Part::Wrapper)
        .class("select-selection-overflow-item")
        .child(
            ViewNode::new("div", Part::OverflowChip)
                .class("select-selection-item")
                .hidden(view.chips.hidden == 0)
                .child(ViewNode::new("span", Part::Wrapper).text(format!("+{}...", view.chips.hidden))),
        );

    let placeholder = if view.selection.is_empty() {
        view.placeholder
    } else {
        ""
    };
    let input = ViewNode::new("input", Part::Input)
        .attr("value", view.search_text)
        .attr("placeholder", placeholder);

    let selector = ViewNode::new("div", Part::Selector)
        .class("select-field-selector")
        .children(chips)
        .child(overflow)
        .child(input);

    let arrow = ViewNode::new("div", Part::Wrapper)
        .class("select-arrow-container")
        .child(
            ViewNode::new("span", Part::Arrow)
                .class("select-arrow")
                .class(if view.is_open {
                    "select-arrow-up"
                } else {
                    "select-arrow-down"
                }),
        );

    let clear = ViewNode::new("span", Part::Clear)
        .class("select-clear")
        .attr("role", "button")
        .attr("tabindex", "0")
        .attr("aria-label", "Clear selection")
        .hidden(view.selection.is_empty());

    let field = ViewNode::new("div", Part::Field)
        .class("select-field")
        .attr("role", "button")
        .attr("tabindex", "0")
        .attr("aria-haspopup", "listbox")
        .attr("aria-expanded", view.is_open.to_string())
        .child(selector)
        .child(arrow)
        .child(clear);

    let mut listbox = ViewNode::new("div", Part::Listbox)
        .class("select-item-options-container")
        .attr("role", "listbox")
        .attr("aria-multiselectable", "true")
        .hidden(!view.is_open);

    if view.visible_options.is_empty() {
        listbox = listbox.child(ViewNode::new("span", Part::NoResults).text(NO_RESULTS));
    } else {
        let selected = |value: &OptionValue| view.selection.iter().any(|s| &s.value == value);
        listbox = listbox.children(view.visible_options.iter().map(|item| {
            let is_selected = selected(&item.value);
            let mut row = ViewNode::new("div", Part::OptionRow(item.value.clone()))
                .class("select-item-options")
                .attr("role", "option")
                .attr("aria-selected", is_selected.to_string())
                .child(ViewNode::new("span", Part::Wrapper).text(item.label.clone()));
            if is_selected {
                row.classes.push("select-item-options-selected");
            }
            if let Some(icon) = &item.icon {
                row = row.child(
                    ViewNode::new("img", Part::Icon)
                        .attr("src", icon.as_str())
                        .attr("alt", ""),
                );
            }
            if is_selected {
                row = row.child(ViewNode::new("span", Part::CheckMark).class("select-check-mark"));
            }
            row
        }));
    }

    ViewNode::new("div", Part::Root)
        .class("select-container")
        .attr("style", format!("width: {}px", view.width))
        .child(
            ViewNode::new("div", Part::FieldContainer)
                .class("select-field-container")
                .child(field),
        )
        .child(listbox)
}
