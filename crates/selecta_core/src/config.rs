//! Control configuration
//!
//! All fields are optional except the option list. Configuration is
//! validated once, when the builder is finished.

use std::rc::Rc;

use selecta_text::FontSpec;

use crate::option::{OptionValue, SelectOption};
use crate::overflow::{default_measurer_factory, MeasurerFactory};
use crate::{ConfigError, Result};

/// Default pixel budget for chips before they overflow
pub const DEFAULT_MAX_WIDTH_SELECTED_ITEM: f32 = 400.0;

/// Default total control width in pixels
pub const DEFAULT_WIDTH: f32 = 500.0;

/// Default input placeholder while nothing is selected
pub const DEFAULT_PLACEHOLDER: &str = "Select...";

/// Called with the full selection whenever it changes
pub type ChangeCallback = Rc<dyn Fn(&[SelectOption])>;

/// Called with the new option and the full updated store
pub type NewItemCallback = Rc<dyn Fn(&SelectOption, &[SelectOption])>;

/// Validated configuration for a [`SelectControl`](crate::SelectControl)
#[derive(Clone)]
pub struct SelectConfig {
    pub options: Vec<SelectOption>,
    pub on_change: Option<ChangeCallback>,
    pub on_new_item_added: Option<NewItemCallback>,
    pub default_value: Option<Vec<SelectOption>>,
    pub max_width_selected_item: f32,
    pub width: f32,
    pub placeholder: String,
    pub font: FontSpec,
    pub measurer_factory: MeasurerFactory,
}

impl std::fmt::Debug for SelectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectConfig")
            .field("options", &self.options.len())
            .field("on_change", &self.on_change.is_some())
            .field("on_new_item_added", &self.on_new_item_added.is_some())
            .field("default_value", &self.default_value)
            .field("max_width_selected_item", &self.max_width_selected_item)
            .field("width", &self.width)
            .field("placeholder", &self.placeholder)
            .field("font", &self.font)
            .finish()
    }
}

impl SelectConfig {
    /// Start building a configuration
    pub fn builder() -> SelectConfigBuilder {
        SelectConfigBuilder::new()
    }
}

/// Builder for [`SelectConfig`] with a fluent API
pub struct SelectConfigBuilder {
    options: Vec<SelectOption>,
    on_change: Option<ChangeCallback>,
    on_new_item_added: Option<NewItemCallback>,
    default_value: Option<Vec<SelectOption>>,
    max_width_selected_item: f32,
    width: f32,
    placeholder: String,
    font: Option<String>,
    measurer_factory: Option<MeasurerFactory>,
}

impl Default for SelectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectConfigBuilder {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            on_change: None,
            on_new_item_added: None,
            default_value: None,
            max_width_selected_item: DEFAULT_MAX_WIDTH_SELECTED_ITEM,
            width: DEFAULT_WIDTH,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            font: None,
            measurer_factory: None,
        }
    }

    /// Add an option with label and value
    pub fn option(mut self, label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.push(SelectOption::new(label, value));
        self
    }

    /// Add multiple options
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Set the change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[SelectOption]) + 'static,
    {
        self.on_change = Some(Rc::new(callback));
        self
    }

    /// Set the callback for options created from free text
    pub fn on_new_item_added<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectOption, &[SelectOption]) + 'static,
    {
        self.on_new_item_added = Some(Rc::new(callback));
        self
    }

    /// Set the initial selection
    pub fn default_value(mut self, selection: impl IntoIterator<Item = SelectOption>) -> Self {
        self.default_value = Some(selection.into_iter().collect());
        self
    }

    /// Set the pixel budget for chips
    pub fn max_width_selected_item(mut self, width: f32) -> Self {
        self.max_width_selected_item = width;
        self
    }

    /// Set the total control width
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the input placeholder shown while nothing is selected
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the chip measurement font, e.g. `"14px Arial"`
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Supply the measurement context factory
    pub fn measurer(mut self, factory: MeasurerFactory) -> Self {
        self.measurer_factory = Some(factory);
        self
    }

    /// Validate and finish
    pub fn build(self) -> Result<SelectConfig> {
        check_width("max_width_selected_item", self.max_width_selected_item)?;
        check_width("width", self.width)?;

        let font = match self.font {
            Some(spec) => FontSpec::parse(&spec)?,
            None => FontSpec::reference(),
        };

        Ok(SelectConfig {
            options: self.options,
            on_change: self.on_change,
            on_new_item_added: self.on_new_item_added,
            default_value: self.default_value,
            max_width_selected_item: self.max_width_selected_item,
            width: self.width,
            placeholder: self.placeholder,
            font,
            measurer_factory: self.measurer_factory.unwrap_or_else(default_measurer_factory),
        })
    }
}

fn check_width(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWidth { field, value })
    }
}
