//! Selecta Core
//!
//! A searchable multi-select dropdown control. The control keeps its own
//! state (option store, selection, search text, open/closed) and renders a
//! [`ViewNode`] tree for the host to display.
//!
//! # Modules
//!
//! - [`option`] - Option and value types
//! - [`store`] - Static plus user-created options
//! - [`filter`] - Label search
//! - [`selection`] - Ordered, duplicate-free selection
//! - [`overflow`] - Chip fitting against a pixel budget
//! - [`interaction`] - Open/closed state machine and keys
//! - [`document`] - Page-level pointer listeners
//! - [`view`] - Rendered element tree
//! - [`config`] - Control configuration
//! - [`control`] - The mounted control

pub mod config;
pub mod control;
pub mod document;
pub mod filter;
pub mod interaction;
pub mod option;
pub mod overflow;
pub mod selection;
pub mod store;
pub mod view;

pub use config::{
    ChangeCallback, NewItemCallback, SelectConfig, SelectConfigBuilder,
    DEFAULT_MAX_WIDTH_SELECTED_ITEM, DEFAULT_PLACEHOLDER, DEFAULT_WIDTH,
};
pub use control::{CommitOutcome, SelectControl};
pub use document::{ControlId, Document, ListenerGuard, PointerTarget};
pub use filter::{matches, normalize, visible_options};
pub use interaction::{dropdown_events, DropdownState, Key, KeyOutcome, StateTransitions};
pub use option::{IconRef, OptionValue, SelectOption};
pub use overflow::{
    default_measurer_factory, fit_chips, ChipLayout, MeasurerFactory, OverflowMeasurer,
    CHIP_PADDING,
};
pub use selection::{Propagation, Selection};
pub use store::{merge, OptionStore};
pub use view::{Part, ViewNode, HIDDEN_CLASS, NO_RESULTS};

pub use selecta_text::{FontSpec, TextError, TextMeasurer, TextMetrics};

use thiserror::Error;

/// Error type for control configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field}: {value} (must be a positive, finite pixel count)")]
    InvalidWidth { field: &'static str, value: f32 },

    #[error("invalid font: {0}")]
    Font(#[from] TextError),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{SelectConfig, SelectConfigBuilder};
    pub use crate::control::{CommitOutcome, SelectControl};
    pub use crate::document::{Document, PointerTarget};
    pub use crate::interaction::{Key, KeyOutcome};
    pub use crate::option::{IconRef, OptionValue, SelectOption};
    pub use crate::selection::Propagation;
    pub use crate::view::{Part, ViewNode};
    pub use crate::{ConfigError, Result};
}
