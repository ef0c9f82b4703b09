//! Text measurement for Selecta widgets
//!
//! This crate provides:
//! - Font specs in CSS shorthand form (`"14px Arial"`)
//! - The [`TextMeasurer`] trait used by widgets to size text
//! - A deterministic estimate for hosts without fonts ([`EstimatedTextMeasurer`])
//! - A font-backed measurer reading advance widths via ttf-parser ([`FontTextMeasurer`])
//! - A per-context measurement cache ([`CachedTextMeasurer`])

pub mod cache;
pub mod font;
pub mod measure;

pub use cache::CachedTextMeasurer;
pub use font::{FontFace, FontTextMeasurer};
pub use measure::{
    measure_width, EstimatedTextMeasurer, FontSpec, TextMeasurer, TextMetrics,
    FALLBACK_CHAR_WIDTH,
};

use thiserror::Error;

/// Text measurement errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid font spec {0:?}: expected \"<size>px <family>\"")]
    InvalidFontSpec(String),

    #[error("No font found for family {0:?}")]
    FontNotFound(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
