//! Text measurement
//!
//! Widgets size text through the [`TextMeasurer`] trait. A measurer may be
//! unable to measure (no font loaded, no drawing surface); callers then fall
//! back to [`EstimatedTextMeasurer`], which never fails and is fully
//! deterministic.

use std::fmt;
use std::str::FromStr;

use crate::{Result, TextError};

/// Width per character used when no real measurement is available
pub const FALLBACK_CHAR_WIDTH: f32 = 8.0;

/// A font in CSS shorthand form, e.g. `14px Arial`
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels
    pub size_px: f32,
    /// Family name
    pub family: String,
}

impl FontSpec {
    /// Create a font spec from size and family
    pub fn new(size_px: f32, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }

    /// The reference font used for chip measurement
    pub fn reference() -> Self {
        Self::new(14.0, "Arial")
    }

    /// Parse `"<size>px <family>"`
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || TextError::InvalidFontSpec(spec.to_string());

        let trimmed = spec.trim();
        let (size, family) = trimmed.split_once(char::is_whitespace).ok_or_else(invalid)?;
        let size_px: f32 = size
            .strip_suffix("px")
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| invalid())?;
        let family = family.trim().trim_matches(|c| c == '"' || c == '\'');

        if !size_px.is_finite() || size_px <= 0.0 || family.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(size_px, family))
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

impl FromStr for FontSpec {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Text measurement result
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width in pixels
    pub width: f32,
    /// Line height in pixels
    pub height: f32,
}

/// Trait for measuring single-line text
///
/// Returns `None` when the measurer cannot measure right now (for example,
/// no font face could be loaded). Callers should use [`measure_width`],
/// which applies the deterministic fallback.
pub trait TextMeasurer {
    /// Measure a single line of text in the given font
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics> {
        (**self).measure(text, font)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for std::rc::Rc<M> {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics> {
        (**self).measure(text, font)
    }
}

/// A measurer that only estimates
///
/// Width is `chars * 8`, independent of the font. This keeps overflow
/// decisions stable in headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasurer;

impl EstimatedTextMeasurer {
    /// Estimated width of `text`
    pub fn width(text: &str) -> f32 {
        text.chars().count() as f32 * FALLBACK_CHAR_WIDTH
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics> {
        Some(TextMetrics {
            width: Self::width(text),
            height: font.size_px * 1.2,
        })
    }
}

/// Measure the width of `text`, falling back to the estimate
pub fn measure_width<M: TextMeasurer + ?Sized>(measurer: &M, text: &str, font: &FontSpec) -> f32 {
    match measurer.measure(text, font) {
        Some(metrics) => metrics.width,
        None => {
            tracing::trace!(text, "measurement unavailable, estimating width");
            EstimatedTextMeasurer::width(text)
        }
    }
}
