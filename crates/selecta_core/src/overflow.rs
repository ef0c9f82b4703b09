//! Chip overflow measurement
//!
//! Selected options are shown as chips in the field until their summed
//! widths would exceed the configured budget. Whatever is left is collapsed
//! into a single `+N...` chip.

use std::cell::OnceCell;
use std::rc::Rc;

use selecta_text::{measure_width, CachedTextMeasurer, FontSpec, FontTextMeasurer, TextMeasurer};

use crate::option::SelectOption;

/// Horizontal space a chip takes beyond its label text
pub const CHIP_PADDING: f32 = 30.0;

/// Creates the measurement context for a control, once, on first use
pub type MeasurerFactory = Rc<dyn Fn(&FontSpec) -> Box<dyn TextMeasurer>>;

/// The default factory: a per-control cache over the process-wide font face
pub fn default_measurer_factory() -> MeasurerFactory {
    Rc::new(|font: &FontSpec| {
        Box::new(CachedTextMeasurer::new(FontTextMeasurer::for_font(font))) as Box<dyn TextMeasurer>
    })
}

/// How many chips fit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChipLayout {
    /// Number of leading selected options shown as chips
    pub visible: usize,
    /// Number of selected options collapsed into the overflow chip
    pub hidden: usize,
}

impl ChipLayout {
    /// Text of the overflow chip, if there is anything hidden
    pub fn overflow_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{}...", self.hidden))
    }
}

/// Longest prefix of `selection` whose chip widths fit in `max_width`
///
/// Each chip costs `width(label) + padding`. The first chip that would push
/// the running total past the budget ends the prefix, even if a later,
/// shorter chip would still fit.
pub fn fit_chips<F>(selection: &[SelectOption], max_width: f32, padding: f32, mut width: F) -> ChipLayout
where
    F: FnMut(&str) -> f32,
{
    let mut used = 0.0;
    let mut visible = 0;

    for option in selection {
        let chip = width(&option.label) + padding;
        if used + chip > max_width {
            break;
        }
        used += chip;
        visible += 1;
    }

    ChipLayout {
        visible,
        hidden: selection.len() - visible,
    }
}

/// Measures chips with a lazily created, per-control measurement context
pub struct OverflowMeasurer {
    font: FontSpec,
    padding: f32,
    factory: MeasurerFactory,
    context: OnceCell<Box<dyn TextMeasurer>>,
}

impl std::fmt::Debug for OverflowMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverflowMeasurer")
            .field("font", &self.font)
            .field("padding", &self.padding)
            .field("context_created", &self.context.get().is_some())
            .finish()
    }
}

impl OverflowMeasurer {
    pub fn new(font: FontSpec, factory: MeasurerFactory) -> Self {
        Self {
            font,
            padding: CHIP_PADDING,
            factory,
            context: OnceCell::new(),
        }
    }

    /// The font chips are measured in
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    fn context(&self) -> &dyn TextMeasurer {
        self.context
            .get_or_init(|| {
                tracing::debug!(font = %self.font, "creating measurement context");
                (self.factory)(&self.font)
            })
            .as_ref()
    }

    /// Width of `label` in the reference font, or `chars * 8` if unavailable
    pub fn estimated_width(&self, label: &str) -> f32 {
        measure_width(self.context(), label, &self.font)
    }

    /// How many of `selection` fit in `max_width`
    pub fn layout(&self, selection: &[SelectOption], max_width: f32) -> ChipLayout {
        let layout = fit_chips(selection, max_width, self.padding, |label| {
            self.estimated_width(label)
        });
        tracing::trace!(?layout, max_width, "chip layout");
        layout
    }

    /// The selected options that are shown as chips
    pub fn visible_selected<'a>(
        &self,
        selection: &'a [SelectOption],
        max_width: f32,
    ) -> &'a [SelectOption] {
        let layout = self.layout(selection, max_width);
        &selection[..layout.visible]
    }
}
