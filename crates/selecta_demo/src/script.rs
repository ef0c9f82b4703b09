//! Scripted interaction steps
//!
//! Each `--step` names one host event to forward to the control.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use selecta_core::{normalize, Document, Key, PointerTarget, SelectControl};

/// One host event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// `type:<text>` - replace the search text
    Type(String),
    /// `enter` - Enter in the search input
    Enter,
    /// `escape` - Escape in the search input
    Escape,
    /// `click-field` - click the field region
    ClickField,
    /// `focus` - focus the search input
    Focus,
    /// `toggle:<label>` - click the option row with this label
    Toggle(String),
    /// `clear` - click the clear affordance
    Clear,
    /// `outside` - pointer press elsewhere on the page
    Outside,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(text) = s.strip_prefix("type:") {
            return Ok(Step::Type(text.to_string()));
        }
        if let Some(label) = s.strip_prefix("toggle:") {
            return Ok(Step::Toggle(label.to_string()));
        }

        match s {
            "enter" => Ok(Step::Enter),
            "escape" => Ok(Step::Escape),
            "click-field" => Ok(Step::ClickField),
            "focus" => Ok(Step::Focus),
            "clear" => Ok(Step::Clear),
            "outside" => Ok(Step::Outside),
            other => Err(format!(
                "unknown step {other:?} (expected type:<text>, enter, escape, click-field, \
                 focus, toggle:<label>, clear or outside)"
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Type(text) => write!(f, "type:{text}"),
            Step::Enter => f.write_str("enter"),
            Step::Escape => f.write_str("escape"),
            Step::ClickField => f.write_str("click-field"),
            Step::Focus => f.write_str("focus"),
            Step::Toggle(label) => write!(f, "toggle:{label}"),
            Step::Clear => f.write_str("clear"),
            Step::Outside => f.write_str("outside"),
        }
    }
}

impl Step {
    /// Forward this step to the control, then run deferred work
    pub fn apply(&self, control: &SelectControl, document: &Document) {
        debug!(step = %self, "applying step");

        match self {
            Step::Type(text) => control.input(text),
            Step::Enter => {
                control.key_down_input(&Key::Enter);
            }
            Step::Escape => {
                control.key_down_input(&Key::Escape);
            }
            Step::ClickField => {
                // The press lands inside the control before the click fires
                document.pointer_down(PointerTarget::Control(control.id()));
                control.click_field();
            }
            Step::Focus => control.focus_input(),
            Step::Toggle(label) => {
                let wanted = normalize(label);
                let option = control
                    .options()
                    .into_iter()
                    .find(|opt| normalize(&opt.label) == wanted);
                match option {
                    Some(option) => {
                        document.pointer_down(PointerTarget::Control(control.id()));
                        control.toggle(&option.value);
                    }
                    None => warn!(label = %label, "no option with this label"),
                }
            }
            Step::Clear => {
                document.pointer_down(PointerTarget::Control(control.id()));
                control.clear();
            }
            Step::Outside => document.pointer_down(PointerTarget::Page),
        }

        control.run_deferred();
    }
}
