//! Built-in demo data

use selecta_core::SelectOption;

use crate::config::DemoConfig;

/// The mock category list
pub fn mock_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Education", "education").icon("assets/education.png"),
        SelectOption::new("Science", "science").icon("assets/science.png"),
        SelectOption::new("Art", "art").icon("assets/art.png"),
        SelectOption::new("Sport", "sport").icon("assets/ball.png"),
        SelectOption::new("Games", "games").icon("assets/gamepad.png"),
        SelectOption::new("Health", "Health").icon("assets/health.png"),
    ]
}

/// Mock options with `Science` preselected
pub fn demo_config() -> DemoConfig {
    DemoConfig {
        options: mock_options(),
        default: Some(vec![SelectOption::new("Science", "science")]),
        max_width_selected_item: None,
        width: None,
    }
}
