//! Search filtering

use crate::option::SelectOption;

/// Trim and lowercase, the form used for every label comparison
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Check if an option's label contains an already-normalized query
pub fn matches(option: &SelectOption, normalized_query: &str) -> bool {
    normalized_query.is_empty() || option.label.to_lowercase().contains(normalized_query)
}

/// Options whose label contains the search text, in store order
///
/// An empty or whitespace-only search returns every option.
pub fn visible_options<'a>(all: &'a [SelectOption], search_text: &str) -> Vec<&'a SelectOption> {
    let query = normalize(search_text);
    all.iter().filter(|opt| matches(opt, &query)).collect()
}
