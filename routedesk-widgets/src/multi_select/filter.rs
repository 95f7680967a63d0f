//! Narrowing the static option set by what the user typed.
//!
//! Only used when no search source is attached; remote results are shown as
//! the source returns them.

use std::cmp::Reverse;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::SelectOption;

/// Options whose label fuzzy-matches `query`, best match first.
///
/// Whitespace splits the query into words that may match in any order, so
/// "ruiz ana" finds "Ana Ruiz". Equal scores keep list order. A blank query
/// keeps every option.
pub(crate) fn narrow_options(query: &str, options: &[SelectOption]) -> Vec<SelectOption> {
    if query.trim().is_empty() {
        return options.to_vec();
    }

    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();

    let mut scored: Vec<(u32, &SelectOption)> = options
        .iter()
        .filter_map(|option| {
            let label = Utf32Str::new(&option.label, &mut buf);
            pattern
                .score(label, &mut matcher)
                .map(|score| (score, option))
        })
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    scored.into_iter().map(|(_, option)| option.clone()).collect()
}
