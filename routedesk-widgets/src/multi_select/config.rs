//! MultiSelect configuration.

use std::time::Duration;

use super::SelectOption;

/// Default quiet interval before a typed query is searched.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Configuration for a [`MultiSelect`](super::MultiSelect).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use routedesk_widgets::multi_select::MultiSelectConfig;
///
/// let config = MultiSelectConfig::default()
///     .with_max_selected(5)
///     .with_group_by("specialty")
///     .with_debounce_delay(Duration::from_millis(250));
/// assert_eq!(config.max_selected, Some(5));
/// ```
#[derive(Debug, Clone)]
pub struct MultiSelectConfig {
    /// Quiet interval after the last keystroke before searching.
    ///
    /// Default: 500 ms
    pub debounce_delay: Duration,

    /// Maximum number of selected options (None = unlimited).
    pub max_selected: Option<usize>,

    /// Search as soon as the input gains focus, even with an empty query.
    pub trigger_search_on_focus: bool,

    /// Attribute key used to group options. None puts everything in one group.
    pub group_by: Option<String>,

    /// Ignore all user interaction.
    pub disabled: bool,

    /// Offer the typed text as a new option when nothing matches it exactly.
    pub creatable: bool,

    /// Options shown before any search or static option list arrives.
    pub default_options: Vec<SelectOption>,
}

impl Default for MultiSelectConfig {
    fn default() -> Self {
        Self {
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            max_selected: None,
            trigger_search_on_focus: false,
            group_by: None,
            disabled: false,
            creatable: false,
            default_options: Vec::new(),
        }
    }
}

impl MultiSelectConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Sets the selection limit.
    pub fn with_max_selected(mut self, max: usize) -> Self {
        self.max_selected = Some(max);
        self
    }

    /// Searches immediately on focus.
    pub fn trigger_search_on_focus(mut self) -> Self {
        self.trigger_search_on_focus = true;
        self
    }

    /// Groups options by an attribute key.
    pub fn with_group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    /// Starts the widget disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Allows creating options from the typed text.
    pub fn creatable(mut self) -> Self {
        self.creatable = true;
        self
    }

    /// Sets the options shown before anything else is loaded.
    pub fn with_default_options(mut self, options: Vec<SelectOption>) -> Self {
        self.default_options = options;
        self
    }
}
