use std::time::Duration;

use routedesk_widgets::multi_select::MultiSelectConfig;
use routedesk_widgets::table::{DEFAULT_PAGE_SIZE, TableConfig};

use crate::model::SPECIALTY;

/// Configuration for a [`Dashboard`](super::Dashboard).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Rows per page in the user table.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Maximum number of users in one benchmark (None = unlimited).
    pub max_users: Option<usize>,

    /// Quiet interval before the user picker searches.
    ///
    /// Default: 500 ms
    pub search_debounce: Duration,

    /// Search users through the API instead of filtering the loaded list.
    pub remote_user_search: bool,

    /// Attribute doctors are grouped by.
    ///
    /// Default: "specialty"
    pub doctor_group_by: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_users: None,
            search_debounce: Duration::from_millis(500),
            remote_user_search: false,
            doctor_group_by: SPECIALTY.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn with_max_users(mut self, max: usize) -> Self {
        self.max_users = Some(max);
        self
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    pub fn remote_user_search(mut self) -> Self {
        self.remote_user_search = true;
        self
    }

    pub fn with_doctor_group_by(mut self, key: impl Into<String>) -> Self {
        self.doctor_group_by = key.into();
        self
    }

    pub(super) fn table_config(&self) -> TableConfig {
        let config = TableConfig::default().with_page_size(self.page_size);
        match self.max_users {
            Some(max) => config.with_max_selected(max),
            None => config,
        }
    }

    pub(super) fn picker_config(&self) -> MultiSelectConfig {
        let config = MultiSelectConfig::default().with_debounce_delay(self.search_debounce);
        match self.max_users {
            Some(max) => config.with_max_selected(max),
            None => config,
        }
    }
}
