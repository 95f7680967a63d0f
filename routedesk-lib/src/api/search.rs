use std::sync::Arc;

use async_trait::async_trait;
use routedesk_widgets::multi_select::{OptionSource, SearchError, SelectOption};

use super::DashboardApi;

/// Remote user search for the user picker.
///
/// Matches user names case-insensitively by substring; an empty query
/// returns every user.
#[derive(Clone)]
pub struct UserSearch {
    api: Arc<dyn DashboardApi>,
}

impl UserSearch {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OptionSource for UserSearch {
    async fn search(&self, query: &str) -> Result<Vec<SelectOption>, SearchError> {
        let needle = query.to_lowercase();
        let users = self.api.list_users().await?;
        Ok(users
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .map(|u| u.to_option())
            .collect())
    }
}
