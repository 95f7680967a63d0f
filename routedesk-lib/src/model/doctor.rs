use routedesk_widgets::multi_select::SelectOption;
use serde::{Deserialize, Serialize};

/// Attribute key doctors are grouped by in pickers.
pub const SPECIALTY: &str = "specialty";

/// A service provider; the start point of every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Doctor {
    /// The picker option for this doctor, carrying its specialty.
    pub fn to_option(&self) -> SelectOption {
        let option = SelectOption::new(self.id.clone(), self.name.clone());
        match &self.specialty {
            Some(specialty) => option.with_attribute(SPECIALTY, specialty.clone()),
            None => option,
        }
    }
}
