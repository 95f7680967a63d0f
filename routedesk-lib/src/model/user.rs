use routedesk_widgets::multi_select::SelectOption;
use routedesk_widgets::table::{CellValue, Column, TableRow};
use serde::{Deserialize, Serialize};

/// A visit recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl User {
    /// Columns of the user table.
    pub fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").sortable().filterable(),
            Column::new("email", "Email").sortable().filterable(),
            Column::new("age", "Age").sortable(),
        ]
    }

    /// The picker option for this user.
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id.clone(), self.name.clone())
    }
}

impl TableRow for User {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "age" => self.age.into(),
            "phone_number" => self.phone_number.as_deref().into(),
            _ => CellValue::Missing,
        }
    }
}
