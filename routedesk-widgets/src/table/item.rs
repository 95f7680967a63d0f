//! TableRow trait, cell values and column definitions.

use std::cmp::Ordering;

/// The value of one cell, as seen by filtering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// The row has no value for this column.
    Missing,
}

impl CellValue {
    /// Check if the cell has no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// The string a filter needle is matched against.
    ///
    /// Numbers render without a trailing `.0` when integral, so `42.0` shows
    /// (and filters) as `42`.
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Missing => None,
        }
    }

    /// Compare two present values. Numbers compare numerically, text
    /// lexicographically; mixed kinds put numbers first.
    ///
    /// Missing values are handled by the caller.
    pub(crate) fn compare_present(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Missing)
    }
}

/// Column configuration.
///
/// Columns are addressed by `key`, which is what [`TableRow::cell`] receives.
/// Sorting and filtering are opt-in per column.
///
/// # Examples
///
/// ```
/// use routedesk_widgets::table::Column;
///
/// let columns = vec![
///     Column::new("name", "Name").sortable().filterable(),
///     Column::new("email", "Email").filterable(),
///     Column::new("age", "Age").sortable(),
/// ];
/// assert!(!columns[1].sortable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Key passed to [`TableRow::cell`]
    pub key: String,
    /// Header text
    pub header: String,
    /// Whether sort requests on this column are honored
    pub sortable: bool,
    /// Whether filter requests on this column are honored
    pub filterable: bool,
}

impl Column {
    /// Create a column that neither sorts nor filters.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            filterable: false,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }
}

/// Trait for records displayed as table rows.
///
/// ```ignore
/// impl TableRow for User {
///     fn id(&self) -> String { self.id.clone() }
///
///     fn cell(&self, column: &str) -> CellValue {
///         match column {
///             "name" => self.name.as_str().into(),
///             "age" => self.age.into(),
///             _ => CellValue::Missing,
///         }
///     }
/// }
/// ```
pub trait TableRow: Send + Sync + Clone + 'static {
    /// Unique identifier for this row.
    ///
    /// Used for stable selection and flags across row replacements.
    fn id(&self) -> String;

    /// Value of the cell under `column`.
    fn cell(&self, column: &str) -> CellValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(42.0).display().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(1.5).display().as_deref(), Some("1.5"));
        assert_eq!(CellValue::Missing.display(), None);
    }

    #[test]
    fn test_option_into_cell() {
        assert_eq!(CellValue::from(Some(30u32)), CellValue::Number(30.0));
        assert_eq!(CellValue::from(None::<u32>), CellValue::Missing);
    }
}
