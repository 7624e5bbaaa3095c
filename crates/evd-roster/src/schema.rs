use std::collections::BTreeMap;

/// Canonical roster column names. Matching is exact and case-sensitive.
pub const FIELD_NAME: &str = "Name";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_ROLE: &str = "Role";
pub const FIELD_STATUS: &str = "Status";
pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_PHONE: &str = "Phone";
pub const FIELD_ASSIGNED_TASKS: &str = "Assigned Tasks";

/// Header row written by `roster init`. Operators may reorder or extend
/// it afterwards; only presence of the required fields matters.
pub const ROSTER_HEADERS: &[&str] = &[
    FIELD_NAME,
    FIELD_CATEGORY,
    FIELD_ROLE,
    FIELD_STATUS,
    FIELD_EMAIL,
    FIELD_PHONE,
    FIELD_ASSIGNED_TASKS,
];

/// Fields the reconciler cannot operate without.
pub const REQUIRED_FIELDS: &[&str] = &[FIELD_NAME, FIELD_CATEGORY, FIELD_EMAIL];

/// Ordered field names read from the header row, plus an optional map
/// of canonical name -> actual header for rosters whose operator
/// renamed a column (e.g. Role hosted as "Position").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSchema {
    fields: Vec<String>,
    column_names: BTreeMap<String, String>,
}

impl RosterSchema {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            column_names: BTreeMap::new(),
        }
    }

    pub fn canonical() -> Self {
        Self::new(ROSTER_HEADERS.iter().map(|s| s.to_string()).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Install canonical-name -> actual-header overrides. Lookups by
    /// canonical name then resolve through the map.
    pub fn set_column_names(&mut self, map: BTreeMap<String, String>) {
        self.column_names = map;
    }

    /// Column position of a field, by exact name match after applying
    /// any column-name override.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        let actual = self
            .column_names
            .get(name)
            .map(String::as_str)
            .unwrap_or(name);
        self.fields.iter().position(|f| f == actual)
    }

    /// Canonical name for a header, undoing a column-name override.
    /// Headers without an override map to themselves.
    pub fn canonical_name<'a>(&'a self, header: &'a str) -> &'a str {
        self.column_names
            .iter()
            .find(|(_, actual)| actual.as_str() == header)
            .map(|(canonical, _)| canonical.as_str())
            .unwrap_or(header)
    }

    /// Required fields absent from this schema, in declaration order.
    /// Empty means the roster is usable for reconciliation.
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|f| self.field_index(f).is_none())
            .map(|f| f.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_index_is_positional_not_fixed() {
        let s = RosterSchema::new(vec![
            "Email".to_string(),
            "Name".to_string(),
            "Category".to_string(),
        ]);
        assert_eq!(s.field_index("Email"), Some(0));
        assert_eq!(s.field_index("Name"), Some(1));
        assert_eq!(s.field_index("Phone"), None);
    }

    #[test]
    fn field_index_is_case_sensitive() {
        let s = RosterSchema::canonical();
        assert_eq!(s.field_index("email"), None);
        assert!(s.field_index("Email").is_some());
    }

    #[test]
    fn column_name_override_resolves_renamed_header() {
        let mut s = RosterSchema::new(vec![
            "Name".to_string(),
            "Position".to_string(),
            "Email".to_string(),
        ]);
        assert_eq!(s.field_index("Role"), None);

        let mut map = BTreeMap::new();
        map.insert("Role".to_string(), "Position".to_string());
        s.set_column_names(map);

        assert_eq!(s.field_index("Role"), Some(1));
        assert_eq!(s.canonical_name("Position"), "Role");
        assert_eq!(s.canonical_name("Name"), "Name");
    }

    #[test]
    fn missing_required_reports_all_gaps() {
        let s = RosterSchema::new(vec!["Name".to_string(), "Phone".to_string()]);
        assert_eq!(s.missing_required(), vec!["Category", "Email"]);
        assert!(RosterSchema::canonical().missing_required().is_empty());
    }
}
