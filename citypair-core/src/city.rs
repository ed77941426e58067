use std::collections::HashMap;

use crate::error::LookupError;

/// Canonical identifier of a measurement endpoint, e.g. `US-NY-NEWYORK`.
pub type CityCode = String;

/// Case-insensitive lookup from city abbreviations and full names to codes.
/// The tables are supplied by the caller; nothing here invents entries.
#[derive(Debug, Default, Clone)]
pub struct CityDirectory {
    abbrevs: HashMap<String, CityCode>,
    names: HashMap<String, CityCode>,
}

impl CityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_abbrev(&mut self, abbrev: &str, code: &str) {
        self.abbrevs
            .insert(abbrev.to_uppercase(), code.to_uppercase());
    }

    pub fn add_name(&mut self, name: &str, code: &str) {
        self.names.insert(name.to_uppercase(), code.to_uppercase());
    }

    pub fn resolve_abbrev(&self, abbrev: &str) -> Result<CityCode, LookupError> {
        self.abbrevs
            .get(&abbrev.to_uppercase())
            .cloned()
            .ok_or_else(|| LookupError::Abbreviation(abbrev.to_string()))
    }

    pub fn resolve_name(&self, name: &str) -> Result<CityCode, LookupError> {
        self.names
            .get(&name.to_uppercase())
            .cloned()
            .ok_or_else(|| LookupError::CityName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let mut cities = CityDirectory::new();
        cities.add_abbrev("ny", "us-ny-newyork");
        cities.add_name("New York", "US-NY-NEWYORK");

        assert_eq!(cities.resolve_abbrev("NY").unwrap(), "US-NY-NEWYORK");
        assert_eq!(cities.resolve_abbrev("Ny").unwrap(), "US-NY-NEWYORK");
        assert_eq!(cities.resolve_name("new york").unwrap(), "US-NY-NEWYORK");
    }

    #[test]
    fn unknown_entries_fail() {
        let cities = CityDirectory::new();
        assert_eq!(
            cities.resolve_abbrev("ZZ"),
            Err(LookupError::Abbreviation("ZZ".to_string()))
        );
        assert_eq!(
            cities.resolve_name("Nowhere"),
            Err(LookupError::CityName("Nowhere".to_string()))
        );
    }
}
