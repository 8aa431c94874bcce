//! Static city to airport lookup

use crate::config::AirportEntry;

/// Read-only table mapping destination names to IATA codes
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    entries: Vec<AirportEntry>,
}

impl AirportDirectory {
    #[must_use]
    pub fn new(entries: Vec<AirportEntry>) -> Self {
        Self { entries }
    }

    /// Resolve a destination to its airport code.
    ///
    /// City names match exactly, including case; only surrounding whitespace
    /// is ignored.
    #[must_use]
    pub fn code_for(&self, city: &str) -> Option<&str> {
        let city = city.trim();
        self.entries
            .iter()
            .find(|entry| entry.city == city)
            .map(|entry| entry.code.as_str())
    }
}
