//! Keyword record filters for tagging runs.

use kwfit_config::{Client, ConfigError, DomainPatterns};

use crate::KeywordRecord;

/// Restricts a run to records from one location and/or matching domain globs.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    /// Location, compared case-insensitively.
    location: Option<String>,
    /// Domain globs.
    domains: DomainPatterns,
}

impl KeywordFilter {
    /// A filter that accepts every record.
    pub fn all() -> Self {
        Self {
            location: None,
            domains: DomainPatterns::default(),
        }
    }

    /// Builds a filter from an optional location and domain globs.
    pub fn new<S: AsRef<str>>(location: Option<&str>, domains: &[S]) -> Result<Self, ConfigError> {
        Ok(Self {
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            domains: DomainPatterns::compile(domains)?,
        })
    }

    /// Builds a filter from a client's configured defaults.
    pub fn for_client(client: &Client) -> Result<Self, ConfigError> {
        Self::new(client.location.as_deref(), &client.domains)
    }

    /// Returns true if the record passes both filters.
    ///
    /// Records without a location fail a location filter.
    pub fn matches(&self, record: &KeywordRecord) -> bool {
        let location_ok = match (&self.location, &record.location) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(want), Some(have)) => want.eq_ignore_ascii_case(have.trim()),
        };
        location_ok && self.domains.matches(record.domain.as_deref())
    }

    /// Returns true if the filter accepts every record.
    pub fn is_unrestricted(&self) -> bool {
        self.location.is_none() && self.domains.is_unrestricted()
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::all()
    }
}
