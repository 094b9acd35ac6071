//! Domain filter pattern compilation and matching.
//!
//! Client definitions and the `--domain` flag restrict tagging runs to keyword records
//! whose source domain matches a glob such as `*.acme.com`.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::ConfigError;

/// Compiled domain globs.
///
/// An empty pattern list matches every domain, including records without one.
#[derive(Debug, Clone, Default)]
pub struct DomainPatterns {
    /// Compiled matcher, `None` when no patterns were given.
    set: Option<GlobSet>,
}

impl DomainPatterns {
    /// Compiles domain globs. Matching is case-insensitive.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(false)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: String::from("<combined domain patterns>"),
                source,
            })?;

        Ok(Self { set: Some(set) })
    }

    /// Returns true when no patterns restrict the match.
    pub fn is_unrestricted(&self) -> bool {
        self.set.is_none()
    }

    /// Checks a record's domain against the patterns.
    ///
    /// Records without a domain only pass an unrestricted filter.
    pub fn matches(&self, domain: Option<&str>) -> bool {
        match (&self.set, domain) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(set), Some(domain)) => set.is_match(domain.trim()),
        }
    }
}
