use crate::config::FilterConfig;

/// How the status-code and title predicates are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    #[default]
    And,
    Or,
}

/// Selection criteria applied to each probe record by the result filter.
///
/// An empty `status_codes` or `title_keywords` list always matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPredicate {
    pub status_codes: Vec<String>,
    pub title_keywords: Vec<String>,
    pub combine: Combine,
    pub include_redirect: bool,
}

impl FilterPredicate {
    /// Predicate that retains every record.
    pub fn match_all() -> Self {
        Self {
            include_redirect: true,
            ..Self::default()
        }
    }
}

impl From<&FilterConfig> for FilterPredicate {
    fn from(cfg: &FilterConfig) -> Self {
        Self {
            status_codes: cfg.status_codes.items().to_vec(),
            title_keywords: cfg.title_keywords.items().to_vec(),
            combine: if cfg.logic_and { Combine::And } else { Combine::Or },
            include_redirect: cfg.include_redirect,
        }
    }
}
