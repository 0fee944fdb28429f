use std::fmt;

/// Status codes found in the first bracket group of a probe line.
///
/// Rendered comma-joined (`"301,200"`), or as [`StatusCodes::UNKNOWN`] when the
/// group held no numeric token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCodes(Vec<String>);

impl StatusCodes {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(codes: Vec<String>) -> Self {
        Self(codes)
    }

    pub fn unknown() -> Self {
        Self(Vec::new())
    }

    /// Reads back the rendered form produced by [`fmt::Display`].
    pub fn from_joined(joined: &str) -> Self {
        let joined = joined.trim();
        if joined.is_empty() || joined == Self::UNKNOWN {
            return Self::unknown();
        }
        Self(
            joined
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for StatusCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(Self::UNKNOWN)
        } else {
            f.write_str(&self.0.join(","))
        }
    }
}

/// One successfully parsed line of probe tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    /// Always starts with `http://` or `https://`.
    pub url: String,
    pub status_codes: StatusCodes,
    /// May be empty.
    pub title: String,
    /// `None` when the line carried no (or an empty) redirect group.
    pub redirect_url: Option<String>,
}

impl ProbeRecord {
    /// A URL-only record: unknown status, empty title, no redirect.
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_codes: StatusCodes::unknown(),
            title: String::new(),
            redirect_url: None,
        }
    }

    pub fn new(
        url: impl Into<String>,
        status_codes: StatusCodes,
        title: impl Into<String>,
        redirect_url: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            status_codes,
            title: title.into(),
            redirect_url: redirect_url.filter(|redirect| !redirect.is_empty()),
        }
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|redirect| !redirect.is_empty())
    }

    pub fn has_redirect(&self) -> bool {
        self.redirect().is_some()
    }
}
