//! Single-line parsing.
//!
//! A line moves through four steps, each of which either hands its result to
//! the next one or ends the line:
//!
//! 1. strip ANSI colors ([`super::ansi::strip_sgr`]),
//! 2. take the leading `http(s)://` token as the URL ([`Unmatched::NoUrl`] otherwise),
//! 3. collect the `[...]` groups after it, left to right,
//! 4. classify the groups by count into a [`BracketLayout`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use subrefine_common::models::{ProbeRecord, StatusCodes};

use super::ansi;

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+").expect("URL pattern is valid"));
static BRACKET_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"));
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Nothing but whitespace.
    Blank,
    Record(ProbeRecord),
    Unmatched(Unmatched),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmatched {
    /// The line does not start with an `http://` or `https://` token.
    NoUrl,
}

impl fmt::Display for Unmatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmatched::NoUrl => f.write_str("no leading http(s) URL"),
        }
    }
}

/// Meaning of the bracket groups, by position: status, title, redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketLayout<'a> {
    Bare,
    Status(&'a str),
    Full {
        status: &'a str,
        title: &'a str,
        redirect: Option<&'a str>,
    },
}

impl<'a> BracketLayout<'a> {
    pub fn classify(groups: &[&'a str]) -> Self {
        match *groups {
            [] => Self::Bare,
            [status] => Self::Status(status),
            [status, title] => Self::Full {
                status,
                title,
                redirect: None,
            },
            [status, title, redirect, ..] => Self::Full {
                status,
                title,
                redirect: Some(redirect),
            },
        }
    }

    fn into_record(self, url: &str) -> ProbeRecord {
        match self {
            Self::Bare => ProbeRecord::bare(url),
            Self::Status(status) => ProbeRecord::new(url, status_codes(status), "", None),
            Self::Full {
                status,
                title,
                redirect,
            } => ProbeRecord::new(url, status_codes(status), title, redirect.map(String::from)),
        }
    }
}

pub fn parse_line(raw: &str) -> LineOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineOutcome::Blank;
    }

    let clean = ansi::strip_sgr(trimmed);
    let clean = clean.trim_start();

    let Some((url, rest)) = take_url(clean) else {
        return LineOutcome::Unmatched(Unmatched::NoUrl);
    };
    let groups = bracket_groups(rest);

    LineOutcome::Record(BracketLayout::classify(&groups).into_record(url))
}

fn take_url(clean: &str) -> Option<(&str, &str)> {
    let found = URL_TOKEN.find(clean)?;
    Some((found.as_str(), &clean[found.end()..]))
}

fn bracket_groups(rest: &str) -> Vec<&str> {
    BRACKET_GROUP
        .captures_iter(rest)
        .filter_map(|caps| caps.get(1))
        .map(|group| group.as_str())
        .collect()
}

/// Every digit run in the group, in order. `"[302,200]"` gives `302,200`.
fn status_codes(group: &str) -> StatusCodes {
    StatusCodes::new(
        DIGITS
            .find_iter(group)
            .map(|digits| digits.as_str().to_string())
            .collect(),
    )
}
