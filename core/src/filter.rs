//! # Result Filter
//!
//! Keeps the probe records matching a [`FilterPredicate`], in input order.
//!
//! * status codes match by substring against the joined status field, so a
//!   filter of `200` keeps `"301,200"`,
//! * title keywords match case-insensitively by substring,
//! * an empty list on either side always matches.

use subrefine_common::models::{Combine, FilterPredicate, ProbeRecord};
use tracing::info;

pub fn filter(records: &[ProbeRecord], predicate: &FilterPredicate) -> Vec<ProbeRecord> {
    let keywords: Vec<String> = predicate
        .title_keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect();

    let kept: Vec<ProbeRecord> = records
        .iter()
        .filter(|record| {
            let status = status_matches(record, &predicate.status_codes);
            let title = title_matches(record, &keywords);
            match predicate.combine {
                Combine::And => status && title,
                Combine::Or => status || title,
            }
        })
        .map(|record| emit(record, predicate.include_redirect))
        .collect();

    info!("Filter kept {} of {} records", kept.len(), records.len());
    kept
}

fn status_matches(record: &ProbeRecord, codes: &[String]) -> bool {
    if codes.is_empty() {
        return true;
    }
    let joined = record.status_codes.to_string();
    codes.iter().any(|code| joined.contains(code.as_str()))
}

/// `keywords` must already be lowercase.
fn title_matches(record: &ProbeRecord, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let title = record.title.to_lowercase();
    keywords.iter().any(|keyword| title.contains(keyword.as_str()))
}

fn emit(record: &ProbeRecord, include_redirect: bool) -> ProbeRecord {
    let mut kept = record.clone();
    if !include_redirect {
        kept.redirect_url = None;
    }
    kept
}
