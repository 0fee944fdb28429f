//! # Host Entries
//!
//! A host entry is a bare `hostname` or `hostname:port`, no scheme and no path.
//! Entries are collected from every input file into a single [`HostSet`], which
//! keeps them unique (exact, case-sensitive match) and lexicographically sorted.

use std::collections::BTreeSet;

/// Sorted, duplicate-free collection of host entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSet {
    hosts: BTreeSet<String>,
}

impl HostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a host, ignoring empty strings. Returns `true` if it was new.
    pub fn insert<S: Into<String>>(&mut self, host: S) -> bool {
        let host: String = host.into();
        if host.is_empty() {
            return false;
        }
        self.hosts.insert(host)
    }

    /// Union with another set, consuming it.
    pub fn absorb(&mut self, other: HostSet) {
        self.hosts.extend(other.hosts);
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Hosts in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for HostSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = HostSet::new();
        for host in iter {
            set.insert(host);
        }
        set
    }
}
