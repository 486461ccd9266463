//! manifest/filter — listing filter over manifest entries.
//!
//! Text fields (tag, ip, url) match by case-insensitive substring; method
//! matches exactly (case-insensitive); flags and counters match exactly.
//! Unset fields match everything. Manifest order is preserved.

use super::{Manifest, ManifestEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFilter {
    pub tag: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub ajax: Option<bool>,
    pub status_code: Option<u16>,
    pub sql_count: Option<u64>,
    pub mail_count: Option<u64>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

impl ManifestFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, tag: &str, e: &ManifestEntry) -> bool {
        if let Some(t) = &self.tag {
            if !contains_ci(tag, t) {
                return false;
            }
        }
        if let Some(ip) = &self.ip {
            if !contains_ci(&e.ip, ip) {
                return false;
            }
        }
        if let Some(url) = &self.url {
            if !contains_ci(&e.url, url) {
                return false;
            }
        }
        if let Some(m) = &self.method {
            if !e.method.eq_ignore_ascii_case(m) {
                return false;
            }
        }
        if let Some(a) = self.ajax {
            if e.ajax != a {
                return false;
            }
        }
        if self.status_code.is_some() && e.status_code != self.status_code {
            return false;
        }
        if self.sql_count.is_some() && e.sql_count != self.sql_count {
            return false;
        }
        if self.mail_count.is_some() && e.mail_count != self.mail_count {
            return false;
        }
        true
    }

    /// Matching rows, most recent first.
    pub fn apply<'m>(&self, manifest: &'m Manifest) -> Vec<(&'m str, &'m ManifestEntry)> {
        manifest.iter().filter(|(t, e)| self.matches(t, e)).collect()
    }
}
