// src/watch/filter.rs

//! Suffix allow-list deciding which file events are relevant.

use std::path::Path;

/// Plain, case-sensitive suffix match against the full path.
///
/// This is not an extension match: a suffix of `"log"` accepts `a.log` and
/// also `catalog`. Include the dot (`".log"`) to match extensions only. An
/// empty filter matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn matches(&self, path: &Path) -> bool {
        let bytes = path.as_os_str().as_encoded_bytes();
        self.suffixes
            .iter()
            .any(|suffix| bytes.ends_with(suffix.as_bytes()))
    }
}
