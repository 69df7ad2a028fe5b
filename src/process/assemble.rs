// src/process/assemble.rs

use std::ops::Deref;

use super::NormalizedEntry;

/// Entries in page-discovery order, then table order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<NormalizedEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<NormalizedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NormalizedEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<NormalizedEntry> {
        self.entries
    }
}

impl Deref for Dataset {
    type Target = [NormalizedEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl FromIterator<NormalizedEntry> for Dataset {
    fn from_iter<I: IntoIterator<Item = NormalizedEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Concatenate per-page entries without sorting or deduplicating.
pub fn assemble<I>(pages: I) -> Dataset
where
    I: IntoIterator<Item = Vec<NormalizedEntry>>,
{
    pages.into_iter().flatten().collect()
}
