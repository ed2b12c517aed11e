//! Per-page grouping of the ledger
//!
//! The grouping is derived data: [`project`] rebuilds it from scratch in one pass, and
//! [`PageIndex`] memoizes the id layout against the ledger version so repeated lookups
//! between mutations cost nothing.

use crate::ledger::Ledger;
use comment_model::{Annotation, AnnotationId};
use std::collections::{BTreeMap, HashMap};

/// Annotations grouped by page number, pages ascending, ledger order within a page.
pub type PageGroups<'a> = BTreeMap<u32, Vec<&'a Annotation>>;

/// Group the ledger by page.
pub fn project(ledger: &Ledger) -> PageGroups<'_> {
    let mut groups: PageGroups<'_> = BTreeMap::new();
    for annotation in ledger.annotations() {
        groups.entry(annotation.page_number()).or_default().push(annotation);
    }
    groups
}

/// Memoized page layout of the ledger, keyed by ledger version.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    version: Option<u64>,
    pages: BTreeMap<u32, Vec<AnnotationId>>,
    page_of: HashMap<AnnotationId, u32>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild if the ledger changed since the last sync. Returns true when rebuilt.
    pub fn sync(&mut self, ledger: &Ledger) -> bool {
        if self.version == Some(ledger.version()) {
            return false;
        }

        self.pages.clear();
        self.page_of.clear();
        for (page, annotations) in project(ledger) {
            let ids: Vec<AnnotationId> =
                annotations.iter().map(|annotation| annotation.id().clone()).collect();
            for id in &ids {
                self.page_of.insert(id.clone(), page);
            }
            self.pages.insert(page, ids);
        }
        self.version = Some(ledger.version());
        true
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.page_of.contains_key(id)
    }

    pub fn page_of(&self, id: &AnnotationId) -> Option<u32> {
        self.page_of.get(id).copied()
    }

    pub fn pages(&self) -> &BTreeMap<u32, Vec<AnnotationId>> {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.page_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page_of.is_empty()
    }
}
