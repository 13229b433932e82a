use std::collections::BTreeSet;

use crate::catalog::CatalogSnapshot;

/// Expands a requested admission category into the set of categories to search.
#[derive(Debug, Clone, Copy)]
pub struct CategoryResolver<'a> {
    snapshot: &'a CatalogSnapshot,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// `None` searches every known category. A known category contributes
    /// itself plus its fallback list; an unknown one is matched exactly.
    pub fn resolve(&self, requested: Option<&str>) -> BTreeSet<String> {
        let Some(code) = requested else {
            return self
                .snapshot
                .categories()
                .map(|category| category.code.clone())
                .collect();
        };

        let mut resolved = BTreeSet::from([code.to_string()]);
        if let Some(category) = self.snapshot.category(code) {
            resolved.extend(category.fallback.iter().cloned());
        }
        resolved
    }
}
