//! Immutable configuration snapshot for one search pass.

use super::flags::{Scope, SearchCategories};

/// Everything a [`SearchRunner`](super::SearchRunner) needs to know about the query.
///
/// The term is trimmed at construction time and kept folded to the current case
/// rule; matching code compares against it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Trimmed term as typed.
    raw_term: String,
    term: String,
    base_class: String,
    base_script: Option<String>,
    categories: SearchCategories,
    scope: Scope,
    case_sensitive: bool,
    show_hierarchy: bool,
}

impl SearchConfig {
    /// A case-insensitive, hierarchical search of every category in the related scope.
    pub fn new(term: &str, base_class: impl Into<String>) -> Self {
        Self {
            raw_term: term.trim().to_string(),
            term: String::new(),
            base_class: base_class.into(),
            base_script: None,
            categories: SearchCategories::ALL,
            scope: Scope::RELATED,
            case_sensitive: false,
            show_hierarchy: true,
        }
        .folded()
    }

    fn folded(mut self) -> Self {
        self.term = if self.case_sensitive {
            self.raw_term.clone()
        } else {
            self.raw_term.to_lowercase()
        };
        self
    }

    /// Builder: toggle case sensitivity, re-folding the term as typed.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self.folded()
    }

    pub fn with_base_script(mut self, identity: impl Into<String>) -> Self {
        let identity = identity.into();
        self.base_script = (!identity.is_empty()).then_some(identity);
        self
    }

    pub fn with_categories(mut self, categories: impl Into<SearchCategories>) -> Self {
        self.categories = categories.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_hierarchy(mut self, show_hierarchy: bool) -> Self {
        self.show_hierarchy = show_hierarchy;
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn base_class(&self) -> &str {
        &self.base_class
    }

    pub fn base_script(&self) -> Option<&str> {
        self.base_script.as_deref()
    }

    pub fn categories(&self) -> SearchCategories {
        self.categories
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn shows_hierarchy(&self) -> bool {
        self.show_hierarchy
    }
}
