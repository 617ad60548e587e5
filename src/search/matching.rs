//! Term matching rules for class and member names.

use super::config::SearchConfig;
use std::borrow::Cow;

/// Matches names against the (already normalized) search term.
///
/// Plain names use substring containment. Callables (constructors, methods,
/// operators) additionally understand call-site syntax in the term: `.get`
/// matches names starting with `get`, `child(` matches names ending with
/// `child`, and `.get_child(` matches exactly `get_child`.
#[derive(Debug, Clone, Copy)]
pub struct TermMatcher<'t> {
    term: &'t str,
    case_sensitive: bool,
}

impl<'t> TermMatcher<'t> {
    pub fn new(term: &'t str, case_sensitive: bool) -> Self {
        Self {
            term,
            case_sensitive,
        }
    }

    pub fn from_config(config: &'t SearchConfig) -> Self {
        Self::new(config.term(), config.is_case_sensitive())
    }

    pub fn term(&self) -> &'t str {
        self.term
    }

    /// Case-folds `text` the same way the term was folded.
    pub fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.fold(text).contains(self.term)
    }

    pub fn matches_callable(&self, name: &str) -> bool {
        let name = self.fold(name);
        let term = self.term;

        if name.contains(term) {
            return true;
        }
        let dotted = term.strip_prefix('.');
        let called = term.strip_suffix('(');

        if let Some(prefix) = dotted
            && name.starts_with(prefix)
        {
            return true;
        }
        if let Some(suffix) = called
            && name.ends_with(suffix.trim())
        {
            return true;
        }
        if let Some(exact) = dotted.and_then(|rest| rest.strip_suffix('('))
            && name.as_ref() == exact.trim()
        {
            return true;
        }
        false
    }
}
