//! Relevance scoring for created result items.
//!
//! Items where the term sits close to the start of the text score higher, and
//! shorter texts (closer in length to the term) get a small bonus. A term found
//! in a text at least as long as itself scores in `(0, 1]`; a term longer than
//! the text can push the length bonus past 1.

use super::matching::TermMatcher;

/// Weight of the position penalty.
const POSITION_WEIGHT: f64 = 0.5;
/// Weight of the length bonus.
const LENGTH_WEIGHT: f64 = 0.1;
/// Base score when the term does not occur in the text at all.
const UNMATCHED_BASE: f64 = 0.9 - POSITION_WEIGHT;

/// Score `text` against the matcher's term.
///
/// Positions and lengths are counted in characters of the case-folded text.
pub fn match_score(matcher: &TermMatcher<'_>, text: &str) -> f64 {
    let folded = matcher.fold(text);
    let term = matcher.term();
    let length = folded.chars().count().max(1) as f64;

    let base = match folded.find(term) {
        Some(byte_pos) => {
            let pos = folded[..byte_pos].chars().count() as f64;
            1.0 - POSITION_WEIGHT * (3.0 * pos / length).min(1.0)
        }
        None => UNMATCHED_BASE,
    };

    let term_length = term.chars().count() as f64;
    base * ((1.0 - LENGTH_WEIGHT) + LENGTH_WEIGHT * (term_length / length))
}

/// Running best match: the first item with the highest score wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<H> {
    best: Option<(H, f64)>,
}

impl<H> Default for BestMatch<H> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<H: Copy> BestMatch<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate. Returns true when it became the new best.
    pub fn offer(&mut self, item: H, score: f64) -> bool {
        let replace = self.best.is_none_or(|(_, best)| score > best);
        if replace {
            self.best = Some((item, score));
        }
        replace
    }

    pub fn item(&self) -> Option<H> {
        self.best.map(|(item, _)| item)
    }

    pub fn score(&self) -> Option<f64> {
        self.best.map(|(_, score)| score)
    }

    pub fn reset(&mut self) {
        self.best = None;
    }
}
