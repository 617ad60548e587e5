//! Incremental fuzzy search over the class documentation graph.
//!
//! A [`SearchRunner`] is bound to one [`SearchConfig`] snapshot and a
//! [`SearchContext`] of read-only collaborators, then driven to completion with
//! repeated time-boxed [`work`](crate::task::IncrementalTask::work) calls.

pub(crate) mod config;
pub(crate) mod flags;
pub(crate) mod matching;
pub(crate) mod runner;
pub(crate) mod scoring;

pub use config::SearchConfig;
pub use flags::{CategoryFilter, Scope, ScopeFilter, SearchCategories};
pub use matching::TermMatcher;
pub use runner::{
    ClassMatch, ClassOrigin, MethodSource, SearchContext, SearchPhase, SearchRunner,
};
pub use scoring::{BestMatch, match_score};
