//! Class inheritance graph and feature-profile gating.

use crate::docs::DocStore;
use crate::error::{LoadError, Result, read_file};
use ahash::{AHashMap, AHashSet};
use rapidfuzz::distance::jaro_winkler;
use serde::Deserialize;
use std::path::Path;

/// Upper bound on ancestor walks; a longer chain means the graph has a cycle.
pub const MAX_INHERITANCE_DEPTH: usize = 256;

/// Root class of every registered engine class.
pub const OBJECT_CLASS: &str = "Object";

/// Read-only view of the registered class hierarchy.
pub trait ClassGraph {
    /// Direct parent of a class, or `None` for roots and unknown classes.
    fn parent_of(&self, class_name: &str) -> Option<&str>;

    /// Whether the class is registered.
    fn exists(&self, class_name: &str) -> bool;

    /// All strict descendants of a class.
    fn descendants_of(&self, class_name: &str) -> AHashSet<String>;

    /// Every registered class name, in no particular order.
    fn class_names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Closest registered class name by Jaro-Winkler similarity.
    fn suggest(&self, class_name: &str) -> Option<(&str, f64)> {
        self.class_names()
            .map(|candidate| {
                let score = jaro_winkler::similarity(class_name.chars(), candidate.chars());
                (candidate, score)
            })
            .max_by(|(a_name, a), (b_name, b)| a.total_cmp(b).then_with(|| b_name.cmp(a_name)))
    }

    /// Whether `ancestor` appears strictly above `class_name` in its parent chain.
    fn is_ancestor(&self, ancestor: &str, class_name: &str) -> bool {
        let mut current = self.parent_of(class_name);
        let mut depth = 0;
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            depth += 1;
            if depth > MAX_INHERITANCE_DEPTH {
                tracing::warn!("Inheritance chain of '{}' does not terminate", class_name);
                return false;
            }
            current = self.parent_of(name);
        }
        false
    }
}

/// In-memory class hierarchy.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    parents: AHashMap<String, Option<String>>,
    children: AHashMap<String, Vec<String>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every class of a documentation store, wiring parents from `inherits`.
    pub fn from_docs(docs: &DocStore) -> Self {
        let mut hierarchy = Self::new();
        for doc in docs.iter() {
            hierarchy.register(&doc.name, doc.parent());
        }
        tracing::debug!("Built class hierarchy with {} classes", hierarchy.len());
        hierarchy
    }

    /// Register a class. Re-registering replaces its parent edge.
    pub fn register(&mut self, class_name: &str, parent: Option<&str>) {
        let parent = parent.filter(|p| !p.is_empty()).map(String::from);

        if let Some(Some(old_parent)) = self.parents.get(class_name)
            && let Some(siblings) = self.children.get_mut(old_parent)
        {
            siblings.retain(|child| child != class_name);
        }

        if let Some(ref parent) = parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(class_name.to_string());
        }
        self.parents.insert(class_name.to_string(), parent);
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl ClassGraph for ClassHierarchy {
    fn parent_of(&self, class_name: &str) -> Option<&str> {
        self.parents.get(class_name)?.as_deref()
    }

    fn exists(&self, class_name: &str) -> bool {
        self.parents.contains_key(class_name)
    }

    fn class_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.parents.keys().map(String::as_str))
    }

    fn descendants_of(&self, class_name: &str) -> AHashSet<String> {
        let mut found = AHashSet::new();
        let mut pending = vec![class_name];
        while let Some(current) = pending.pop() {
            for child in self.children.get(current).into_iter().flatten() {
                if child != class_name && found.insert(child.clone()) {
                    pending.push(child);
                }
            }
        }
        found
    }
}

/// Administrative allow/deny list over classes.
pub trait FeatureProfile {
    fn is_class_disabled(&self, class_name: &str) -> bool;
}

/// Feature profile backed by an explicit set of disabled classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisabledClasses {
    #[serde(default)]
    disabled_classes: AHashSet<String>,
}

impl DisabledClasses {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disabled_classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads a TOML profile of the form `disabled_classes = ["Node3D", ...]`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file("feature profile", path)?;
        let profile: Self = toml::from_str(&content).map_err(|e| LoadError::Parse {
            what: "feature profile",
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(profile)
    }

    pub fn is_empty(&self) -> bool {
        self.disabled_classes.is_empty()
    }
}

impl FeatureProfile for DisabledClasses {
    fn is_class_disabled(&self, class_name: &str) -> bool {
        self.disabled_classes.contains(class_name)
    }
}

/// Walks the ancestor chain of `class_name`; any disabled class along it
/// disables the whole chain. The walk stops (not disabled) at the first class
/// the hierarchy does not know.
pub fn is_disabled_by_profile(
    graph: &dyn ClassGraph,
    profile: &dyn FeatureProfile,
    class_name: &str,
) -> bool {
    let mut current = Some(class_name);
    for _ in 0..=MAX_INHERITANCE_DEPTH {
        let Some(name) = current else {
            return false;
        };
        if !graph.exists(name) {
            return false;
        }
        if profile.is_class_disabled(name) {
            return true;
        }
        current = graph.parent_of(name);
    }
    false
}
