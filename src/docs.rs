//! Class documentation records and the read-only store they live in.
//!
//! A [`ClassDoc`] describes one class or script: its parent and ordered lists of
//! members per category. The search runner only ever reads docs through the
//! [`DocSource`] trait; [`DocStore`] is the in-memory implementation, loadable
//! from JSON and mergeable with script docs discovered on disk.

use crate::error::{LoadError, Result, read_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One argument of a documented method or signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgumentDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default_value: Option<String>,
}

/// A method, constructor, operator or signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodDoc {
    pub name: String,
    pub return_type: String,
    pub arguments: Vec<ArgumentDoc>,
    pub description: String,
}

impl MethodDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Render as `ret Class.name(type arg = default, ...)`.
    pub fn signature(&self, class_name: &str) -> String {
        let args = self
            .arguments
            .iter()
            .map(|arg| {
                let mut rendered = format!("{} {}", arg.type_name, arg.name);
                if let Some(default) = arg.default_value.as_deref().filter(|d| !d.is_empty()) {
                    rendered.push_str(" = ");
                    rendered.push_str(default);
                }
                rendered.trim_start().to_string()
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}.{}({})", self.return_type, class_name, self.name, args)
            .trim_start()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub setter: String,
    pub getter: String,
    pub default_value: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantDoc {
    pub name: String,
    pub value: String,
    pub enumeration: Option<String>,
    pub description: String,
}

/// A themeable property (color, constant, font, icon, style box...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeItemDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub data_type: String,
    pub description: String,
}

/// Documentation for one class or script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDoc {
    pub name: String,
    pub inherits: Option<String>,
    pub brief_description: String,
    pub description: String,
    pub constructors: Vec<MethodDoc>,
    pub methods: Vec<MethodDoc>,
    pub operators: Vec<MethodDoc>,
    pub signals: Vec<MethodDoc>,
    pub constants: Vec<ConstantDoc>,
    pub properties: Vec<PropertyDoc>,
    pub theme_properties: Vec<ThemeItemDoc>,
}

impl ClassDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style parent assignment. An empty parent means "no parent".
    pub fn inheriting(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.inherits = (!parent.is_empty()).then_some(parent);
        self
    }

    /// Parent class name, if any.
    pub fn parent(&self) -> Option<&str> {
        self.inherits.as_deref().filter(|p| !p.is_empty())
    }
}

/// Read-only access to documentation, in a stable iteration order.
pub trait DocSource {
    /// Look up the documentation for a class by name.
    fn lookup(&self, class_name: &str) -> Option<&ClassDoc>;

    /// All documented classes, in the store's stable order.
    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDoc> + '_>;
}

/// In-memory documentation store keyed (and ordered) by class name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocStore {
    classes: BTreeMap<String, ClassDoc>,
}

impl DocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON documentation dump: either an array of class docs or an
    /// object keyed by class name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file("documentation", path)?;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Dump {
            List(Vec<ClassDoc>),
            Map(BTreeMap<String, ClassDoc>),
        }

        let dump: Dump = serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            what: "documentation",
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let store: Self = match dump {
            Dump::List(docs) => docs.into_iter().collect(),
            Dump::Map(map) => map
                .into_iter()
                .map(|(key, mut doc)| {
                    if doc.name.is_empty() {
                        doc.name = key;
                    }
                    doc
                })
                .collect(),
        };

        tracing::info!(
            "Loaded documentation for {} classes from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Insert or replace a class doc. Returns the previous doc of that name.
    pub fn insert(&mut self, doc: ClassDoc) -> Option<ClassDoc> {
        self.classes.insert(doc.name.clone(), doc)
    }

    /// Merge another store into this one; docs from `other` win on conflict.
    pub fn merge(&mut self, other: Self) {
        let incoming = other.len();
        self.classes.extend(other.classes);
        tracing::debug!("Merged {} class docs ({} total)", incoming, self.len());
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDoc> {
        self.classes.values()
    }
}

impl DocSource for DocStore {
    fn lookup(&self, class_name: &str) -> Option<&ClassDoc> {
        self.classes.get(class_name)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDoc> + '_> {
        Box::new(self.classes.values())
    }
}

impl FromIterator<ClassDoc> for DocStore {
    fn from_iter<I: IntoIterator<Item = ClassDoc>>(iter: I) -> Self {
        let mut store = Self::new();
        for doc in iter {
            store.insert(doc);
        }
        store
    }
}

impl Extend<ClassDoc> for DocStore {
    fn extend<I: IntoIterator<Item = ClassDoc>>(&mut self, iter: I) {
        for doc in iter {
            self.insert(doc);
        }
    }
}
