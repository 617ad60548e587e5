//! Script reflection: what the search needs to know about a user script.

use crate::docs::{ArgumentDoc, MethodDoc, PropertyDoc};
use crate::error::{LoadError, Result, ScriptError, read_file};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder description for members reflected from scripts.
pub const NO_DESCRIPTION: &str = "No description available";

/// A method or signal declared by a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptMethod {
    pub name: String,
    pub return_type: String,
    pub arguments: Vec<ArgumentDoc>,
}

impl ScriptMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn to_method_doc(&self) -> MethodDoc {
        MethodDoc {
            name: self.name.clone(),
            return_type: self.return_type.clone(),
            arguments: self.arguments.clone(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ScriptProperty {
    pub fn to_property_doc(&self) -> PropertyDoc {
        PropertyDoc {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            ..PropertyDoc::default()
        }
    }
}

/// Reflected view of a loaded script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptInfo {
    /// Engine class the script's instances derive from.
    pub base_type: String,
    pub methods: Vec<ScriptMethod>,
    pub signals: Vec<ScriptMethod>,
    pub properties: Vec<ScriptProperty>,
}

impl ScriptInfo {
    pub fn new(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: ScriptMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_signal(mut self, signal: ScriptMethod) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_property(mut self, name: &str, type_name: &str) -> Self {
        self.properties.push(ScriptProperty {
            name: name.to_string(),
            type_name: type_name.to_string(),
        });
        self
    }

    pub fn method_docs(&self) -> Vec<MethodDoc> {
        self.methods.iter().map(ScriptMethod::to_method_doc).collect()
    }

    pub fn signal_docs(&self) -> Vec<MethodDoc> {
        self.signals.iter().map(ScriptMethod::to_method_doc).collect()
    }

    pub fn property_docs(&self) -> Vec<PropertyDoc> {
        self.properties
            .iter()
            .map(ScriptProperty::to_property_doc)
            .collect()
    }
}

/// Loads and reflects scripts by identity (e.g. `res://player.gd`).
pub trait ScriptReflection {
    fn load_script(&self, identity: &str) -> std::result::Result<ScriptInfo, ScriptError>;
}

/// In-memory script registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptRegistry {
    scripts: AHashMap<String, ScriptInfo>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON object mapping script identity to [`ScriptInfo`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file("script registry", path)?;
        let registry: Self = serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            what: "script registry",
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        tracing::debug!(
            "Loaded {} scripts from {}",
            registry.scripts.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn insert(&mut self, identity: impl Into<String>, info: ScriptInfo) {
        self.scripts.insert(identity.into(), info);
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl ScriptReflection for ScriptRegistry {
    fn load_script(&self, identity: &str) -> std::result::Result<ScriptInfo, ScriptError> {
        self.scripts
            .get(identity)
            .cloned()
            .ok_or_else(|| ScriptError::NotFound {
                identity: identity.to_string(),
            })
    }
}
