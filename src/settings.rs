//! User-facing settings, loaded from TOML.
//!
//! ```toml
//! work_budget_ms = 50
//! disabled_classes = ["Node3D"]
//!
//! [search]
//! filter = "methods"
//! scope = "base"
//! case_sensitive = false
//! show_hierarchy = true
//!
//! [scan]
//! root = "~/projects/game"
//! extensions = ["gd"]
//! ```

use crate::error::{LoadError, Result, read_file};
use crate::hierarchy::DisabledClasses;
use crate::scan::DocScanConfig;
use crate::search::{CategoryFilter, ScopeFilter, SearchConfig};
use crate::task::DEFAULT_WORK_BUDGET;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Search options remembered between popups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub filter: CategoryFilter,
    pub scope: ScopeFilter,
    pub case_sensitive: bool,
    pub show_hierarchy: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::All,
            scope: ScopeFilter::Related,
            case_sensitive: false,
            show_hierarchy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    pub work_budget_ms: u64,
    pub search: SearchDefaults,
    pub scan: DocScanConfig,
    /// Feature-profile deny list.
    pub disabled_classes: Vec<String>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            work_budget_ms: DEFAULT_WORK_BUDGET.as_millis() as u64,
            search: SearchDefaults::default(),
            scan: DocScanConfig::default(),
            disabled_classes: Vec::new(),
        }
    }
}

impl SelectorSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file("settings", path)?;
        let settings = Self::from_toml(&content).map_err(|e| LoadError::Parse {
            what: "settings",
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(content)?;
        settings.scan.root = expand_tilde(&settings.scan.root);
        Ok(settings)
    }

    /// Per-call budget for driving runners.
    pub fn work_budget(&self) -> Duration {
        Duration::from_millis(self.work_budget_ms)
    }

    /// Configuration snapshot for one search.
    pub fn search_config(
        &self,
        term: &str,
        base_class: &str,
        base_script: Option<&str>,
    ) -> SearchConfig {
        let config = SearchConfig::new(term, base_class)
            .with_case_sensitive(self.search.case_sensitive)
            .with_categories(self.search.filter)
            .with_scope(self.search.scope)
            .with_hierarchy(self.search.show_hierarchy);
        match base_script {
            Some(identity) => config.with_base_script(identity),
            None => config,
        }
    }

    /// The feature profile, or `None` when nothing is disabled.
    pub fn profile(&self) -> Option<DisabledClasses> {
        (!self.disabled_classes.is_empty())
            .then(|| DisabledClasses::new(self.disabled_classes.iter().cloned()))
    }
}

/// Expands a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    path.to_path_buf()
}
