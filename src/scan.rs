//! Background discovery of project scripts.
//!
//! [`DocRunner`] walks a project tree one directory (then one file) per slice,
//! loads every script it finds through [`ScriptReflection`], and sorts the
//! results into custom nodes and synthetic class docs that can be merged into a
//! [`DocStore`].

use crate::docs::{ClassDoc, DocStore};
use crate::script::{ScriptInfo, ScriptReflection};
use crate::task::{IncrementalTask, PhaseStatus};
use ahash::AHashSet;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Upper bound on entries read from a single directory listing.
pub const MAX_DIRECTORY_ENTRIES: usize = 1000;

const SCRIPT_BRIEF: &str = "Project script.";

/// Where and what to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocScanConfig {
    /// Project root on disk.
    pub root: PathBuf,
    /// Accepted file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Prepended to the root-relative path to form a script identity.
    pub resource_prefix: String,
    /// A directory containing this file is skipped entirely.
    pub ignore_marker: String,
    /// Project metadata directory, never scanned.
    pub project_data_dir: String,
    /// Scripts extending this type become custom nodes.
    pub custom_node_base: String,
}

impl Default for DocScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: vec!["gd".to_string(), "vs".to_string()],
            resource_prefix: "res://".to_string(),
            ignore_marker: ".gdignore".to_string(),
            project_data_dir: ".godot".to_string(),
            custom_node_base: "VisualScriptCustomNode".to_string(),
        }
    }
}

impl DocScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Script identity of a root-relative path: `res://dir/file.gd`.
    pub fn identity_of(&self, relative: &Path) -> String {
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}{}", self.resource_prefix, path)
    }
}

/// A script providing a custom graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomNode {
    pub identity: String,
    pub script: ScriptInfo,
}

/// What a loaded script turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedScript {
    CustomNode(CustomNode),
    /// Any other script, documented as a class named by its identity.
    Documented(ClassDoc),
}

impl ScannedScript {
    pub fn classify(identity: &str, script: ScriptInfo, custom_node_base: &str) -> Self {
        if script.base_type == custom_node_base {
            return Self::CustomNode(CustomNode {
                identity: identity.to_string(),
                script,
            });
        }

        let mut doc = ClassDoc::new(identity).inheriting(script.base_type.as_str());
        doc.brief_description = SCRIPT_BRIEF.to_string();
        doc.methods = script.method_docs();
        doc.signals = script.signal_docs();
        doc.properties = script.property_docs();
        Self::Documented(doc)
    }
}

/// Results of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct DocScan {
    pub custom_nodes: Vec<CustomNode>,
    pub class_docs: DocStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanPhase {
    Init,
    EnumerateDirectories,
    EnumerateFiles,
    Done,
}

/// Incremental project scan.
pub struct DocRunner<'a> {
    scripts: &'a dyn ScriptReflection,
    config: DocScanConfig,
    phase: ScanPhase,
    extensions: AHashSet<String>,
    /// Pending root-relative directories, one level per depth.
    levels: Vec<Vec<PathBuf>>,
    /// Root-relative script paths; consumed from the back.
    files: Vec<PathBuf>,
    total_files: Option<usize>,
    results: DocScan,
    started: Option<Instant>,
}

impl<'a> DocRunner<'a> {
    pub fn new(scripts: &'a dyn ScriptReflection, config: DocScanConfig) -> Self {
        Self {
            scripts,
            config,
            phase: ScanPhase::Init,
            extensions: AHashSet::new(),
            levels: Vec::new(),
            files: Vec::new(),
            total_files: None,
            results: DocScan::default(),
            started: None,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == ScanPhase::Done
    }

    pub fn custom_nodes(&self) -> &[CustomNode] {
        &self.results.custom_nodes
    }

    pub fn class_docs(&self) -> &DocStore {
        &self.results.class_docs
    }

    pub fn into_results(self) -> DocScan {
        self.results
    }

    /// `(scanned, total)` files, known once directory enumeration has finished.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.total_files
            .map(|total| (total - self.files.len().min(total), total))
    }

    fn init(&mut self) -> bool {
        self.results = DocScan::default();
        self.extensions = self.config.extensions.iter().cloned().collect();
        self.levels = vec![vec![PathBuf::new()]];
        self.files.clear();
        self.total_files = None;
        tracing::debug!("Scanning scripts under {}", self.config.root.display());
        true
    }

    fn enumerate_directories(&mut self) -> bool {
        let Some(level) = self.levels.last_mut() else {
            return true;
        };
        match level.pop() {
            Some(dir) => {
                let subdirs = self.list_directory(&dir);
                self.levels.push(subdirs);
            }
            None => {
                self.levels.pop();
            }
        }

        if self.levels.is_empty() {
            self.total_files = Some(self.files.len());
            tracing::debug!("Found {} script files", self.files.len());
            return true;
        }
        false
    }

    /// Reads one directory: accepted files go to the work list, subdirectories
    /// are returned as the next level.
    ///
    /// Hidden entries and the project data directory are never listed. The
    /// listing is sorted by name before the entry cap applies.
    fn list_directory(&mut self, relative: &Path) -> Vec<PathBuf> {
        let dir = self.config.root.join(relative);
        if !self.config.ignore_marker.is_empty() && dir.join(&self.config.ignore_marker).exists() {
            tracing::trace!("Skipping ignored directory {}", dir.display());
            return Vec::new();
        }

        let data_dir = self.config.project_data_dir.clone();
        let walker = WalkBuilder::new(&dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| entry.file_name() != OsStr::new(&data_dir))
            .build();

        let listing = walker
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Cannot list directory {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.depth() > 0)
            .take(MAX_DIRECTORY_ENTRIES);

        let mut subdirs = Vec::new();
        for entry in listing {
            let Some(file_type) = entry.file_type() else {
                continue;
            };

            let path = relative.join(entry.file_name());
            if file_type.is_dir() {
                subdirs.push(path);
            } else if path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.extensions.contains(ext))
            {
                self.files.push(path);
            }
        }
        subdirs
    }

    fn enumerate_files(&mut self) -> bool {
        let Some(path) = self.files.pop() else {
            return true;
        };

        let identity = self.config.identity_of(&path);
        match self.scripts.load_script(&identity) {
            Ok(info) => {
                match ScannedScript::classify(&identity, info, &self.config.custom_node_base) {
                    ScannedScript::CustomNode(node) => self.results.custom_nodes.push(node),
                    ScannedScript::Documented(doc) => {
                        self.results.class_docs.insert(doc);
                    }
                }
            }
            Err(e) => tracing::warn!("Skipping script {}: {}", identity, e),
        }

        self.files.is_empty()
    }
}

impl IncrementalTask for DocRunner<'_> {
    fn advance_one_slice(&mut self) -> PhaseStatus {
        let started = *self.started.get_or_insert_with(Instant::now);
        let finished = match self.phase {
            ScanPhase::Init => self.init(),
            ScanPhase::EnumerateDirectories => self.enumerate_directories(),
            ScanPhase::EnumerateFiles => self.enumerate_files(),
            ScanPhase::Done => return PhaseStatus::AllComplete,
        };
        if !finished {
            return PhaseStatus::Continue;
        }

        self.phase = match self.phase {
            ScanPhase::Init => ScanPhase::EnumerateDirectories,
            ScanPhase::EnumerateDirectories => ScanPhase::EnumerateFiles,
            ScanPhase::EnumerateFiles | ScanPhase::Done => ScanPhase::Done,
        };
        if self.phase != ScanPhase::Done {
            return PhaseStatus::PhaseComplete;
        }

        tracing::info!(
            "Scanned {} scripts: {} documented, {} custom nodes in {:?}",
            self.total_files.unwrap_or_default(),
            self.results.class_docs.len(),
            self.results.custom_nodes.len(),
            started.elapsed()
        );
        PhaseStatus::AllComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptMethod;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("player.gd", "res://player.gd")]
    #[case("enemies/slime.gd", "res://enemies/slime.gd")]
    fn identity_uses_forward_slashes(#[case] relative: &str, #[case] identity: &str) {
        let config = DocScanConfig::default();
        let relative: PathBuf = relative.split('/').collect();
        check!(config.identity_of(&relative) == identity);
    }

    #[test]
    fn custom_node_base_is_classified_as_node() {
        let info = ScriptInfo::new("VisualScriptCustomNode");
        let scanned = ScannedScript::classify("res://add.gd", info, "VisualScriptCustomNode");
        check!(let ScannedScript::CustomNode(_) = scanned);
    }

    #[test]
    fn other_scripts_become_class_docs() {
        let info = ScriptInfo::new("Node2D")
            .with_method(ScriptMethod::new("jump"))
            .with_signal(ScriptMethod::new("landed"))
            .with_property("speed", "float");
        let ScannedScript::Documented(doc) =
            ScannedScript::classify("res://player.gd", info, "VisualScriptCustomNode")
        else {
            panic!("expected a documented script");
        };
        check!(doc.name == "res://player.gd");
        check!(doc.parent() == Some("Node2D"));
        check!(doc.methods[0].description == crate::script::NO_DESCRIPTION);
        check!(doc.signals[0].name == "landed");
        check!(doc.properties[0].type_name == "float");
    }
}
