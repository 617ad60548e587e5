//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `engine`: a small engine-like class graph (Object > Node > CanvasItem >
//!   Control > Button, plus Node3D, Resource and the builtin Vector2), with
//!   icons and an empty script registry.
//!
//! [`TempWorkspace`] provides a temp directory for tests that scan a project tree.

use classdoc_search::docs::{ArgumentDoc, ConstantDoc, MethodDoc, PropertyDoc, ThemeItemDoc};
use classdoc_search::tree::ItemId;
use classdoc_search::{
    ClassDoc, ClassHierarchy, DocStore, IconSet, IncrementalTask, ResultTree, ScriptRegistry,
    SearchConfig, SearchContext, SearchRunner,
};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace directory for test isolation.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content; parent directories are created as needed.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Documentation, hierarchy, scripts and icons for one test.
#[allow(dead_code)]
pub struct Engine {
    pub docs: DocStore,
    pub classes: ClassHierarchy,
    pub scripts: ScriptRegistry,
    pub icons: IconSet,
}

#[allow(dead_code)]
impl Engine {
    pub fn from_docs(docs: DocStore) -> Self {
        classdoc_search::tracing::init();
        let classes = ClassHierarchy::from_docs(&docs);
        Self {
            docs,
            classes,
            scripts: ScriptRegistry::new(),
            icons: IconSet::new(["Object", "Node", "Control", "Button"]),
        }
    }

    pub fn ctx(&self) -> SearchContext<'_> {
        SearchContext::new(&self.docs, &self.classes, &self.scripts, &self.icons)
    }

    pub fn runner(&self, config: SearchConfig) -> SearchRunner<'_, ResultTree> {
        SearchRunner::new(self.ctx(), config, ResultTree::new())
    }

    /// Runs a search to completion in one call.
    pub fn search(&self, config: SearchConfig) -> ResultTree {
        let mut runner = self.runner(config);
        runner.run_to_completion();
        runner.into_sink()
    }
}

fn methods(names: &[&str]) -> Vec<MethodDoc> {
    names.iter().map(|name| MethodDoc::new(*name)).collect()
}

fn property(name: &str, type_name: &str, setter: &str, getter: &str) -> PropertyDoc {
    PropertyDoc {
        name: name.to_string(),
        type_name: type_name.to_string(),
        setter: setter.to_string(),
        getter: getter.to_string(),
        ..PropertyDoc::default()
    }
}

fn constant(name: &str, value: &str) -> ConstantDoc {
    ConstantDoc {
        name: name.to_string(),
        value: value.to_string(),
        ..ConstantDoc::default()
    }
}

pub fn engine_docs() -> DocStore {
    let mut object = ClassDoc::new("Object");
    object.brief_description = "Base class of all engine classes.".to_string();
    object.methods = methods(&["get_class", "get_meta", "set_meta", "connect"]);
    object.signals = methods(&["script_changed"]);
    object.constants = vec![constant("NOTIFICATION_POSTINITIALIZE", "0")];

    let mut node = ClassDoc::new("Node").inheriting("Object");
    node.brief_description = "Base class for all scene objects.".to_string();
    node.methods = methods(&["get_child", "get_children", "get_parent", "queue_free"]);
    node.methods.push(MethodDoc {
        name: "add_child".to_string(),
        return_type: "void".to_string(),
        arguments: vec![
            ArgumentDoc {
                name: "node".to_string(),
                type_name: "Node".to_string(),
                default_value: None,
            },
            ArgumentDoc {
                name: "force_readable_name".to_string(),
                type_name: "bool".to_string(),
                default_value: Some("false".to_string()),
            },
        ],
        description: String::new(),
    });
    node.signals = methods(&["ready", "tree_entered"]);
    node.constants = vec![constant("NOTIFICATION_READY", "13")];
    node.properties = vec![property("name", "StringName", "set_name", "get_name")];

    let mut canvas_item = ClassDoc::new("CanvasItem").inheriting("Node");
    canvas_item.methods = methods(&["get_canvas", "draw_line", "show"]);
    canvas_item.properties = vec![property("visible", "bool", "set_visible", "is_visible")];

    let mut control = ClassDoc::new("Control").inheriting("CanvasItem");
    control.methods = methods(&["get_rect", "grab_focus"]);
    control.properties = vec![property("size", "Vector2", "set_size", "get_size")];
    control.theme_properties = vec![ThemeItemDoc {
        name: "font_color".to_string(),
        type_name: "Color".to_string(),
        data_type: "color".to_string(),
        description: String::new(),
    }];

    let mut button = ClassDoc::new("Button").inheriting("Control");
    button.signals = methods(&["pressed"]);
    button.properties = vec![property("text", "String", "set_text", "get_text")];

    let mut node3d = ClassDoc::new("Node3D").inheriting("Node");
    node3d.methods = methods(&["get_transform"]);

    let mut resource = ClassDoc::new("Resource").inheriting("Object");
    resource.methods = methods(&["get_path", "duplicate"]);
    resource.properties = vec![property(
        "resource_name",
        "String",
        "set_name",
        "get_name",
    )];

    let mut vector2 = ClassDoc::new("Vector2");
    vector2.constructors = methods(&["Vector2", "Vector2"]);
    vector2.methods = methods(&["Vector2", "Vector2", "length"]);
    vector2.operators = methods(&["operator +", "operator -"]);
    vector2.constants = vec![constant("ZERO", "Vector2(0, 0)")];

    [
        object,
        node,
        canvas_item,
        control,
        button,
        node3d,
        resource,
        vector2,
    ]
    .into_iter()
    .collect()
}

#[fixture]
pub fn engine() -> Engine {
    Engine::from_docs(engine_docs())
}

/// Labels of the root's children, in order.
#[allow(dead_code)]
pub fn root_labels(tree: &ResultTree) -> Vec<String> {
    tree.root()
        .map(|root| labels(tree, tree.children(root)))
        .unwrap_or_default()
}

#[allow(dead_code)]
pub fn labels(tree: &ResultTree, items: &[ItemId]) -> Vec<String> {
    items
        .iter()
        .map(|id| tree.item(*id).text[0].clone())
        .collect()
}
