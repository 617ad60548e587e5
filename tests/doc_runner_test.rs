mod common;

use assert2::check;
use classdoc_search::scan::{MAX_DIRECTORY_ENTRIES, ScanPhase};
use classdoc_search::script::ScriptMethod;
use classdoc_search::tree::MemberKind;
use classdoc_search::{
    DocRunner, DocScanConfig, IncrementalTask, ItemMeta, Scope, ScriptInfo, ScriptRegistry,
    SearchCategories, SearchConfig,
};
use common::{Engine, TempWorkspace, engine_docs};
use rstest::{fixture, rstest};
use std::time::Duration;

/// A small project tree plus reflection data for every script in it,
/// including scripts the scan must never reach.
struct Project {
    workspace: TempWorkspace,
    scripts: ScriptRegistry,
}

impl Project {
    fn config(&self) -> DocScanConfig {
        DocScanConfig::new(self.workspace.path())
    }
}

#[fixture]
fn project() -> Project {
    classdoc_search::tracing::init();
    let workspace = TempWorkspace::new();
    workspace.create_file("player.gd", "extends Node");
    workspace.create_file("broken.gd", "extends ???");
    workspace.create_file("enemies/slime.gd", "extends Node2D");
    workspace.create_file("enemies/notes.txt", "not a script");
    workspace.create_file("nodes/add.vs", "");
    workspace.create_file("addons/.gdignore", "");
    workspace.create_file("addons/plugin.gd", "extends EditorPlugin");
    workspace.create_file(".godot/cache.gd", "");
    workspace.create_file(".hidden/secret.gd", "");
    workspace.create_dir("empty");

    let mut scripts = ScriptRegistry::new();
    scripts.insert(
        "res://player.gd",
        ScriptInfo::new("Node")
            .with_method(ScriptMethod::new("jump"))
            .with_signal(ScriptMethod::new("landed"))
            .with_property("speed", "float"),
    );
    scripts.insert("res://enemies/slime.gd", ScriptInfo::new("Node2D"));
    scripts.insert("res://nodes/add.vs", ScriptInfo::new("VisualScriptCustomNode"));
    for unreachable in [
        "res://addons/plugin.gd",
        "res://.godot/cache.gd",
        "res://.hidden/secret.gd",
    ] {
        scripts.insert(unreachable, ScriptInfo::new("Node"));
    }

    Project { workspace, scripts }
}

fn class_names(runner: &DocRunner<'_>) -> Vec<String> {
    runner
        .class_docs()
        .iter()
        .map(|doc| doc.name.clone())
        .collect()
}

#[rstest]
fn scan_sorts_scripts_into_docs_and_custom_nodes(project: Project) {
    let mut runner = DocRunner::new(&project.scripts, project.config());
    runner.run_to_completion();

    check!(runner.is_done());
    check!(class_names(&runner) == vec!["res://enemies/slime.gd", "res://player.gd"]);
    let nodes: Vec<_> = runner
        .custom_nodes()
        .iter()
        .map(|node| node.identity.as_str())
        .collect();
    check!(nodes == vec!["res://nodes/add.vs"]);

    // broken.gd was found but could not be loaded
    check!(runner.progress() == Some((4, 4)));

    let player = runner
        .class_docs()
        .iter()
        .find(|doc| doc.name == "res://player.gd")
        .unwrap();
    check!(player.parent() == Some("Node"));
    check!(player.methods[0].name == "jump");
    check!(player.signals[0].name == "landed");
    check!(player.properties[0].type_name == "float");
}

#[rstest]
fn progress_is_unknown_until_directories_are_listed(project: Project) {
    let mut runner = DocRunner::new(&project.scripts, project.config());
    check!(runner.progress().is_none());

    while runner.phase() != ScanPhase::EnumerateFiles {
        check!(runner.progress().is_none());
        runner.advance_one_slice();
    }
    check!(runner.progress() == Some((0, 4)));

    runner.advance_one_slice();
    check!(runner.progress() == Some((1, 4)));
}

#[rstest]
fn sliced_scan_matches_single_call(project: Project) {
    let mut single = DocRunner::new(&project.scripts, project.config());
    single.run_to_completion();

    let mut sliced = DocRunner::new(&project.scripts, project.config());
    let mut calls = 0;
    while !sliced.work(Duration::ZERO) {
        calls += 1;
    }

    check!(calls > 4);
    check!(class_names(&sliced) == class_names(&single));
    check!(sliced.custom_nodes() == single.custom_nodes());
    check!(sliced.work(Duration::ZERO));
}

#[rstest]
fn extension_filter_comes_from_config(project: Project) {
    let config = DocScanConfig {
        extensions: vec!["vs".to_string()],
        ..project.config()
    };
    let mut runner = DocRunner::new(&project.scripts, config);
    runner.run_to_completion();

    check!(runner.class_docs().is_empty());
    check!(runner.custom_nodes().len() == 1);
    check!(runner.progress() == Some((1, 1)));
}

#[rstest]
fn crowded_directory_keeps_first_entries_by_name() {
    classdoc_search::tracing::init();
    let workspace = TempWorkspace::new();
    let count = MAX_DIRECTORY_ENTRIES + 5;
    for i in 0..count {
        workspace.create_file(&format!("many/script_{:04}.gd", i), "");
    }

    let first = "res://many/script_0000.gd";
    let last = format!("res://many/script_{:04}.gd", count - 1);
    let mut scripts = ScriptRegistry::new();
    scripts.insert(first, ScriptInfo::new("Node"));
    scripts.insert(last.as_str(), ScriptInfo::new("Node"));

    let mut runner = DocRunner::new(&scripts, DocScanConfig::new(workspace.path()));
    runner.run_to_completion();

    check!(runner.progress() == Some((MAX_DIRECTORY_ENTRIES, MAX_DIRECTORY_ENTRIES)));
    check!(class_names(&runner) == vec![first]);
}

#[rstest]
fn missing_root_finishes_empty() {
    let scripts = ScriptRegistry::new();
    let workspace = TempWorkspace::new();
    let mut runner = DocRunner::new(&scripts, DocScanConfig::new(workspace.path().join("gone")));
    runner.run_to_completion();

    check!(runner.is_done());
    check!(runner.progress() == Some((0, 0)));
    check!(runner.into_results().class_docs.is_empty());
}

#[rstest]
fn scanned_scripts_are_searchable(project: Project) {
    let mut runner = DocRunner::new(&project.scripts, project.config());
    runner.run_to_completion();

    let mut docs = engine_docs();
    docs.merge(runner.into_results().class_docs);
    let engine = Engine::from_docs(docs);

    let config = SearchConfig::new("jump", "Node")
        .with_categories(SearchCategories::METHODS)
        .with_scope(Scope::INHERITERS);
    let tree = engine.search(config);

    check!(
        tree.render()
            == concat!(
                " Node [Class] (gray)\n",
                "   res://player.gd [Class] (gray)\n",
                ">    jump [Method]\n",
            )
    );
    check!(
        tree.selected_meta()
            == Some(&ItemMeta::member(MemberKind::Method, "res://player.gd", "jump"))
    );
}
